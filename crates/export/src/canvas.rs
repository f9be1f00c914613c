//! Drawing surface for paginated reports
//!
//! Coordinates are millimetres from the top-left of an A4 page, font sizes
//! are points. The PDF library itself lives behind [`PdfBackend`].

use crate::ExportError;

/// Millimetres per typographic point
const MM_PER_PT: f32 = 25.4 / 72.0;

/// Average glyph advance as a fraction of the font size
const AVG_GLYPH_WIDTH: f32 = 0.5;

/// RGB text color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BRAND: Rgb = Rgb(16, 185, 129);
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const MUTED: Rgb = Rgb(100, 100, 100);
    pub const BODY: Rgb = Rgb(60, 60, 60);
    pub const FOOTER: Rgb = Rgb(150, 150, 150);
}

/// A paginated drawing surface
pub trait ReportCanvas {
    /// Font size for subsequent text
    fn set_font_size(&mut self, size: f32);

    /// Current font size
    fn font_size(&self) -> f32;

    /// Color for subsequent text
    fn set_text_color(&mut self, color: Rgb);

    /// Draw one line of text with its baseline at `y`
    fn text(&mut self, text: &str, x: f32, y: f32);

    /// Place a PNG image in the given box
    fn add_image_png(
        &mut self,
        png: &[u8],
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) -> Result<(), ExportError>;

    /// Start a new page
    fn add_page(&mut self);

    /// Serialize the document
    fn finish(self: Box<Self>) -> Result<Vec<u8>, ExportError>;

    /// Width of `text` at the current font size (mm)
    fn text_width(&self, text: &str) -> f32 {
        text.chars().count() as f32 * self.font_size() * AVG_GLYPH_WIDTH * MM_PER_PT
    }

    /// Draw consecutive lines starting at `y`
    fn text_lines(&mut self, lines: &[String], x: f32, y: f32, line_height: f32) {
        for (i, line) in lines.iter().enumerate() {
            self.text(line, x, y + i as f32 * line_height);
        }
    }
}

/// Creates report canvases
pub trait PdfBackend: Send + Sync {
    fn create(&self) -> Result<Box<dyn ReportCanvas>, ExportError>;
}

/// Greedy word wrap to `max_width` using the canvas metrics.
///
/// Words wider than a line are placed on a line of their own.
pub fn wrap_text(canvas: &dyn ReportCanvas, text: &str, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate = format!("{current} {word}");
        if canvas.text_width(&candidate) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(f32);

    impl ReportCanvas for Fixed {
        fn set_font_size(&mut self, size: f32) {
            self.0 = size;
        }
        fn font_size(&self) -> f32 {
            self.0
        }
        fn set_text_color(&mut self, _: Rgb) {}
        fn text(&mut self, _: &str, _: f32, _: f32) {}
        fn add_image_png(&mut self, _: &[u8], _: f32, _: f32, _: f32, _: f32) -> Result<(), ExportError> {
            Ok(())
        }
        fn add_page(&mut self) {}
        fn finish(self: Box<Self>) -> Result<Vec<u8>, ExportError> {
            Ok(Vec::new())
        }
        // one millimetre per character
        fn text_width(&self, text: &str) -> f32 {
            text.chars().count() as f32
        }
    }

    #[test]
    fn test_wrap_respects_width() {
        let canvas = Fixed(10.0);
        let lines = wrap_text(&canvas, "alpha beta gamma delta epsilon", 11.0);
        assert_eq!(lines, vec!["alpha beta", "gamma delta", "epsilon"]);
        assert!(lines.iter().all(|l| l.chars().count() <= 11));
    }

    #[test]
    fn test_wrap_long_word_and_empty() {
        let canvas = Fixed(10.0);
        assert_eq!(wrap_text(&canvas, "tiny enormousword x", 5.0), vec!["tiny", "enormousword", "x"]);
        assert!(wrap_text(&canvas, "   ", 5.0).is_empty());
    }

    #[test]
    fn test_default_width_scales_with_font() {
        struct Plain(f32);
        impl ReportCanvas for Plain {
            fn set_font_size(&mut self, size: f32) {
                self.0 = size;
            }
            fn font_size(&self) -> f32 {
                self.0
            }
            fn set_text_color(&mut self, _: Rgb) {}
            fn text(&mut self, _: &str, _: f32, _: f32) {}
            fn add_image_png(&mut self, _: &[u8], _: f32, _: f32, _: f32, _: f32) -> Result<(), ExportError> {
                Ok(())
            }
            fn add_page(&mut self) {}
            fn finish(self: Box<Self>) -> Result<Vec<u8>, ExportError> {
                Ok(Vec::new())
            }
        }

        let mut canvas = Plain(10.0);
        let small = canvas.text_width("environment");
        canvas.set_font_size(20.0);
        assert!((canvas.text_width("environment") - 2.0 * small).abs() < 1e-4);
    }
}
