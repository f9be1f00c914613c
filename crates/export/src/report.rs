//! Report layout
//!
//! Page one carries the title block, summary statistics and the chart
//! snapshot. Insights start on a fresh page and flow onto further pages as
//! the vertical cursor passes the bottom margin.

use crate::canvas::{wrap_text, PdfBackend, ReportCanvas, Rgb};
use crate::ExportError;
use chrono::{DateTime, Utc};
use image::ImageFormat;
use insights::Insight;
use readings::SummaryStats;
use tracing::{debug, info};

/// Top of the writable area (mm)
const TOP_MARGIN: f32 = 20.0;

/// Cursor position past which a new page is started (mm)
const PAGE_BREAK_AT: f32 = 270.0;

/// Baseline of the footer line (mm)
const FOOTER_Y: f32 = 285.0;

/// Left edge of headings (mm)
const LEFT: f32 = 20.0;

/// Chart box on page one (mm)
const CHART_X: f32 = 15.0;
const CHART_WIDTH: f32 = 180.0;
const CHART_HEIGHT: f32 = 90.0;

/// Wrap width of insight bodies (mm)
const INSIGHT_WRAP: f32 = 170.0;

/// Height of one wrapped insight line (mm)
const INSIGHT_LINE: f32 = 5.0;

/// Space after each insight (mm)
const INSIGHT_GAP: f32 = 8.0;

const FOOTER_TEXT: &str = "EnviTrack - AI-Powered Environmental Monitoring System";

/// Everything the report shows
#[derive(Debug, Clone, Copy)]
pub struct ReportData<'a> {
    pub stats: &'a SummaryStats,
    pub insights: &'a [Insight],
    /// PNG snapshot of the main chart, if one is available
    pub chart_png: Option<&'a [u8]>,
    pub generated_at: DateTime<Utc>,
}

/// Placement of an image inside a page box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Scale a PNG to fit the chart box at `y`, keeping its aspect ratio and
/// centering it horizontally
pub fn fit_chart(png: &[u8], y: f32) -> Result<ImageBox, ExportError> {
    let img = image::load_from_memory_with_format(png, ImageFormat::Png)?;
    let (w, h) = (img.width() as f32, img.height() as f32);
    if w == 0.0 || h == 0.0 {
        return Err(ExportError::Render("chart snapshot is empty".to_string()));
    }

    let scale = (CHART_WIDTH / w).min(CHART_HEIGHT / h);
    let (width, height) = (w * scale, h * scale);
    Ok(ImageBox {
        x: CHART_X + (CHART_WIDTH - width) / 2.0,
        y,
        width,
        height,
    })
}

/// Lay the report out on `canvas`
pub fn layout_report(canvas: &mut dyn ReportCanvas, data: &ReportData<'_>) -> Result<(), ExportError> {
    let mut y = TOP_MARGIN;

    canvas.set_font_size(24.0);
    canvas.set_text_color(Rgb::BRAND);
    canvas.text("EnviTrack", LEFT, y);

    y += 10.0;
    canvas.set_font_size(16.0);
    canvas.set_text_color(Rgb::BLACK);
    canvas.text("Environmental Monitoring Report", LEFT, y);

    y += 8.0;
    canvas.set_font_size(10.0);
    canvas.set_text_color(Rgb::MUTED);
    canvas.text(
        &format!("Generated: {}", data.generated_at.format("%Y-%m-%d %H:%M:%S UTC")),
        LEFT,
        y,
    );

    y += 12.0;
    canvas.set_font_size(14.0);
    canvas.set_text_color(Rgb::BLACK);
    canvas.text("Summary Statistics", LEFT, y);

    y += 8.0;
    canvas.set_font_size(10.0);
    let stats = data.stats;
    let rows = [
        format!("Total Data Points: {}", stats.count),
        format!("Average Temperature: {:.1}°C", stats.avg_temp),
        format!("Average Humidity: {:.1}%", stats.avg_humidity),
        format!("Average Air Quality: {:.0} ppm", stats.avg_air),
    ];
    for (i, row) in rows.iter().enumerate() {
        if i > 0 {
            y += 7.0;
        }
        canvas.text(row, 30.0, y);
    }

    y += 12.0;
    if let Some(png) = data.chart_png {
        let placed = fit_chart(png, y)?;
        canvas.add_image_png(png, placed.x, placed.y, placed.width, placed.height)?;
        debug!("Placed chart at {:?}", placed);
    }

    canvas.add_page();
    y = TOP_MARGIN;
    canvas.set_font_size(16.0);
    canvas.set_text_color(Rgb::BRAND);
    canvas.text("AI-Generated Insights", LEFT, y);
    y += 10.0;

    for insight in data.insights {
        if y > PAGE_BREAK_AT {
            canvas.add_page();
            y = TOP_MARGIN;
        }

        canvas.set_font_size(12.0);
        canvas.set_text_color(Rgb::BRAND);
        canvas.text(&format!("{} {}", insight.icon, insight.title), LEFT, y);
        y += 7.0;

        canvas.set_font_size(10.0);
        canvas.set_text_color(Rgb::BODY);
        let lines = wrap_text(&*canvas, &insight.text, INSIGHT_WRAP);
        canvas.text_lines(&lines, 25.0, y, INSIGHT_LINE);
        y += lines.len() as f32 * INSIGHT_LINE + INSIGHT_GAP;
    }

    canvas.set_font_size(8.0);
    canvas.set_text_color(Rgb::FOOTER);
    canvas.text(FOOTER_TEXT, LEFT, FOOTER_Y);
    Ok(())
}

/// Render the full report in memory
pub fn render_report(backend: &dyn PdfBackend, data: &ReportData<'_>) -> Result<Vec<u8>, ExportError> {
    let mut canvas = backend.create()?;
    layout_report(canvas.as_mut(), data)?;
    let bytes = canvas.finish()?;
    info!("Rendered report with {} insights ({} bytes)", data.insights.len(), bytes.len());
    Ok(bytes)
}
