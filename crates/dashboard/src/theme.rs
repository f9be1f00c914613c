//! Light/dark theme and chart styling

/// Color theme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn from_dark_mode(dark: bool) -> Self {
        if dark {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    /// Chart colors for this theme
    pub fn palette(&self) -> ChartPalette {
        match self {
            Theme::Dark => ChartPalette {
                grid: "#334155",
                text: "#94a3b8",
            },
            Theme::Light => ChartPalette {
                grid: "#f1f5f9",
                text: "#64748b",
            },
        }
    }

    /// Icon on the theme toggle button
    pub fn toggle_icon(&self) -> &'static str {
        match self {
            Theme::Dark => "☀️",
            Theme::Light => "🌙",
        }
    }
}

/// Grid and tick label colors of the main chart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartPalette {
    pub grid: &'static str,
    pub text: &'static str,
}

/// The main readings chart
pub trait ChartHandle: Send + Sync {
    /// Restyle the chart
    fn apply_palette(&self, palette: ChartPalette);

    /// PNG snapshot for reports; `None` when the chart is not rendered
    fn snapshot_png(&self) -> Option<Vec<u8>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palettes() {
        assert_eq!(Theme::Dark.palette().grid, "#334155");
        assert_eq!(Theme::Dark.palette().text, "#94a3b8");
        assert_eq!(Theme::Light.palette().grid, "#f1f5f9");
        assert_eq!(Theme::Light.palette().text, "#64748b");
        assert_eq!(Theme::from_dark_mode(true), Theme::Dark);
        assert_eq!(Theme::from_dark_mode(false).toggle_icon(), "🌙");
    }
}
