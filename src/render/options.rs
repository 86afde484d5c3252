//! Rendering options and configuration.

use std::path::PathBuf;

/// Options for rendering a book.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// TrueType font embedded in PDF output (None = built-in Helvetica)
    pub font_path: Option<PathBuf>,

    /// Output page size for PDF
    pub page_size: PageSize,

    /// Page margin on every side, in points
    pub margin: f32,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Embed the given TrueType font for text in PDF output.
    pub fn with_font(mut self, path: impl Into<PathBuf>) -> Self {
        self.font_path = Some(path.into());
        self
    }

    /// Set the output page size.
    pub fn with_page_size(mut self, size: PageSize) -> Self {
        self.page_size = size;
        self
    }

    /// Set the page margin in points.
    pub fn with_margin(mut self, margin: f32) -> Self {
        self.margin = margin.max(0.0);
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            font_path: None,
            page_size: PageSize::Letter,
            margin: 72.0,
        }
    }
}

/// Output page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageSize {
    /// US Letter, 612 x 792 pt
    #[default]
    Letter,
    /// ISO A4, 595 x 842 pt
    A4,
}

impl PageSize {
    /// Width and height in points.
    pub fn dimensions_pt(self) -> (f32, f32) {
        match self {
            PageSize::Letter => (612.0, 792.0),
            PageSize::A4 => (595.28, 841.89),
        }
    }
}

impl std::str::FromStr for PageSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "letter" => Ok(PageSize::Letter),
            "a4" => Ok(PageSize::A4),
            _ => Err(format!("Unknown page size: {}", s)),
        }
    }
}
