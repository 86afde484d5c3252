//! Segmentation options and configuration.

use std::path::PathBuf;

/// Options for segmenting a document into a book.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Error handling mode
    pub error_mode: ErrorMode,

    /// Process only the first N pages (None = all pages)
    pub pages: Option<u32>,

    /// Whether to rasterize and persist image regions
    pub extract_images: bool,

    /// Directory for extracted images (None = next to the source document)
    pub image_dir: Option<PathBuf>,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (skip invalid content).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Limit segmentation to the first `pages` pages.
    pub fn with_pages(mut self, pages: u32) -> Self {
        self.pages = Some(pages);
        self
    }

    /// Enable or disable image extraction.
    pub fn with_images(mut self, extract: bool) -> Self {
        self.extract_images = extract;
        self
    }

    /// Write extracted images into `dir`.
    pub fn with_image_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.image_dir = Some(dir.into());
        self
    }

    pub fn is_lenient(&self) -> bool {
        self.error_mode == ErrorMode::Lenient
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Strict,
            pages: None,
            extract_images: true,
            image_dir: None,
        }
    }
}

/// Error handling mode during segmentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on any error
    #[default]
    Strict,
    /// Skip invalid content and continue
    Lenient,
}
