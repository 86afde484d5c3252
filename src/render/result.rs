//! Rendering result with statistics.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::model::ContentType;

use super::OutputFormat;

/// Result of writing a book to disk.
#[derive(Debug, Clone)]
pub struct RenderResult {
    /// Where the artifact was written
    pub path: PathBuf,

    /// Format of the artifact
    pub format: OutputFormat,

    /// Rendering statistics
    pub stats: RenderStats,
}

/// Statistics collected while rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderStats {
    /// Source pages rendered
    pub page_count: u32,

    /// TEXT units rendered
    pub text_count: u32,

    /// TABLE units rendered
    pub table_count: u32,

    /// IMAGE units rendered
    pub image_count: u32,

    /// LINE units rendered
    pub line_count: u32,

    /// Units skipped because they were not translated
    pub skipped_count: u32,
}

impl RenderStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_page(&mut self) {
        self.page_count += 1;
    }

    /// Count one rendered unit.
    pub fn record(&mut self, content_type: ContentType) {
        match content_type {
            ContentType::Text => self.text_count += 1,
            ContentType::Table => self.table_count += 1,
            ContentType::Image => self.image_count += 1,
            ContentType::Line => self.line_count += 1,
        }
    }

    pub fn skip(&mut self) {
        self.skipped_count += 1;
    }

    /// Total rendered units.
    pub fn rendered(&self) -> u32 {
        self.text_count + self.table_count + self.image_count + self.line_count
    }
}
