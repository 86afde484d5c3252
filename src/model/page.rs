//! Page-level types.

use serde::{Deserialize, Serialize};

use super::Content;
use crate::error::{Error, Result};

/// A single page of the book: content units in reading order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Page {
    /// Page number in the source document (1-indexed)
    pub number: u32,

    /// Content units on the page
    contents: Vec<Content>,
}

impl Page {
    /// Create an empty page.
    pub fn new(number: u32) -> Self {
        Self {
            number,
            contents: Vec::new(),
        }
    }

    /// Append a content unit.
    pub fn add_content(&mut self, content: impl Into<Content>) {
        self.contents.push(content.into());
    }

    pub fn contents(&self) -> &[Content] {
        &self.contents
    }

    /// Mutable access for the translation step.
    pub fn contents_mut(&mut self) -> &mut [Content] {
        &mut self.contents
    }

    /// Order contents top to bottom by the top edge of their bounding box.
    ///
    /// The sort is stable, so units sharing a top edge keep insertion order.
    /// Every unit must have coordinates; otherwise the page is left
    /// untouched and [`Error::Unpositioned`] names the first offender.
    pub fn sort_contents(&mut self) -> Result<()> {
        if let Some((i, content)) = self
            .contents
            .iter()
            .enumerate()
            .find(|(_, c)| c.coordinates().is_none())
        {
            return Err(Error::Unpositioned(format!(
                "{} unit {} on page {}",
                content.content_type(),
                i,
                self.number
            )));
        }

        self.contents.sort_by(|a, b| {
            let (a, b) = (a.top().unwrap_or(0.0), b.top().unwrap_or(0.0));
            a.total_cmp(&b)
        });
        Ok(())
    }

    /// Check if the page has no content units.
    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    /// Get the number of content units on the page.
    pub fn content_count(&self) -> usize {
        self.contents.len()
    }

    /// Number of units that will be rendered.
    pub fn translated_count(&self) -> usize {
        self.contents.iter().filter(|c| c.status()).count()
    }
}
