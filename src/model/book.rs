//! Book-level types.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{Content, Page};
use crate::error::Result;

/// A segmented document: pages in source order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Book {
    /// Path of the document the book was segmented from
    source_path: PathBuf,

    /// Pages in the book
    pages: Vec<Page>,
}

impl Book {
    /// Create an empty book for the given source document.
    pub fn new(source_path: impl Into<PathBuf>) -> Self {
        Self {
            source_path: source_path.into(),
            pages: Vec::new(),
        }
    }

    /// Load a book previously written with [`crate::render::to_json`].
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a book JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Source document path, used to derive default output paths.
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// Get the number of pages in the book.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Get a page by number (1-indexed).
    pub fn get_page(&self, page_num: u32) -> Option<&Page> {
        if page_num == 0 {
            return None;
        }
        self.pages.get((page_num - 1) as usize)
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn pages_mut(&mut self) -> &mut [Page] {
        &mut self.pages
    }

    /// Add a page to the book.
    pub fn add_page(&mut self, page: Page) {
        self.pages.push(page);
    }

    /// Check if the book has any pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// All content units across all pages, in order.
    pub fn contents(&self) -> impl Iterator<Item = &Content> {
        self.pages.iter().flat_map(|p| p.contents())
    }

    /// Mutable content units across all pages, in order.
    pub fn contents_mut(&mut self) -> impl Iterator<Item = &mut Content> {
        self.pages.iter_mut().flat_map(|p| p.contents_mut().iter_mut())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TextContent;

    #[test]
    fn test_book_new() {
        let book = Book::new("docs/test.pdf");
        assert!(book.is_empty());
        assert_eq!(book.page_count(), 0);
        assert_eq!(book.source_path(), Path::new("docs/test.pdf"));
    }

    #[test]
    fn test_get_page_is_one_indexed() {
        let mut book = Book::new("a.pdf");
        book.add_page(Page::new(1));
        book.add_page(Page::new(2));

        assert!(book.get_page(0).is_none());
        assert_eq!(book.get_page(2).unwrap().number, 2);
        assert!(book.get_page(3).is_none());
    }

    #[test]
    fn test_contents_across_pages() {
        let mut book = Book::new("a.pdf");
        let mut first = Page::new(1);
        first.add_content(TextContent::new("one"));
        let mut second = Page::new(2);
        second.add_content(TextContent::new("two"));
        second.add_content(TextContent::new("three"));
        book.add_page(first);
        book.add_page(second);

        assert_eq!(book.contents().count(), 3);
        assert_eq!(book.contents_mut().count(), 3);
    }
}
