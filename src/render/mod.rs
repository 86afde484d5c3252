//! Rendering module for writing translated books to output formats.

mod json;
mod markdown;
mod options;
mod pdf;
mod result;

use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::logging::Logger;
use crate::model::Book;

pub use json::{to_json, JsonFormat};
pub use markdown::{to_markdown, MarkdownRenderer};
pub use options::{PageSize, RenderOptions};
pub use pdf::PdfRenderer;
pub use result::{RenderResult, RenderStats};

/// Output format of a rendered book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Paginated PDF
    #[default]
    Pdf,
    /// Flat Markdown
    Markdown,
}

impl OutputFormat {
    /// File extension of the format.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Pdf => "pdf",
            OutputFormat::Markdown => "md",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    /// Parse a format selector, case-insensitively.
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "pdf" => Ok(OutputFormat::Pdf),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            _ => Err(Error::UnsupportedFormat(s.to_string())),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Pdf => write!(f, "PDF"),
            OutputFormat::Markdown => write!(f, "Markdown"),
        }
    }
}

/// Default output path: `dir/name.pdf` becomes `dir/name_translated.<ext>`.
pub fn default_output_path(source: &Path, format: OutputFormat) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "book".to_string());
    source.with_file_name(format!("{}_translated.{}", stem, format.extension()))
}

/// Writes translated books to disk.
#[derive(Debug, Clone, Default)]
pub struct BookWriter {
    options: RenderOptions,
    logger: Logger,
}

impl BookWriter {
    pub fn new(options: RenderOptions, logger: Logger) -> Self {
        Self { options, logger }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Render `book` and write it to `output`, or next to the source document.
    ///
    /// The whole artifact is built in memory first, so a failure leaves no
    /// output file behind.
    pub fn save(
        &self,
        book: &Book,
        output: Option<&Path>,
        format: OutputFormat,
    ) -> Result<RenderResult> {
        let path = match output {
            Some(path) => path.to_path_buf(),
            None => default_output_path(book.source_path(), format),
        };

        self.logger.info(format_args!(
            "Rendering {} pages of {} as {} to {}",
            book.page_count(),
            book.source_path().display(),
            format,
            path.display()
        ));

        let (bytes, stats) = match format {
            OutputFormat::Pdf => PdfRenderer::new(self.options.clone(), self.logger.clone())
                .render(book)?,
            OutputFormat::Markdown => {
                let (markdown, stats) = MarkdownRenderer::new(self.logger.clone()).render(book);
                (markdown.into_bytes(), stats)
            }
        };

        std::fs::write(&path, bytes)?;

        self.logger.info(format_args!(
            "Wrote {}: {} units rendered, {} skipped",
            path.display(),
            stats.rendered(),
            stats.skipped_count
        ));
        Ok(RenderResult {
            path,
            format,
            stats,
        })
    }

    /// Like [`save`](Self::save) with a textual format selector.
    ///
    /// An unknown selector is a [`Error::UnsupportedFormat`] and nothing is
    /// written.
    pub fn save_as(&self, book: &Book, output: Option<&Path>, format: &str) -> Result<RenderResult> {
        let format = format.parse::<OutputFormat>()?;
        self.save(book, output, format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("PDF".parse::<OutputFormat>().unwrap(), OutputFormat::Pdf);
        assert_eq!(
            "markdown".parse::<OutputFormat>().unwrap(),
            OutputFormat::Markdown
        );
        let err = "docx".parse::<OutputFormat>().unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(ref s) if s == "docx"));
    }

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("books/name.pdf"), OutputFormat::Pdf),
            PathBuf::from("books/name_translated.pdf")
        );
        assert_eq!(
            default_output_path(Path::new("name.pdf"), OutputFormat::Markdown),
            PathBuf::from("name_translated.md")
        );
    }

    #[test]
    fn test_unsupported_format_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.docx");
        let writer = BookWriter::default();

        let err = writer
            .save_as(&Book::new("doc.pdf"), Some(&out), "docx")
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
        assert!(!out.exists());
    }
}
