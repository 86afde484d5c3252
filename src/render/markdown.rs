//! Markdown rendering for translated books.

use std::sync::OnceLock;

use regex::Regex;

use crate::logging::Logger;
use crate::model::{Book, Content, Page, TableGrid};

use super::RenderStats;

/// Convert a translated book to Markdown.
pub fn to_markdown(book: &Book) -> String {
    MarkdownRenderer::new(Logger::global()).render(book).0
}

/// Markdown renderer.
///
/// Only the translation of each unit is written. TEXT units become plain
/// paragraphs, TABLE units pipe tables, and a `---` rule separates pages.
/// Images and lines have no Markdown form.
pub struct MarkdownRenderer {
    logger: Logger,
    stats: RenderStats,
}

impl MarkdownRenderer {
    pub fn new(logger: Logger) -> Self {
        Self {
            logger,
            stats: RenderStats::new(),
        }
    }

    /// Render a book, returning the Markdown and rendering statistics.
    pub fn render(mut self, book: &Book) -> (String, RenderStats) {
        let mut output = String::new();
        let last = book.pages().len().saturating_sub(1);

        for (i, page) in book.pages().iter().enumerate() {
            self.render_page(&mut output, page);
            if i < last {
                output.push_str("---\n\n");
            }
        }

        (output, self.stats)
    }

    fn render_page(&mut self, output: &mut String, page: &Page) {
        self.stats.add_page();

        for content in page.contents() {
            if !content.status() {
                self.stats.skip();
                continue;
            }

            match content {
                Content::Text(text) => match text.translation() {
                    Some(translation) => {
                        output.push_str(translation);
                        output.push_str("\n\n");
                        self.stats.record(content.content_type());
                    }
                    None => self.skip_untranslated(page, content),
                },
                Content::Table(table) => match table.translation() {
                    Some(grid) => {
                        render_table(output, grid);
                        self.stats.record(content.content_type());
                    }
                    None => self.skip_untranslated(page, content),
                },
                Content::Image(_) | Content::Line(_) => {}
            }
        }
    }

    fn skip_untranslated(&mut self, page: &Page, content: &Content) {
        self.logger.warn(format_args!(
            "Skipping {} unit on page {}: marked translated but has no translation",
            content.content_type(),
            page.number
        ));
        self.stats.skip();
    }
}

/// Header, separator and body rows, then a blank line.
fn render_table(output: &mut String, grid: &TableGrid) {
    let Some(header) = grid.header() else {
        return;
    };

    output.push_str(&pipe_row(header));
    output.push('\n');
    output.push_str(&pipe_row(&vec!["---".to_string(); header.len()]));
    output.push('\n');

    let body: Vec<String> = grid.body().iter().map(|row| pipe_row(row)).collect();
    output.push_str(&body.join("\n"));
    output.push_str("\n\n");
}

fn pipe_row(cells: &[String]) -> String {
    let cells: Vec<String> = cells.iter().map(|c| escape_cell(c)).collect();
    format!("| {} |", cells.join(" | "))
}

/// Keep a cell on one line and stop it from closing the column early.
fn escape_cell(cell: &str) -> String {
    static LINE_BREAKS: OnceLock<Regex> = OnceLock::new();
    let re = LINE_BREAKS.get_or_init(|| Regex::new(r"\s*\r?\n\s*").unwrap());
    re.replace_all(cell, " ").replace('|', "\\|")
}
