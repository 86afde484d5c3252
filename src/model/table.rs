//! Table types.

use serde::{Deserialize, Serialize};

use super::content::ensure_unset;
use super::{BBox, ContentType, TextStyle, Translation};
use crate::error::{Error, Result};
use crate::logging::Logger;

/// A rectangular grid of cell text.
///
/// Rows shorter than the widest row are padded with empty cells, so every
/// row has exactly [`column_count`](Self::column_count) cells. The first row
/// doubles as the header when the grid is rendered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Vec<String>>", into = "Vec<Vec<String>>")]
pub struct TableGrid {
    rows: Vec<Vec<String>>,
    columns: usize,
}

impl TableGrid {
    /// Build a grid, padding short rows.
    pub fn from_rows(mut rows: Vec<Vec<String>>) -> Self {
        let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut rows {
            row.resize(columns, String::new());
        }
        Self { rows, columns }
    }

    /// Parse whitespace-separated rows, one per line.
    ///
    /// Every row must have as many cells as the first (header) row; a ragged
    /// or empty text is a [`Error::ShapeMismatch`].
    pub fn parse(text: &str) -> Result<Self> {
        let rows: Vec<Vec<String>> = text
            .trim()
            .lines()
            .map(|line| line.split_whitespace().map(str::to_string).collect())
            .collect();

        let header_len = match rows.first() {
            Some(header) if !header.is_empty() => header.len(),
            _ => return Err(Error::ShapeMismatch("table text is empty".into())),
        };

        if let Some((i, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != header_len)
        {
            return Err(Error::ShapeMismatch(format!(
                "row {} has {} cells, header has {}",
                i,
                row.len(),
                header_len
            )));
        }

        Ok(Self {
            rows,
            columns: header_len,
        })
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// First row, rendered as the header.
    pub fn header(&self) -> Option<&[String]> {
        self.rows.first().map(Vec::as_slice)
    }

    /// Rows after the header.
    pub fn body(&self) -> &[Vec<String>] {
        self.rows.get(1..).unwrap_or(&[])
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    /// Replace one cell's text.
    pub fn set_cell(&mut self, row: usize, col: usize, value: impl Into<String>) -> Result<()> {
        let (rows, columns) = (self.rows.len(), self.columns);
        let cell = self
            .rows
            .get_mut(row)
            .and_then(|r| r.get_mut(col))
            .ok_or_else(|| {
                Error::ShapeMismatch(format!(
                    "cell ({}, {}) is outside a {}x{} grid",
                    row, col, rows, columns
                ))
            })?;
        *cell = value.into();
        Ok(())
    }

    /// Cells in row-major order as `(row, column, text)`.
    pub fn iter_items(&self) -> impl Iterator<Item = (usize, usize, &str)> + '_ {
        self.rows.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .map(move |(c, cell)| (r, c, cell.as_str()))
        })
    }

    /// Right-aligned columns separated by a space, no header or index.
    pub fn to_aligned_text(&self) -> String {
        let widths: Vec<usize> = (0..self.columns)
            .map(|c| {
                self.rows
                    .iter()
                    .map(|row| row[c].chars().count())
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        self.rows
            .iter()
            .map(|row| {
                row.iter()
                    .zip(&widths)
                    .map(|(cell, &w)| format!("{:>w$}", cell, w = w))
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl From<Vec<Vec<String>>> for TableGrid {
    fn from(rows: Vec<Vec<String>>) -> Self {
        TableGrid::from_rows(rows)
    }
}

impl From<TableGrid> for Vec<Vec<String>> {
    fn from(grid: TableGrid) -> Self {
        grid.rows
    }
}

/// A table content unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableContent {
    original: TableGrid,

    #[serde(default)]
    translation: Option<TableGrid>,

    #[serde(default)]
    status: bool,

    /// Bounding box in page space
    pub coordinates: Option<BBox>,

    /// Style of the last row encountered on the page
    #[serde(default)]
    pub style: TextStyle,
}

impl TableContent {
    /// Build a table from the extractor's raw cell grid.
    ///
    /// The built grid must keep the raw row count and the first row's
    /// column count, otherwise this is a [`Error::ShapeMismatch`].
    pub fn new(data: Vec<Vec<String>>) -> Result<Self> {
        let Some(first) = data.first() else {
            return Err(Error::ShapeMismatch("table has no rows".into()));
        };
        let (rows, first_columns) = (data.len(), first.len());

        let original = TableGrid::from_rows(data);
        if original.row_count() != rows || original.column_count() != first_columns {
            return Err(Error::ShapeMismatch(format!(
                "extracted table is {}x{} but the built grid is {}x{}",
                rows,
                first_columns,
                original.row_count(),
                original.column_count()
            )));
        }

        Ok(Self {
            original,
            translation: None,
            status: false,
            coordinates: None,
            style: TextStyle::default(),
        })
    }

    pub fn original(&self) -> &TableGrid {
        &self.original
    }

    pub fn translation(&self) -> Option<&TableGrid> {
        self.translation.as_ref()
    }

    pub fn status(&self) -> bool {
        self.status
    }

    /// Original grid as aligned text, the form handed to translators.
    pub fn original_as_text(&self) -> String {
        self.original.to_aligned_text()
    }

    /// Store a translated table.
    ///
    /// Accepts whitespace-separated text (first line is the header) or a
    /// ready grid. A malformed payload does not raise: the error is logged
    /// and the unit ends up with `status == false` and no translation. Only
    /// a second write to a filled slot is an error.
    pub fn set_translation(
        &mut self,
        value: Translation,
        status: bool,
        logger: &Logger,
    ) -> Result<()> {
        ensure_unset(&self.translation)?;

        let parsed = match value {
            Translation::Text(text) => {
                logger.debug(format_args!("table translation text: {}", text));
                TableGrid::parse(&text)
            }
            Translation::Table(grid) if !grid.is_empty() => Ok(grid),
            Translation::Table(_) => Err(Error::ShapeMismatch("translated table is empty".into())),
            other => Err(Error::TypeMismatch {
                expected: ContentType::Table,
                found: other.kind(),
            }),
        };

        match parsed {
            Ok(grid) => {
                logger.debug(format_args!(
                    "table translated to {}x{} grid",
                    grid.row_count(),
                    grid.column_count()
                ));
                self.translation = Some(grid);
                self.status = status;
            }
            Err(e) => {
                logger.error(format_args!(
                    "An error occurred during table translation: {}",
                    e
                ));
                self.translation = None;
                self.status = false;
            }
        }
        Ok(())
    }

    /// Cells of the original (or translated) grid as `(row, column, text)`.
    pub fn iter_items(&self, translated: bool) -> impl Iterator<Item = (usize, usize, &str)> + '_ {
        let grid = if translated {
            self.translation.as_ref()
        } else {
            Some(&self.original)
        };
        grid.into_iter().flat_map(TableGrid::iter_items)
    }

    /// Replace one cell of the original (or translated) grid.
    pub fn update_item(
        &mut self,
        row: usize,
        col: usize,
        value: impl Into<String>,
        translated: bool,
    ) -> Result<()> {
        let grid = if translated {
            self.translation
                .as_mut()
                .ok_or_else(|| Error::Other("table has no translation to update".into()))?
        } else {
            &mut self.original
        };
        grid.set_cell(row, col, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(data: &[&[&str]]) -> Vec<Vec<String>> {
        data.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_table_keeps_shape() {
        let table = TableContent::new(rows(&[&["Name", "Age"], &["Alice", "30"], &["Bob", "25"]]))
            .unwrap();
        assert_eq!(table.original().row_count(), 3);
        assert_eq!(table.original().column_count(), 2);
        assert!(!table.status());
    }

    #[test]
    fn test_table_shape_mismatch() {
        // A later row is wider than the first one.
        let err = TableContent::new(rows(&[&["a"], &["b", "c"]])).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch(_)));

        let err = TableContent::new(Vec::new()).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch(_)));
    }

    #[test]
    fn test_short_rows_are_padded() {
        let table = TableContent::new(rows(&[&["a", "b"], &["c"]])).unwrap();
        assert_eq!(table.original().cell(1, 1), Some(""));
    }

    #[test]
    fn test_grid_parse() {
        let grid = TableGrid::parse("Name Age\nAlice 30\nBob 25\n").unwrap();
        assert_eq!(grid.header().unwrap(), &["Name".to_string(), "Age".to_string()]);
        assert_eq!(grid.body().len(), 2);

        assert!(TableGrid::parse("a b\nc").is_err());
        assert!(TableGrid::parse("   ").is_err());
    }

    #[test]
    fn test_table_translation_text() {
        let mut table = TableContent::new(rows(&[&["Name", "Age"], &["Alice", "30"]])).unwrap();
        table
            .set_translation("Nom Âge\nAlice 30".into(), true, &Logger::global())
            .unwrap();
        assert!(table.status());
        assert_eq!(table.translation().unwrap().cell(0, 1), Some("Âge"));
    }

    #[test]
    fn test_table_translation_malformed_is_swallowed() {
        let mut table = TableContent::new(rows(&[&["Name", "Age"], &["Alice", "30"]])).unwrap();
        table
            .set_translation("Nom Âge\nAlice".into(), true, &Logger::global())
            .unwrap();
        assert!(!table.status());
        assert!(table.translation().is_none());

        // Slot still unset, so a corrected payload is accepted.
        table
            .set_translation("Nom Âge\nAlice 30".into(), true, &Logger::global())
            .unwrap();
        assert!(table.status());
    }

    #[test]
    fn test_table_translation_wrong_payload_is_swallowed() {
        let mut table = TableContent::new(rows(&[&["a"]])).unwrap();
        let result = table.set_translation(
            Translation::Image(image::DynamicImage::new_rgb8(1, 1)),
            true,
            &Logger::global(),
        );
        assert!(result.is_ok());
        assert!(!table.status());
    }

    #[test]
    fn test_iter_and_update_items() {
        let mut table = TableContent::new(rows(&[&["a", "b"], &["c", "d"]])).unwrap();
        let items: Vec<_> = table.iter_items(false).collect();
        assert_eq!(items[3], (1, 1, "d"));
        assert_eq!(table.iter_items(true).count(), 0);

        table.update_item(1, 1, "z", false).unwrap();
        assert_eq!(table.original().cell(1, 1), Some("z"));
        assert!(table.update_item(5, 0, "x", false).is_err());
        assert!(table.update_item(0, 0, "x", true).is_err());
    }

    #[test]
    fn test_original_as_text() {
        let table = TableContent::new(rows(&[&["Name", "Age"], &["Al", "3"]])).unwrap();
        assert_eq!(table.original_as_text(), "Name Age\n  Al   3");
    }
}
