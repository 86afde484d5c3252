//! Per-page segmentation of raw extractor output into content units.

use std::path::{Path, PathBuf};

use image::ImageFormat;

use crate::error::{Error, Result};
use crate::logging::Logger;
use crate::model::{BBox, ImageContent, LineContent, Page, TableContent, TextContent, TextStyle};

use super::backend::{RawImage, RawLine, RawPage, RawTable, StructureExtractor};
use super::options::{ErrorMode, ParseOptions};

/// Turns one page of raw extractor output into a sorted [`Page`].
pub struct PageSegmenter<'a> {
    options: &'a ParseOptions,
    image_dir: PathBuf,
    logger: &'a Logger,
}

/// Placement inferred for a table from the lines it owns.
#[derive(Debug, Default)]
struct TablePlacement {
    first: Option<BBox>,
    coordinates: Option<BBox>,
    style: Option<TextStyle>,
}

impl TablePlacement {
    fn add_line(&mut self, bbox: BBox, style: TextStyle) {
        let first = *self.first.get_or_insert(bbox);
        self.coordinates = Some(first.extend_to(&bbox));
        self.style = Some(style);
    }
}

/// A text run being accumulated.
#[derive(Debug)]
struct TextRun {
    text: String,
    bbox: BBox,
    style: TextStyle,
}

impl TextRun {
    fn start(line: &RawLine, style: TextStyle) -> Self {
        Self {
            text: line.text.clone(),
            bbox: line.bbox,
            style,
        }
    }

    fn push(&mut self, line: &RawLine) {
        self.text.push('\n');
        self.text.push_str(&line.text);
        self.bbox = self.bbox.extend_to(&line.bbox);
    }

    fn into_content(self) -> Option<TextContent> {
        if self.text.is_empty() {
            return None;
        }
        Some(
            TextContent::new(self.text)
                .with_coordinates(self.bbox)
                .with_style(self.style),
        )
    }
}

impl<'a> PageSegmenter<'a> {
    /// Create a segmenter writing extracted images into `image_dir`.
    pub fn new(
        options: &'a ParseOptions,
        image_dir: impl Into<PathBuf>,
        logger: &'a Logger,
    ) -> Self {
        Self {
            options,
            image_dir: image_dir.into(),
            logger,
        }
    }

    /// Segment one page.
    ///
    /// `extractor` is only consulted to rasterize image regions.
    pub fn segment(
        &self,
        number: u32,
        raw: &RawPage,
        extractor: &dyn StructureExtractor,
    ) -> Result<Page> {
        let mut page = Page::new(number);

        let flattened: Vec<String> = raw.tables.iter().map(flatten_table).collect();
        let mut placements: Vec<TablePlacement> =
            raw.tables.iter().map(|_| TablePlacement::default()).collect();
        let mut run: Option<TextRun> = None;

        for (i, line) in raw.lines.iter().enumerate() {
            let Some(first_char) = line.first_char() else {
                self.recover(Error::Other(format!(
                    "line {} on page {} has no character samples",
                    i, number
                )))?;
                continue;
            };
            let style = first_char.style();

            let needle = strip_whitespace(&line.text);
            if let Some(owner) = flattened.iter().position(|t| t.contains(needle.as_str())) {
                placements[owner].add_line(line.bbox, style);
                continue;
            }

            if let Some(current) = run.as_mut().filter(|r| r.style.size == style.size) {
                current.push(line);
                continue;
            }
            if let Some(text) = run.take().and_then(TextRun::into_content) {
                page.add_content(text);
            }
            run = Some(TextRun::start(line, style));
        }
        if let Some(text) = run.take().and_then(TextRun::into_content) {
            page.add_content(text);
        }

        for (i, (table, placement)) in raw.tables.iter().zip(placements).enumerate() {
            if let Some(content) = self.materialize_table(number, i, table, placement)? {
                page.add_content(content);
            }
        }

        if self.options.extract_images {
            for (i, image) in raw.images.iter().enumerate() {
                match self.extract_image(number, i, image, extractor) {
                    Ok(content) => page.add_content(content),
                    Err(e) => self.recover(e)?,
                }
            }
        }

        for vector in &raw.vector_lines {
            page.add_content(LineContent::new(
                BBox::new(vector.x0, vector.top, vector.x1, vector.bottom),
                vector.width,
                vector.color.unwrap_or_default(),
            ));
        }

        page.sort_contents()?;

        self.logger.debug(format_args!(
            "Page {}: {} content units from {} lines, {} tables, {} images, {} vector lines",
            number,
            page.content_count(),
            raw.lines.len(),
            raw.tables.len(),
            raw.images.len(),
            raw.vector_lines.len()
        ));
        Ok(page)
    }

    fn materialize_table(
        &self,
        number: u32,
        index: usize,
        table: &RawTable,
        placement: TablePlacement,
    ) -> Result<Option<TableContent>> {
        let mut content = TableContent::new(table.to_rows())?;

        let Some(coordinates) = placement.coordinates.or(table.bbox) else {
            self.recover(Error::Unpositioned(format!(
                "table {} on page {} matched no text line",
                index, number
            )))?;
            return Ok(None);
        };
        content.coordinates = Some(coordinates);
        if let Some(style) = placement.style {
            content.style = style;
        }
        Ok(Some(content))
    }

    fn extract_image(
        &self,
        number: u32,
        index: usize,
        image: &RawImage,
        extractor: &dyn StructureExtractor,
    ) -> Result<ImageContent> {
        let path = image_path(&self.image_dir, number, index);
        let region = extractor.render_region(number, image.bbox)?;
        region.save_with_format(&path, ImageFormat::Png)?;

        self.logger.debug(format_args!(
            "Saved image {} of page {} to {}",
            index,
            number,
            path.display()
        ));
        Ok(ImageContent::new(image.bbox, path))
    }

    /// In lenient mode log and continue; in strict mode propagate.
    fn recover(&self, error: Error) -> Result<()> {
        match self.options.error_mode {
            ErrorMode::Strict => Err(error),
            ErrorMode::Lenient => {
                self.logger.warn(format_args!("Skipping content: {}", error));
                Ok(())
            }
        }
    }
}

/// Deterministic file name of an extracted image.
pub fn image_path(dir: &Path, page: u32, index: usize) -> PathBuf {
    dir.join(format!("page_{}_img_{}.png", page, index))
}

fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// All cells concatenated in row-major order, whitespace removed.
fn flatten_table(table: &RawTable) -> String {
    table
        .cells
        .iter()
        .flatten()
        .flatten()
        .flat_map(|cell| cell.chars())
        .filter(|c| !c.is_whitespace())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Color, ContentType};
    use crate::parser::backend::{JsonExtractor, RawChar, RawVectorLine};

    fn line(text: &str, top: f32, size: f32) -> RawLine {
        RawLine {
            text: text.to_string(),
            bbox: BBox::new(72.0, top, 300.0, top + size),
            chars: vec![RawChar {
                font: "Helvetica".to_string(),
                size,
                color: Some(Color::BLACK),
            }],
        }
    }

    fn table(cells: &[&[&str]]) -> RawTable {
        RawTable {
            cells: cells
                .iter()
                .map(|r| r.iter().map(|c| Some(c.to_string())).collect())
                .collect(),
            bbox: None,
        }
    }

    fn segment(raw: RawPage, options: &ParseOptions) -> Result<Page> {
        let logger = Logger::global();
        let extractor = JsonExtractor::from_pages(vec![raw.clone()]);
        PageSegmenter::new(options, "", &logger).segment(1, &raw, &extractor)
    }

    #[test]
    fn test_same_size_lines_merge_into_one_run() {
        let raw = RawPage {
            lines: vec![
                line("First line", 100.0, 10.0),
                line("Second line", 112.0, 10.0),
                line("Third line", 124.0, 10.0),
            ],
            ..Default::default()
        };
        let page = segment(raw, &ParseOptions::default()).unwrap();

        assert_eq!(page.content_count(), 1);
        let text = page.contents()[0].as_text().unwrap();
        assert_eq!(text.original(), "First line\nSecond line\nThird line");
        assert_eq!(text.coordinates, Some(BBox::new(72.0, 100.0, 300.0, 134.0)));
        assert_eq!(text.style.size, Some(10.0));
    }

    #[test]
    fn test_size_change_closes_run() {
        let raw = RawPage {
            lines: vec![
                line("a", 100.0, 10.0),
                line("b", 112.0, 10.0),
                line("c", 124.0, 12.0),
                line("d", 138.0, 12.0),
            ],
            ..Default::default()
        };
        let page = segment(raw, &ParseOptions::default()).unwrap();

        let texts: Vec<&str> = page
            .contents()
            .iter()
            .filter_map(|c| c.as_text())
            .map(|t| t.original())
            .collect();
        assert_eq!(texts, vec!["a\nb", "c\nd"]);
    }

    #[test]
    fn test_table_lines_are_claimed_and_place_the_table() {
        let raw = RawPage {
            lines: vec![
                line("Heading", 50.0, 14.0),
                line("Name Age", 100.0, 9.0),
                line("Alice 30", 112.0, 9.0),
                line("After the table", 200.0, 14.0),
            ],
            tables: vec![table(&[&["Name", "Age"], &["Alice", "30"]])],
            ..Default::default()
        };
        let page = segment(raw, &ParseOptions::default()).unwrap();

        let kinds: Vec<ContentType> = page.contents().iter().map(|c| c.content_type()).collect();
        assert_eq!(kinds, vec![ContentType::Text, ContentType::Table]);

        let table = page.contents()[1].as_table().unwrap();
        assert_eq!(table.coordinates, Some(BBox::new(72.0, 100.0, 300.0, 121.0)));
        assert_eq!(table.style.size, Some(9.0));

        // Table lines do not break the surrounding text run.
        let texts: Vec<&str> = page
            .contents()
            .iter()
            .filter_map(|c| c.as_text())
            .map(|t| t.original())
            .collect();
        assert_eq!(texts, vec!["Heading\nAfter the table"]);
    }

    #[test]
    fn test_first_containing_table_wins() {
        let raw = RawPage {
            lines: vec![line("x", 100.0, 9.0)],
            tables: vec![table(&[&["x"]]), table(&[&["xy"]])],
            ..Default::default()
        };
        let lenient = ParseOptions::new().lenient();
        let page = segment(raw, &lenient).unwrap();

        // The second table owns no line and has no bbox of its own.
        assert_eq!(page.content_count(), 1);
        assert!(page.contents()[0].as_table().is_some());
    }

    #[test]
    fn test_unplaced_table() {
        let raw = RawPage {
            tables: vec![table(&[&["a"]])],
            ..Default::default()
        };
        let err = segment(raw.clone(), &ParseOptions::default()).unwrap_err();
        assert!(matches!(err, Error::Unpositioned(_)));

        let page = segment(raw.clone(), &ParseOptions::new().lenient()).unwrap();
        assert!(page.is_empty());

        let mut placed = raw;
        placed.tables[0].bbox = Some(BBox::new(0.0, 10.0, 50.0, 40.0));
        let page = segment(placed, &ParseOptions::default()).unwrap();
        assert_eq!(page.contents()[0].top(), Some(10.0));
    }

    #[test]
    fn test_ragged_table_is_fatal() {
        let raw = RawPage {
            tables: vec![table(&[&["a"], &["b", "c"]])],
            ..Default::default()
        };
        let err = segment(raw, &ParseOptions::new().lenient()).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch(_)));
    }

    #[test]
    fn test_vector_lines_sorted_among_text() {
        let raw = RawPage {
            lines: vec![line("above", 100.0, 10.0), line("below", 300.0, 12.0)],
            vector_lines: vec![RawVectorLine {
                x0: 72.0,
                top: 200.0,
                x1: 540.0,
                bottom: 200.0,
                width: 0.5,
                color: None,
            }],
            ..Default::default()
        };
        let page = segment(raw, &ParseOptions::default()).unwrap();

        let tops: Vec<f32> = page.contents().iter().filter_map(|c| c.top()).collect();
        assert_eq!(tops, vec![100.0, 200.0, 300.0]);
        let stroke = page.contents()[1].as_line().unwrap();
        assert_eq!(stroke.line_width, 0.5);
        assert_eq!(stroke.line_color, Color::BLACK);
    }

    #[test]
    fn test_image_failure_respects_error_mode() {
        // No raster to crop from.
        let raw = RawPage {
            width: 612.0,
            height: 792.0,
            images: vec![RawImage {
                bbox: BBox::new(10.0, 10.0, 20.0, 20.0),
            }],
            ..Default::default()
        };
        assert!(segment(raw.clone(), &ParseOptions::default()).is_err());
        assert!(segment(raw.clone(), &ParseOptions::new().lenient())
            .unwrap()
            .is_empty());
        assert!(segment(raw, &ParseOptions::new().with_images(false))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_flatten_and_image_path() {
        let t = table(&[&["Na me", "A\nge"], &["x", " y "]]);
        assert_eq!(flatten_table(&t), "NameAgexy");
        assert_eq!(
            image_path(Path::new("docs"), 3, 1),
            PathBuf::from("docs/page_3_img_1.png")
        );
    }
}
