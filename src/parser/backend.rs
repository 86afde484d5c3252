//! Structure extractor abstraction layer.
//!
//! The segmenter does not scan document bytes itself. A structure extractor
//! supplies, per page, text lines with character style samples, raw table
//! grids, image regions and vector lines, and can rasterize a region of the
//! page on request. [`JsonExtractor`] reads a serialized extractor dump.

use std::path::{Path, PathBuf};

use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{BBox, Color, TextStyle};

/// Style sample of a single character.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawChar {
    /// Font name
    #[serde(alias = "fontname")]
    pub font: String,

    /// Font size in points
    pub size: f32,

    /// Fill color
    #[serde(default, alias = "non_stroking_color")]
    pub color: Option<Color>,
}

impl RawChar {
    pub fn style(&self) -> TextStyle {
        TextStyle::new(self.font.clone(), self.size, self.color)
    }
}

/// A line of text as reported by the extractor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawLine {
    /// Line text
    pub text: String,

    /// Line bounding box
    pub bbox: BBox,

    /// Per-character style samples; never empty for well-formed input
    pub chars: Vec<RawChar>,
}

impl RawLine {
    /// Style of the line's first character.
    pub fn first_char(&self) -> Option<&RawChar> {
        self.chars.first()
    }
}

/// A table grid as reported by the extractor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTable {
    /// Cell text by row; missing cells are `null`
    pub cells: Vec<Vec<Option<String>>>,

    /// Table region, if the extractor knows it
    #[serde(default)]
    pub bbox: Option<BBox>,
}

impl RawTable {
    /// Cells with missing values read as empty strings.
    pub fn to_rows(&self) -> Vec<Vec<String>> {
        self.cells
            .iter()
            .map(|row| row.iter().map(|c| c.clone().unwrap_or_default()).collect())
            .collect()
    }
}

/// A raster image region on the page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawImage {
    pub bbox: BBox,
}

fn default_line_width() -> f32 {
    1.0
}

/// A vector line drawn on the page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawVectorLine {
    pub x0: f32,
    pub top: f32,
    pub x1: f32,
    pub bottom: f32,

    /// Stroke width in points
    #[serde(default = "default_line_width")]
    pub width: f32,

    /// Stroke color
    #[serde(default, alias = "non_stroking_color")]
    pub color: Option<Color>,
}

/// Everything the extractor reports for one page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawPage {
    /// Page width in points
    #[serde(default)]
    pub width: f32,

    /// Page height in points
    #[serde(default)]
    pub height: f32,

    #[serde(default)]
    pub lines: Vec<RawLine>,

    #[serde(default)]
    pub tables: Vec<RawTable>,

    #[serde(default)]
    pub images: Vec<RawImage>,

    #[serde(default)]
    pub vector_lines: Vec<RawVectorLine>,

    /// Full-page raster that image regions are cropped from
    #[serde(default)]
    pub raster: Option<PathBuf>,
}

/// Abstract interface to a document structure extractor.
///
/// Pages are addressed by number, starting at 1.
pub trait StructureExtractor {
    /// Total number of pages in the document.
    fn page_count(&self) -> u32;

    /// Raw structure of one page.
    fn page(&self, number: u32) -> Result<RawPage>;

    /// Rasterize a region of a page.
    fn render_region(&self, number: u32, bbox: BBox) -> Result<DynamicImage>;
}

/// Serialized extractor output: `{"pages": [...]}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StructureDump {
    pub pages: Vec<RawPage>,
}

/// Concrete [`StructureExtractor`] over a serialized extractor dump.
///
/// Relative raster paths are resolved against the dump's directory.
#[derive(Debug, Clone)]
pub struct JsonExtractor {
    dump: StructureDump,
    base_dir: PathBuf,
}

impl JsonExtractor {
    /// Load a dump file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let mut extractor = Self::from_json(&json)?;
        extractor.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(extractor)
    }

    /// Parse a dump from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let dump: StructureDump = serde_json::from_str(json)?;
        Ok(Self::from_dump(dump))
    }

    pub fn from_dump(dump: StructureDump) -> Self {
        Self {
            dump,
            base_dir: PathBuf::new(),
        }
    }

    /// Wrap pages that are already in memory.
    pub fn from_pages(pages: Vec<RawPage>) -> Self {
        Self::from_dump(StructureDump { pages })
    }

    /// Resolve relative raster paths against `dir`.
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = dir.into();
        self
    }

    fn raw_page(&self, number: u32) -> Result<&RawPage> {
        if number == 0 {
            return Err(Error::PageOutOfRange(number, self.page_count()));
        }
        self.dump
            .pages
            .get((number - 1) as usize)
            .ok_or(Error::PageOutOfRange(number, self.page_count()))
    }
}

impl StructureExtractor for JsonExtractor {
    fn page_count(&self) -> u32 {
        self.dump.pages.len() as u32
    }

    fn page(&self, number: u32) -> Result<RawPage> {
        self.raw_page(number).cloned()
    }

    fn render_region(&self, number: u32, bbox: BBox) -> Result<DynamicImage> {
        let page = self.raw_page(number)?;
        let raster = page.raster.as_ref().ok_or_else(|| {
            Error::ImageExtract(format!("page {} has no raster to crop from", number))
        })?;
        if page.width <= 0.0 || page.height <= 0.0 {
            return Err(Error::ImageExtract(format!(
                "page {} has no dimensions",
                number
            )));
        }

        let img = image::open(self.base_dir.join(raster))?;
        crop_points(&img, page.width, page.height, bbox).ok_or_else(|| {
            Error::ImageExtract(format!("region {} is empty on page {}", bbox, number))
        })
    }
}

/// Crop a page-point region out of a full-page raster.
fn crop_points(img: &DynamicImage, width: f32, height: f32, bbox: BBox) -> Option<DynamicImage> {
    let sx = img.width() as f32 / width;
    let sy = img.height() as f32 / height;

    let x = (bbox.x0 * sx).floor().max(0.0) as u32;
    let y = (bbox.top * sy).floor().max(0.0) as u32;
    let x_end = ((bbox.x1 * sx).ceil().max(0.0) as u32).min(img.width());
    let y_end = ((bbox.bottom * sy).ceil().max(0.0) as u32).min(img.height());

    if x >= x_end || y >= y_end {
        return None;
    }
    Some(img.crop_imm(x, y, x_end - x, y_end - y))
}
