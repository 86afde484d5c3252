//! Content units: the typed blocks a page is segmented into.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use image::DynamicImage;
use serde::{Deserialize, Serialize};

use super::{BBox, Color, TableContent, TableGrid};
use crate::error::{Error, Result};
use crate::logging::Logger;

/// Kind of a content unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Text,
    Table,
    Image,
    Line,
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentType::Text => write!(f, "text"),
            ContentType::Table => write!(f, "table"),
            ContentType::Image => write!(f, "image"),
            ContentType::Line => write!(f, "line"),
        }
    }
}

/// Font styling sampled from the extractor's character stream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Font name (e.g., "SimSun", "Helvetica-Bold")
    #[serde(default)]
    pub font: Option<String>,

    /// Font size in points
    #[serde(default)]
    pub size: Option<f32>,

    /// Fill color of the glyphs
    #[serde(default)]
    pub color: Option<Color>,
}

impl TextStyle {
    pub fn new(font: impl Into<String>, size: f32, color: Option<Color>) -> Self {
        Self {
            font: Some(font.into()),
            size: Some(size),
            color,
        }
    }
}

/// A translated payload handed to [`Content::set_translation`].
#[derive(Debug, Clone)]
pub enum Translation {
    /// Translated text (TEXT units; raw table text for TABLE units)
    Text(String),
    /// Translated table grid
    Table(TableGrid),
    /// Replacement image
    Image(DynamicImage),
}

impl Translation {
    /// Name of the payload's shape, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Translation::Text(_) => "text",
            Translation::Table(_) => "table",
            Translation::Image(_) => "image",
        }
    }
}

impl From<String> for Translation {
    fn from(text: String) -> Self {
        Translation::Text(text)
    }
}

impl From<&str> for Translation {
    fn from(text: &str) -> Self {
        Translation::Text(text.to_string())
    }
}

impl From<TableGrid> for Translation {
    fn from(grid: TableGrid) -> Self {
        Translation::Table(grid)
    }
}

/// A single positioned unit of page content.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Content {
    /// A merged run of text lines
    Text(TextContent),
    /// A table grid
    Table(TableContent),
    /// A raster image persisted to disk
    Image(ImageContent),
    /// A vector stroke
    Line(LineContent),
}

impl Content {
    pub fn content_type(&self) -> ContentType {
        match self {
            Content::Text(_) => ContentType::Text,
            Content::Table(_) => ContentType::Table,
            Content::Image(_) => ContentType::Image,
            Content::Line(_) => ContentType::Line,
        }
    }

    /// Whether the unit should be rendered.
    pub fn status(&self) -> bool {
        match self {
            Content::Text(t) => t.status(),
            Content::Table(t) => t.status(),
            Content::Image(i) => i.status(),
            Content::Line(l) => l.status(),
        }
    }

    pub fn coordinates(&self) -> Option<BBox> {
        match self {
            Content::Text(t) => t.coordinates,
            Content::Table(t) => t.coordinates,
            Content::Image(i) => i.coordinates,
            Content::Line(l) => l.coordinates,
        }
    }

    /// Top edge of the unit, the reading-order sort key.
    pub fn top(&self) -> Option<f32> {
        self.coordinates().map(|b| b.top)
    }

    /// Text styling; only TEXT and TABLE units carry one.
    pub fn style(&self) -> Option<&TextStyle> {
        match self {
            Content::Text(t) => Some(&t.style),
            Content::Table(t) => Some(&t.style),
            Content::Image(_) | Content::Line(_) => None,
        }
    }

    /// Original text of the unit, if it has any.
    pub fn original_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Content::Text(t) => Some(Cow::Borrowed(t.original())),
            Content::Table(t) => Some(Cow::Owned(t.original_as_text())),
            Content::Image(_) | Content::Line(_) => None,
        }
    }

    /// Whether the unit carries something a translator can work on.
    pub fn is_translatable(&self) -> bool {
        matches!(self, Content::Text(_) | Content::Table(_))
    }

    /// Store a translation, validating its shape against the unit type.
    ///
    /// TEXT and IMAGE units reject mismatched payloads with
    /// [`Error::TypeMismatch`] and stay unchanged. TABLE units never raise on
    /// a malformed payload: the failure is logged and the unit is marked
    /// untranslated. A filled slot is never overwritten.
    pub fn set_translation(
        &mut self,
        value: Translation,
        status: bool,
        logger: &Logger,
    ) -> Result<()> {
        match self {
            Content::Text(t) => t.set_translation(value, status),
            Content::Table(t) => t.set_translation(value, status, logger),
            Content::Image(i) => i.set_translation(value, status),
            Content::Line(l) => l.set_translation(value, status),
        }
    }

    pub fn as_text(&self) -> Option<&TextContent> {
        match self {
            Content::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&TableContent> {
        match self {
            Content::Table(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_table_mut(&mut self) -> Option<&mut TableContent> {
        match self {
            Content::Table(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_image(&self) -> Option<&ImageContent> {
        match self {
            Content::Image(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_line(&self) -> Option<&LineContent> {
        match self {
            Content::Line(l) => Some(l),
            _ => None,
        }
    }
}

impl From<TextContent> for Content {
    fn from(t: TextContent) -> Self {
        Content::Text(t)
    }
}

impl From<TableContent> for Content {
    fn from(t: TableContent) -> Self {
        Content::Table(t)
    }
}

impl From<ImageContent> for Content {
    fn from(i: ImageContent) -> Self {
        Content::Image(i)
    }
}

impl From<LineContent> for Content {
    fn from(l: LineContent) -> Self {
        Content::Line(l)
    }
}

impl std::fmt::Display for Content {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Content::Text(t) => write!(f, "{}", t.original()),
            Content::Table(t) => write!(f, "{}", t.original_as_text()),
            Content::Image(i) => match i.coordinates {
                Some(bbox) => write!(f, "Image at {} from {}", bbox, i.imagepath.display()),
                None => write!(f, "Image from {}", i.imagepath.display()),
            },
            Content::Line(l) => match l.coordinates {
                Some(bbox) => write!(
                    f,
                    "Line from ({:.1}, {:.1}) to ({:.1}, {:.1}) with width {}",
                    bbox.x0, bbox.top, bbox.x1, bbox.bottom, l.line_width
                ),
                None => write!(f, "Line with width {}", l.line_width),
            },
        }
    }
}

/// Reject writes into a filled translation slot.
pub(crate) fn ensure_unset<T>(slot: &Option<T>) -> Result<()> {
    if slot.is_some() {
        return Err(Error::AlreadyTranslated);
    }
    Ok(())
}

/// A run of consecutive same-size text lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextContent {
    original: String,

    #[serde(default)]
    translation: Option<String>,

    #[serde(default)]
    status: bool,

    /// Bounding box in page space
    pub coordinates: Option<BBox>,

    /// Style of the first character of the run
    #[serde(default)]
    pub style: TextStyle,
}

impl TextContent {
    pub fn new(original: impl Into<String>) -> Self {
        Self {
            original: original.into(),
            translation: None,
            status: false,
            coordinates: None,
            style: TextStyle::default(),
        }
    }

    pub fn with_coordinates(mut self, bbox: BBox) -> Self {
        self.coordinates = Some(bbox);
        self
    }

    pub fn with_style(mut self, style: TextStyle) -> Self {
        self.style = style;
        self
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn translation(&self) -> Option<&str> {
        self.translation.as_deref()
    }

    pub fn status(&self) -> bool {
        self.status
    }

    /// Store translated text. Any other payload is a [`Error::TypeMismatch`].
    pub fn set_translation(&mut self, value: Translation, status: bool) -> Result<()> {
        let found = value.kind();
        let Translation::Text(text) = value else {
            return Err(Error::TypeMismatch {
                expected: ContentType::Text,
                found,
            });
        };
        ensure_unset(&self.translation)?;
        self.translation = Some(text);
        self.status = status;
        Ok(())
    }
}

fn default_true() -> bool {
    true
}

/// A raster image cropped from the page and persisted to disk.
///
/// The file at `imagepath` is owned by the filesystem; the unit only
/// references it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageContent {
    /// Bounding box in page space
    pub coordinates: Option<BBox>,

    imagepath: PathBuf,

    #[serde(skip)]
    translation: Option<DynamicImage>,

    #[serde(default = "default_true")]
    status: bool,
}

impl ImageContent {
    /// Images need no translation, so they start out renderable.
    pub fn new(coordinates: BBox, imagepath: impl Into<PathBuf>) -> Self {
        Self {
            coordinates: Some(coordinates),
            imagepath: imagepath.into(),
            translation: None,
            status: true,
        }
    }

    pub fn imagepath(&self) -> &Path {
        &self.imagepath
    }

    pub fn status(&self) -> bool {
        self.status
    }

    pub fn translation(&self) -> Option<&DynamicImage> {
        self.translation.as_ref()
    }

    /// Decode the referenced image file.
    pub fn load_image(&self) -> Result<DynamicImage> {
        Ok(image::open(&self.imagepath)?)
    }

    /// Store a replacement image. Any other payload is a [`Error::TypeMismatch`].
    pub fn set_translation(&mut self, value: Translation, status: bool) -> Result<()> {
        let found = value.kind();
        let Translation::Image(img) = value else {
            return Err(Error::TypeMismatch {
                expected: ContentType::Image,
                found,
            });
        };
        ensure_unset(&self.translation)?;
        self.translation = Some(img);
        self.status = status;
        Ok(())
    }
}

/// A vector stroke.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineContent {
    /// Endpoints as a bounding box in page space
    pub coordinates: Option<BBox>,

    /// Stroke width in points
    pub line_width: f32,

    /// Stroke color
    #[serde(default)]
    pub line_color: Color,
}

impl LineContent {
    pub fn new(coordinates: BBox, line_width: f32, line_color: Color) -> Self {
        Self {
            coordinates: Some(coordinates),
            line_width,
            line_color,
        }
    }

    /// Lines have nothing to translate and always render.
    pub fn status(&self) -> bool {
        true
    }

    /// Lines accept no payload at all.
    pub fn set_translation(&mut self, value: Translation, _status: bool) -> Result<()> {
        Err(Error::TypeMismatch {
            expected: ContentType::Line,
            found: value.kind(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_unit() -> Content {
        TextContent::new("Hello")
            .with_coordinates(BBox::new(0.0, 10.0, 100.0, 22.0))
            .with_style(TextStyle::new("Helvetica", 12.0, Some(Color::BLACK)))
            .into()
    }

    #[test]
    fn test_text_translation() {
        let mut content = text_unit();
        assert!(!content.status());

        content
            .set_translation("Bonjour".into(), true, &Logger::global())
            .unwrap();
        assert!(content.status());
        assert_eq!(content.as_text().unwrap().translation(), Some("Bonjour"));
    }

    #[test]
    fn test_text_rejects_non_text_payload() {
        let mut content = text_unit();
        let grid = TableGrid::from_rows(vec![vec!["a".to_string()]]);

        let err = content
            .set_translation(Translation::Table(grid), true, &Logger::global())
            .unwrap_err();
        assert!(matches!(
            err,
            Error::TypeMismatch {
                expected: ContentType::Text,
                found: "table"
            }
        ));
        assert!(!content.status());
        assert_eq!(content.as_text().unwrap().translation(), None);
    }

    #[test]
    fn test_translation_slot_is_set_once() {
        let mut content = text_unit();
        let logger = Logger::global();
        content.set_translation("first".into(), false, &logger).unwrap();

        let err = content
            .set_translation("second".into(), true, &logger)
            .unwrap_err();
        assert!(matches!(err, Error::AlreadyTranslated));
        assert!(!content.status());
        assert_eq!(content.as_text().unwrap().translation(), Some("first"));
    }

    #[test]
    fn test_image_defaults_to_renderable() {
        let mut content: Content =
            ImageContent::new(BBox::new(0.0, 0.0, 10.0, 10.0), "page_1_img_0.png").into();
        assert!(content.status());
        assert!(content.original_text().is_none());

        let err = content
            .set_translation("caption".into(), true, &Logger::global())
            .unwrap_err();
        assert!(matches!(
            err,
            Error::TypeMismatch {
                expected: ContentType::Image,
                ..
            }
        ));
        assert!(content.status());

        let replacement = DynamicImage::new_rgb8(2, 2);
        content
            .set_translation(Translation::Image(replacement), true, &Logger::global())
            .unwrap();
        assert!(content.as_image().unwrap().translation().is_some());
    }

    #[test]
    fn test_line_rejects_every_payload() {
        let mut content: Content =
            LineContent::new(BBox::new(0.0, 5.0, 100.0, 5.0), 1.0, Color::BLACK).into();
        assert!(content.status());
        assert!(content.style().is_none());
        assert!(content
            .set_translation("x".into(), true, &Logger::global())
            .is_err());
    }

    #[test]
    fn test_content_serde_tagged() {
        let content = text_unit();
        let json = serde_json::to_string(&content).unwrap();
        assert!(json.contains("\"type\":\"text\""));

        let back: Content = serde_json::from_str(&json).unwrap();
        assert_eq!(back.content_type(), ContentType::Text);
        assert_eq!(back.top(), Some(10.0));
    }

    #[test]
    fn test_display() {
        let line: Content =
            LineContent::new(BBox::new(0.0, 5.0, 100.0, 5.0), 2.0, Color::BLACK).into();
        assert_eq!(
            line.to_string(),
            "Line from (0.0, 5.0) to (100.0, 5.0) with width 2"
        );
    }
}
