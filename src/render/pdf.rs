//! PDF rendering for translated books, built on `printpdf`.
//!
//! Content flows top to bottom through a single frame inside the page
//! margins. Each source page starts a new output page; a unit that does not
//! fit in the remaining frame space continues on a fresh page.

use std::borrow::Cow;

use image::DynamicImage;
use printpdf::{
    BuiltinFont, Color as PdfColor, FontId, Line, LinePoint, Mm, Op, PaintMode, ParsedFont,
    PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Point, Polygon, PolygonRing, Pt, RawImage,
    RawImageData, RawImageFormat, Rgb, TextItem, WindingOrder, XObjectTransform,
};

use crate::error::{Error, Result};
use crate::logging::Logger;
use crate::model::{Book, Color, Content, LineContent, TableGrid, TextStyle};

use super::{RenderOptions, RenderStats};

/// Font size used when a unit carries no size.
const DEFAULT_FONT_SIZE: f32 = 12.0;
/// Font size of table body cells.
const TABLE_BODY_FONT_SIZE: f32 = 10.0;
const CELL_PADDING: f32 = 3.0;
const GRID_WIDTH: f32 = 1.0;

/// PDF renderer.
pub struct PdfRenderer {
    options: RenderOptions,
    logger: Logger,
}

impl PdfRenderer {
    pub fn new(options: RenderOptions, logger: Logger) -> Self {
        Self { options, logger }
    }

    /// Render a book to PDF bytes.
    pub fn render(&self, book: &Book) -> Result<(Vec<u8>, RenderStats)> {
        let title = book
            .source_path()
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Translated book".to_string());

        let mut doc = PdfDocument::new(&title);
        let (pages, stats) = self.layout(book, &mut doc)?;
        doc.with_pages(pages);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);
        if !warnings.is_empty() {
            self.logger.debug(format_args!(
                "PDF serialization produced {} warnings",
                warnings.len()
            ));
        }
        Ok((bytes, stats))
    }

    fn layout(&self, book: &Book, doc: &mut PdfDocument) -> Result<(Vec<PdfPage>, RenderStats)> {
        let font = self.load_font(doc)?;
        let (width, height) = self.options.page_size.dimensions_pt();
        let mut layout = Layout::new(width, height, self.options.margin, font);
        let mut stats = RenderStats::new();

        for (i, page) in book.pages().iter().enumerate() {
            if i > 0 {
                layout.new_page();
            }
            stats.add_page();

            for content in page.contents() {
                if !content.status() {
                    stats.skip();
                    continue;
                }

                let drawn = match content {
                    Content::Text(text) => match text.translation() {
                        Some(translation) => {
                            layout.paragraph(translation, &text.style);
                            true
                        }
                        None => false,
                    },
                    Content::Table(table) => match table.translation() {
                        Some(grid) => {
                            layout.table(grid, &table.style);
                            true
                        }
                        None => false,
                    },
                    Content::Image(image) => {
                        let img = match image.translation() {
                            Some(replacement) => Cow::Borrowed(replacement),
                            None => Cow::Owned(image.load_image()?),
                        };
                        layout.image(doc, &img)?;
                        true
                    }
                    Content::Line(line) => {
                        layout.line(line)?;
                        true
                    }
                };

                if drawn {
                    stats.record(content.content_type());
                } else {
                    self.logger.warn(format_args!(
                        "Skipping {} unit on page {}: marked translated but has no translation",
                        content.content_type(),
                        page.number
                    ));
                    stats.skip();
                }
            }
        }

        Ok((layout.finish(), stats))
    }

    fn load_font(&self, doc: &mut PdfDocument) -> Result<PdfFont> {
        let Some(path) = &self.options.font_path else {
            return Ok(PdfFont::Builtin(BuiltinFont::Helvetica));
        };

        let bytes = std::fs::read(path)?;
        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let parsed = ParsedFont::from_bytes(&bytes, 0, &mut warnings)
            .ok_or_else(|| Error::Render(format!("Cannot parse font {}", path.display())))?;

        self.logger
            .debug(format_args!("Embedding font {}", path.display()));
        Ok(PdfFont::External(doc.add_font(&parsed)))
    }
}

#[derive(Debug, Clone)]
enum PdfFont {
    Builtin(BuiltinFont),
    External(FontId),
}

/// Flow layout state. Coordinates are PDF points from the bottom-left.
struct Layout {
    width: f32,
    height: f32,
    margin: f32,
    font: PdfFont,
    pages: Vec<PdfPage>,
    ops: Vec<Op>,
    /// Top of the free frame space
    cursor: f32,
}

impl Layout {
    fn new(width: f32, height: f32, margin: f32, font: PdfFont) -> Self {
        Self {
            width,
            height,
            margin,
            font,
            pages: Vec::new(),
            ops: Vec::new(),
            cursor: height - margin,
        }
    }

    fn frame_left(&self) -> f32 {
        self.margin
    }

    fn frame_top(&self) -> f32 {
        self.height - self.margin
    }

    fn frame_width(&self) -> f32 {
        (self.width - 2.0 * self.margin).max(1.0)
    }

    fn frame_height(&self) -> f32 {
        (self.height - 2.0 * self.margin).max(1.0)
    }

    fn at_top(&self) -> bool {
        self.cursor >= self.frame_top()
    }

    /// Close the current output page and start a new one.
    fn new_page(&mut self) {
        let ops = std::mem::take(&mut self.ops);
        self.pages.push(PdfPage::new(to_mm(self.width), to_mm(self.height), ops));
        self.cursor = self.frame_top();
    }

    /// Break the page unless `needed` points fit below the cursor.
    fn ensure_space(&mut self, needed: f32) {
        if self.cursor - needed < self.margin && !self.at_top() {
            self.new_page();
        }
    }

    fn finish(mut self) -> Vec<PdfPage> {
        self.new_page();
        self.pages
    }

    /// Wrapped paragraph at the unit's font size, leading `round(size * 1.2)`.
    ///
    /// Line breaks inside the text are treated as spaces.
    fn paragraph(&mut self, text: &str, style: &TextStyle) {
        let size = style.size.unwrap_or(DEFAULT_FONT_SIZE).round().max(1.0);
        let leading = (size * 1.2).round();
        let color = style.color.unwrap_or_default();

        for line in wrap_text(text, size, self.frame_width()) {
            self.ensure_space(leading);
            let baseline = self.cursor - size;
            self.write_text(&line, self.frame_left(), baseline, size, color);
            self.cursor -= leading;
        }
    }

    /// Grid with a grey header row and beige body rows, equal column widths.
    fn table(&mut self, grid: &TableGrid, style: &TextStyle) {
        let columns = grid.column_count();
        if columns == 0 {
            return;
        }
        let header_size = style.size.unwrap_or(DEFAULT_FONT_SIZE).round().max(1.0);
        let column_width = self.frame_width() / columns as f32;

        for (r, row) in grid.rows().iter().enumerate() {
            let (size, bottom_padding, fill, text_color) = if r == 0 {
                (header_size, header_size, Color::GREY, Color::WHITESMOKE)
            } else {
                (TABLE_BODY_FONT_SIZE, CELL_PADDING, Color::BEIGE, Color::BLACK)
            };
            let row_height = CELL_PADDING + size * 1.2 + bottom_padding;
            self.ensure_space(row_height);
            let bottom = self.cursor - row_height;

            for (c, cell) in row.iter().enumerate() {
                let x0 = self.frame_left() + c as f32 * column_width;
                self.cell(x0, bottom, column_width, row_height, fill);
                if cell.is_empty() {
                    continue;
                }
                let offset = (column_width - text_width(cell, size)).max(0.0) / 2.0;
                let baseline = bottom + bottom_padding + size * 0.2;
                self.write_text(cell, x0 + offset, baseline, size, text_color);
            }
            self.cursor = bottom;
        }
    }

    /// Image at 72 dpi, centered, scaled down to fit the frame.
    fn image(&mut self, doc: &mut PdfDocument, img: &DynamicImage) -> Result<()> {
        if img.width() == 0 || img.height() == 0 {
            return Err(Error::Render("Cannot place an empty image".to_string()));
        }
        let (w, h) = (img.width() as f32, img.height() as f32);
        let scale = (self.frame_width() / w)
            .min(self.frame_height() / h)
            .min(1.0);
        let (drawn_w, drawn_h) = (w * scale, h * scale);

        self.ensure_space(drawn_h);
        let x = self.frame_left() + (self.frame_width() - drawn_w) / 2.0;
        let y = self.cursor - drawn_h;

        let raw = RawImage {
            pixels: RawImageData::U8(img.to_rgb8().into_raw()),
            width: img.width() as usize,
            height: img.height() as usize,
            data_format: RawImageFormat::RGB8,
            tag: Vec::new(),
        };
        let id = doc.add_image(&raw);
        self.ops.push(Op::UseXobject {
            id,
            transform: XObjectTransform {
                translate_x: Some(Pt(x)),
                translate_y: Some(Pt(y)),
                scale_x: Some(scale),
                scale_y: Some(scale),
                dpi: Some(72.0),
                rotate: None,
            },
        });
        self.cursor = y;
        Ok(())
    }

    /// Horizontal stroke at the cursor from frame-left + x0 to frame-left + x1.
    fn line(&mut self, line: &LineContent) -> Result<()> {
        let bbox = line
            .coordinates
            .ok_or_else(|| Error::Unpositioned("line unit".to_string()))?;
        let y = self.cursor;
        let (x1, x2) = (self.frame_left() + bbox.x0, self.frame_left() + bbox.x1);

        self.ops.push(Op::SetOutlineColor {
            col: pdf_color(line.line_color),
        });
        self.ops.push(Op::SetOutlineThickness {
            pt: Pt(line.line_width),
        });
        self.ops.push(Op::DrawLine {
            line: Line {
                points: vec![point(x1, y), point(x2, y)],
                is_closed: false,
            },
        });
        Ok(())
    }

    fn cell(&mut self, x: f32, y: f32, w: f32, h: f32, fill: Color) {
        self.ops.push(Op::SetFillColor {
            col: pdf_color(fill),
        });
        self.ops.push(Op::SetOutlineColor {
            col: pdf_color(Color::BLACK),
        });
        self.ops.push(Op::SetOutlineThickness { pt: Pt(GRID_WIDTH) });
        self.ops.push(Op::DrawPolygon {
            polygon: Polygon {
                rings: vec![PolygonRing {
                    points: vec![
                        point(x, y),
                        point(x + w, y),
                        point(x + w, y + h),
                        point(x, y + h),
                    ],
                }],
                mode: PaintMode::FillStroke,
                winding_order: WindingOrder::NonZero,
            },
        });
    }

    fn write_text(&mut self, text: &str, x: f32, baseline: f32, size: f32, color: Color) {
        self.ops.push(Op::SetFillColor {
            col: pdf_color(color),
        });
        self.ops.push(Op::StartTextSection);
        self.ops.push(Op::SetTextCursor {
            pos: Point {
                x: Pt(x),
                y: Pt(baseline),
            },
        });
        let items = vec![TextItem::Text(text.to_string())];
        match &self.font {
            PdfFont::Builtin(font) => {
                self.ops.push(Op::SetFontSizeBuiltinFont {
                    size: Pt(size),
                    font: *font,
                });
                self.ops.push(Op::WriteTextBuiltinFont { items, font: *font });
            }
            PdfFont::External(id) => {
                self.ops.push(Op::SetFontSize {
                    size: Pt(size),
                    font: id.clone(),
                });
                self.ops.push(Op::WriteText {
                    items,
                    font: id.clone(),
                });
            }
        }
        self.ops.push(Op::EndTextSection);
    }
}

fn to_mm(pt: f32) -> Mm {
    Mm(pt * 25.4 / 72.0)
}

fn point(x: f32, y: f32) -> LinePoint {
    LinePoint {
        p: Point { x: Pt(x), y: Pt(y) },
        bezier: false,
    }
}

fn pdf_color(color: Color) -> PdfColor {
    PdfColor::Rgb(Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
        icc_profile: None,
    })
}

/// East Asian wide characters, measured at a full em.
fn is_wide(c: char) -> bool {
    matches!(c as u32,
        0x1100..=0x115F
        | 0x2E80..=0xA4CF
        | 0xAC00..=0xD7A3
        | 0xF900..=0xFAFF
        | 0xFE30..=0xFE4F
        | 0xFF00..=0xFF60
        | 0xFFE0..=0xFFE6
        | 0x20000..=0x3FFFD)
}

fn char_width(c: char, size: f32) -> f32 {
    if is_wide(c) {
        size
    } else {
        size * 0.5
    }
}

fn text_width(text: &str, size: f32) -> f32 {
    text.chars().map(|c| char_width(c, size)).sum()
}

/// Greedy word wrap to `max_width` points.
///
/// Words that do not fit on a line of their own, and words containing wide
/// characters, are broken between characters.
fn wrap_text(text: &str, size: f32, max_width: f32) -> Vec<String> {
    let space = char_width(' ', size);
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut width = 0.0;

    for word in text.split_whitespace() {
        let word_width = text_width(word, size);
        let gap = if line.is_empty() { 0.0 } else { space };

        if width + gap + word_width <= max_width {
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(word);
            width += gap + word_width;
            continue;
        }

        if word_width <= max_width && !word.chars().any(is_wide) {
            lines.push(std::mem::take(&mut line));
            line.push_str(word);
            width = word_width;
            continue;
        }

        if !line.is_empty() {
            line.push(' ');
            width += space;
        }
        for c in word.chars() {
            let cw = char_width(c, size);
            if width + cw > max_width && !line.trim_end().is_empty() {
                lines.push(std::mem::take(&mut line).trim_end().to_string());
                width = 0.0;
            }
            line.push(c);
            width += cw;
        }
    }

    if !line.is_empty() {
        lines.push(line);
    }
    lines
}
