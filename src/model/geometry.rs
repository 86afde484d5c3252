//! Page-space geometry and color types.

use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in page space, `(x0, top, x1, bottom)`.
///
/// `top` grows downwards from the top edge of the page, matching the
/// structure extractor's coordinate system. Serialized as a 4-element array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 4]", into = "[f32; 4]")]
pub struct BBox {
    /// Left edge
    pub x0: f32,
    /// Top edge
    pub top: f32,
    /// Right edge
    pub x1: f32,
    /// Bottom edge
    pub bottom: f32,
}

impl BBox {
    /// Create a bounding box from its four edges.
    pub fn new(x0: f32, top: f32, x1: f32, bottom: f32) -> Self {
        Self {
            x0,
            top,
            x1,
            bottom,
        }
    }

    /// Keep this box's top-left corner and take the bottom-right corner of `other`.
    ///
    /// Not a union: the result follows reading order and may be smaller than
    /// either input when `other` lies left of or above `self`.
    pub fn extend_to(&self, other: &BBox) -> BBox {
        BBox::new(self.x0, self.top, other.x1, other.bottom)
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Edges as `[x0, top, x1, bottom]`.
    pub fn to_array(self) -> [f32; 4] {
        [self.x0, self.top, self.x1, self.bottom]
    }
}

impl From<[f32; 4]> for BBox {
    fn from(v: [f32; 4]) -> Self {
        BBox::new(v[0], v[1], v[2], v[3])
    }
}

impl From<BBox> for [f32; 4] {
    fn from(b: BBox) -> Self {
        b.to_array()
    }
}

impl std::fmt::Display for BBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({:.1}, {:.1}, {:.1}, {:.1})",
            self.x0, self.top, self.x1, self.bottom
        )
    }
}

/// RGB color with components in `0.0..=1.0`.
///
/// Deserializes from gray (1), RGB (3) or CMYK (4) component arrays as the
/// extractor reports them; always serializes as RGB.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f32>", into = "[f32; 3]")]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    /// Header background of rendered tables.
    pub const GREY: Color = Color::rgb(0.5, 0.5, 0.5);
    /// Header text of rendered tables.
    pub const WHITESMOKE: Color = Color::rgb(0.96, 0.96, 0.96);
    /// Body background of rendered tables.
    pub const BEIGE: Color = Color::rgb(0.96, 0.96, 0.86);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn gray(level: f32) -> Self {
        Self::rgb(level, level, level)
    }

    pub fn cmyk(c: f32, m: f32, y: f32, k: f32) -> Self {
        Self::rgb((1.0 - c) * (1.0 - k), (1.0 - m) * (1.0 - k), (1.0 - y) * (1.0 - k))
    }

    /// Interpret a color-space component list.
    pub fn from_components(components: &[f32]) -> Option<Self> {
        match *components {
            [g] => Some(Self::gray(g)),
            [r, g, b] => Some(Self::rgb(r, g, b)),
            [c, m, y, k] => Some(Self::cmyk(c, m, y, k)),
            _ => None,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl TryFrom<Vec<f32>> for Color {
    type Error = String;

    fn try_from(components: Vec<f32>) -> Result<Self, Self::Error> {
        Color::from_components(&components).ok_or_else(|| {
            format!(
                "expected 1, 3 or 4 color components, got {}",
                components.len()
            )
        })
    }
}

impl From<Color> for [f32; 3] {
    fn from(c: Color) -> Self {
        [c.r, c.g, c.b]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extend_to_keeps_top_left() {
        let first = BBox::new(10.0, 20.0, 200.0, 32.0);
        let last = BBox::new(12.0, 40.0, 180.0, 52.0);
        let merged = first.extend_to(&last);
        assert_eq!(merged, BBox::new(10.0, 20.0, 180.0, 52.0));
    }

    #[test]
    fn test_bbox_serde_as_array() {
        let bbox = BBox::new(1.0, 2.0, 3.0, 4.0);
        let json = serde_json::to_string(&bbox).unwrap();
        assert_eq!(json, "[1.0,2.0,3.0,4.0]");
        let back: BBox = serde_json::from_str(&json).unwrap();
        assert_eq!(back, bbox);
    }

    #[test]
    fn test_color_components() {
        assert_eq!(Color::from_components(&[0.0]), Some(Color::BLACK));
        assert_eq!(
            Color::from_components(&[1.0, 0.0, 0.0]),
            Some(Color::rgb(1.0, 0.0, 0.0))
        );
        assert_eq!(
            Color::from_components(&[0.0, 0.0, 0.0, 1.0]),
            Some(Color::BLACK)
        );
        assert_eq!(Color::from_components(&[0.1, 0.2]), None);

        let c: Color = serde_json::from_str("[1.0]").unwrap();
        assert_eq!(c, Color::WHITE);
        assert!(serde_json::from_str::<Color>("[]").is_err());
    }
}
