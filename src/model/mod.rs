//! Content model for segmented documents.
//!
//! A [`Book`] holds [`Page`]s, and each page holds typed [`Content`] units
//! (text runs, tables, images, vector lines) in reading order. Units are
//! created by the segmenter, receive their translation once, and are read
//! by the renderers.

mod book;
mod content;
mod geometry;
mod page;
mod table;

pub use book::Book;
pub use content::{
    Content, ContentType, ImageContent, LineContent, TextContent, TextStyle, Translation,
};
pub use geometry::{BBox, Color};
pub use page::Page;
pub use table::{TableContent, TableGrid};
