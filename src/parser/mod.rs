//! Document segmentation module.

mod backend;
mod book_parser;
mod options;
mod segmenter;

pub use backend::{
    JsonExtractor, RawChar, RawImage, RawLine, RawPage, RawTable, RawVectorLine,
    StructureDump, StructureExtractor,
};
pub use book_parser::BookParser;
pub use options::{ErrorMode, ParseOptions};
pub use segmenter::{image_path, PageSegmenter};
