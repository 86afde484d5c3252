//! Document parser: drives the segmenter over every requested page.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::logging::Logger;
use crate::model::Book;

use super::backend::{JsonExtractor, StructureExtractor};
use super::options::ParseOptions;
use super::segmenter::PageSegmenter;

/// Segments a whole document into a [`Book`].
pub struct BookParser<E: StructureExtractor> {
    extractor: E,
    options: ParseOptions,
    logger: Logger,
}

impl BookParser<JsonExtractor> {
    /// Open a serialized extractor dump.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ParseOptions::default())
    }

    /// Open a serialized extractor dump with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Self> {
        Ok(Self::with_options(JsonExtractor::open(path)?, options))
    }
}

impl<E: StructureExtractor> BookParser<E> {
    pub fn new(extractor: E) -> Self {
        Self::with_options(extractor, ParseOptions::default())
    }

    pub fn with_options(extractor: E, options: ParseOptions) -> Self {
        Self {
            extractor,
            options,
            logger: Logger::global(),
        }
    }

    /// Use the given logging sink.
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    pub fn extractor(&self) -> &E {
        &self.extractor
    }

    /// Number of pages a call to [`parse`](Self::parse) will segment.
    ///
    /// A limit of zero or beyond the document is a [`Error::PageOutOfRange`].
    pub fn page_limit(&self) -> Result<u32> {
        let total = self.extractor.page_count();
        match self.options.pages {
            Some(limit) if limit == 0 || limit > total => Err(Error::PageOutOfRange(limit, total)),
            Some(limit) => Ok(limit),
            None => Ok(total),
        }
    }

    /// Segment the document that `source_path` names.
    ///
    /// Pages are processed strictly in order. The source path is recorded on
    /// the book and its directory receives extracted images unless
    /// [`ParseOptions::image_dir`] overrides it.
    pub fn parse(&self, source_path: impl AsRef<Path>) -> Result<Book> {
        let source_path = source_path.as_ref();
        let limit = self.page_limit()?;

        self.logger.info(format_args!(
            "Segmenting {} of {} pages from {}",
            limit,
            self.extractor.page_count(),
            source_path.display()
        ));

        let image_dir = self.image_dir(source_path);
        if self.options.extract_images && !image_dir.as_os_str().is_empty() {
            std::fs::create_dir_all(&image_dir)?;
        }

        let segmenter = PageSegmenter::new(&self.options, image_dir, &self.logger);
        let mut book = Book::new(source_path);
        for number in 1..=limit {
            let raw = self.extractor.page(number)?;
            let page = segmenter.segment(number, &raw, &self.extractor)?;
            book.add_page(page);
        }

        self.logger.info(format_args!(
            "Segmented {} pages into {} content units",
            book.page_count(),
            book.contents().count()
        ));
        Ok(book)
    }

    fn image_dir(&self, source_path: &Path) -> PathBuf {
        match &self.options.image_dir {
            Some(dir) => dir.clone(),
            None => source_path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default(),
        }
    }
}
