//! Benchmarks for segmentation and rendering.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use bookweave::parser::{RawChar, RawLine, RawPage, RawTable};
use bookweave::{BBox, BookParser, JsonExtractor, Logger, ParseOptions};

/// Synthetic pages: runs of body text with a font change and one table.
fn create_pages(page_count: usize) -> Vec<RawPage> {
    (0..page_count)
        .map(|_| {
            let mut lines = Vec::new();
            for i in 0..40 {
                let size = if i % 10 == 0 { 14.0 } else { 10.0 };
                let top = 72.0 + i as f32 * 14.0;
                lines.push(RawLine {
                    text: format!("Line {} of body text on the page", i),
                    bbox: BBox::new(72.0, top, 540.0, top + size),
                    chars: vec![RawChar {
                        font: "Helvetica".to_string(),
                        size,
                        color: None,
                    }],
                });
            }
            lines.push(RawLine {
                text: "Col1 Col2".to_string(),
                bbox: BBox::new(72.0, 650.0, 300.0, 660.0),
                chars: vec![RawChar {
                    font: "Helvetica".to_string(),
                    size: 9.0,
                    color: None,
                }],
            });

            RawPage {
                width: 612.0,
                height: 792.0,
                lines,
                tables: vec![RawTable {
                    cells: vec![
                        vec![Some("Col1".into()), Some("Col2".into())],
                        vec![Some("1".into()), Some("2".into())],
                    ],
                    bbox: None,
                }],
                ..Default::default()
            }
        })
        .collect()
}

fn bench_segmentation(c: &mut Criterion) {
    let mut group = c.benchmark_group("segmentation");

    for &pages in &[1usize, 10, 50] {
        let extractor = JsonExtractor::from_pages(create_pages(pages));
        let parser = BookParser::with_options(extractor, ParseOptions::new().with_images(false))
            .with_logger(Logger::global());

        group.bench_function(format!("{}_pages", pages), |b| {
            b.iter(|| parser.parse(black_box("bench.pdf")))
        });
    }

    group.finish();
}

fn bench_markdown(c: &mut Criterion) {
    let extractor = JsonExtractor::from_pages(create_pages(20));
    let mut book = BookParser::new(extractor).parse("bench.pdf").unwrap();

    let mut translator = |req: &bookweave::TranslationRequest<'_>| -> bookweave::Result<_> {
        Ok(bookweave::TranslationResponse::new(req.original.to_uppercase(), true))
    };
    bookweave::BookTranslator::default().translate(&mut book, &mut translator);

    c.bench_function("markdown_20_pages", |b| {
        b.iter(|| bookweave::render::to_markdown(black_box(&book)))
    });
}

criterion_group!(benches, bench_segmentation, bench_markdown);
criterion_main!(benches);
