//! bookweave CLI - segment documents and render translated books

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;

use bookweave::{
    render::default_output_path, Book, BookParser, BookWriter, ContentType, JsonFormat,
    Logger, OutputFormat, PageSize, ParseOptions, RenderOptions,
};

#[derive(Parser)]
#[command(name = "bookweave")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Segment documents into content units and render translated books", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Segment an extractor dump into a book JSON
    Segment {
        /// Structure extractor dump (JSON)
        #[arg(value_name = "STRUCTURE")]
        structure: PathBuf,

        /// Source document the dump was extracted from
        #[arg(long, value_name = "PDF")]
        source: PathBuf,

        /// Segment only the first N pages
        #[arg(long, value_name = "N")]
        pages: Option<u32>,

        /// Skip units that fail instead of aborting
        #[arg(long)]
        lenient: bool,

        /// Directory for extracted images (default: next to the source)
        #[arg(long, value_name = "DIR")]
        image_dir: Option<PathBuf>,

        /// Do not extract images
        #[arg(long)]
        no_images: bool,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Render a translated book JSON
    Render {
        /// Book JSON
        #[arg(value_name = "BOOK")]
        book: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "pdf")]
        format: Format,

        /// Output file (default: <source>_translated.<ext>)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// TrueType font embedded in PDF output
        #[arg(long, value_name = "TTF", env = "BOOKWEAVE_FONT")]
        font: Option<PathBuf>,

        /// PDF page size
        #[arg(long, value_enum, default_value = "letter")]
        page_size: Size,
    },

    /// Show book information
    Info {
        /// Book JSON
        #[arg(value_name = "BOOK")]
        book: PathBuf,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Paginated PDF
    Pdf,
    /// Flat Markdown
    #[value(alias = "md")]
    Markdown,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Pdf => OutputFormat::Pdf,
            Format::Markdown => OutputFormat::Markdown,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Size {
    /// US Letter
    Letter,
    /// ISO A4
    A4,
}

impl From<Size> for PageSize {
    fn from(size: Size) -> Self {
        match size {
            Size::Letter => PageSize::Letter,
            Size::A4 => PageSize::A4,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Segment {
            structure,
            source,
            pages,
            lenient,
            image_dir,
            no_images,
            output,
            compact,
        } => {
            let mut options = ParseOptions::new().with_images(!no_images);
            if lenient {
                options = options.lenient();
            }
            if let Some(pages) = pages {
                options = options.with_pages(pages);
            }
            if let Some(dir) = image_dir {
                options = options.with_image_dir(dir);
            }
            cmd_segment(&structure, &source, options, output.as_deref(), compact)
        }
        Commands::Render {
            book,
            format,
            output,
            font,
            page_size,
        } => {
            let mut options = RenderOptions::new().with_page_size(page_size.into());
            if let Some(font) = font {
                options = options.with_font(font);
            }
            cmd_render(&book, format.into(), output.as_deref(), options)
        }
        Commands::Info { book } => cmd_info(&book),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_segment(
    structure: &Path,
    source: &Path,
    options: ParseOptions,
    output: Option<&Path>,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let parser = BookParser::open_with_options(structure, options)?
        .with_logger(Logger::global().with_target("bookweave::segment"));
    let book = parser.parse(source)?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    let json = bookweave::render::to_json(&book, format)?;

    if let Some(path) = output {
        fs::write(path, &json)?;
        println!(
            "{} {} ({} pages, {} units)",
            "Saved to".green(),
            path.display(),
            book.page_count(),
            book.contents().count()
        );
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn cmd_render(
    book_path: &Path,
    format: OutputFormat,
    output: Option<&Path>,
    options: RenderOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let book = Book::load(book_path)?;
    log::debug!(
        "Loaded {} pages ({} units) from {}",
        book.page_count(),
        book.contents().count(),
        book_path.display()
    );
    let writer = BookWriter::new(options, Logger::global().with_target("bookweave::render"));
    let result = writer.save(&book, output, format)?;

    println!("{} {}", "Saved to".green(), result.path.display());
    println!(
        "  {} {} pages, {} texts, {} tables, {} images, {} lines",
        "├─".dimmed(),
        result.stats.page_count,
        result.stats.text_count,
        result.stats.table_count,
        result.stats.image_count,
        result.stats.line_count
    );
    println!(
        "  {} {} untranslated units skipped",
        "└─".dimmed(),
        result.stats.skipped_count
    );

    Ok(())
}

fn cmd_info(book_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let book = Book::load(book_path)?;

    println!("{}", "Book Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), book_path.display());
    println!("{}: {}", "Source".bold(), book.source_path().display());
    println!("{}: {}", "Pages".bold(), book.page_count());
    println!(
        "{}: {}",
        "PDF output".bold(),
        default_output_path(book.source_path(), OutputFormat::Pdf).display()
    );

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    for page in book.pages() {
        let count = |kind: ContentType| {
            page.contents()
                .iter()
                .filter(|c| c.content_type() == kind)
                .count()
        };
        println!(
            "{} {:>3}: {} texts, {} tables, {} images, {} lines ({}/{} ready)",
            "Page".bold(),
            page.number,
            count(ContentType::Text),
            count(ContentType::Table),
            count(ContentType::Image),
            count(ContentType::Line),
            page.translated_count(),
            page.content_count()
        );
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "bookweave".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Document segmentation and translated book rendering");
    println!();
    println!("Repository: {}", "https://github.com/iyulab/bookweave".dimmed());
    println!("License: MIT");
}

#[cfg(test)]
mod tests {
    use super::*;

    const DUMP: &str = r#"{
        "pages": [{
            "width": 612, "height": 792,
            "lines": [{
                "text": "Hello",
                "bbox": [72, 100, 140, 112],
                "chars": [{"fontname": "Helvetica", "size": 12}]
            }]
        }]
    }"#;

    #[test]
    fn test_segment_then_render_markdown() {
        let dir = tempfile::tempdir().unwrap();
        let structure = dir.path().join("structure.json");
        fs::write(&structure, DUMP).unwrap();
        let book_path = dir.path().join("book.json");

        cmd_segment(
            &structure,
            &dir.path().join("doc.pdf"),
            ParseOptions::new(),
            Some(&book_path),
            false,
        )
        .unwrap();
        assert_eq!(Book::load(&book_path).unwrap().page_count(), 1);

        cmd_render(&book_path, OutputFormat::Markdown, None, RenderOptions::new()).unwrap();
        // Nothing is translated, so the Markdown is empty.
        let md = fs::read_to_string(dir.path().join("doc_translated.md")).unwrap();
        assert!(md.is_empty());

        cmd_info(&book_path).unwrap();
    }

    #[test]
    fn test_cli_parses_render_args() {
        let cli = Cli::try_parse_from(["bookweave", "render", "book.json", "-f", "md"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Render {
                format: Format::Markdown,
                ..
            }
        ));
        assert!(Cli::try_parse_from(["bookweave", "render", "book.json", "-f", "docx"]).is_err());
    }
}
