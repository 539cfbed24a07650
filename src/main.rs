//! # docstruct
//!
//! Heading outline and page ranges for word-processed documents.
//!
//! ## Usage
//!
//! Build the structure table of a document from its PDF rendering:
//! ```sh
//! docstruct bid.docx bid.pdf
//! ```
//!
//! List detected headings:
//! ```sh
//! docstruct -l bid.docx
//! ```
//!
//! Show the heading tree with page ranges:
//! ```sh
//! docstruct --tree bid.docx bid.pdf
//! ```

mod cli;

use clap::Parser as ClapParser;
use cli::{Cli, Command, OutputFormat};
use color_eyre::Result;
use color_eyre::eyre::{WrapErr, eyre};
use docstruct::extract::{Extraction, Outcome};
use docstruct::outline::{Outline, entries_at_level, pair_pages, section_at_page};
use docstruct::parser::utils::{display_width, pad_display};
use docstruct::parser::{self, HeadingCandidate};
use docstruct::{Config, input, parse_structure};
use std::path::Path;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Cli::parse();
    init_tracing(args.verbose);

    if args.init_config {
        let path = Config::default()
            .save()
            .map_err(|e| eyre!("Could not write config: {}", e))?;
        println!("Wrote default configuration to {}", path.display());
        return Ok(());
    }

    let config = match &args.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let format = args.output.unwrap_or(if config.is_json_output() {
        OutputFormat::Json
    } else {
        OutputFormat::Plain
    });

    let Some(document) = args.document.as_deref() else {
        eprintln!("Error: document argument is required");
        eprintln!("\nUsage: docstruct [OPTIONS] <DOCUMENT> [PAGES]");
        process::exit(1);
    };

    if args.list || args.count || (args.tree && args.pages.is_none()) {
        return handle_headings_mode(&args, document, &config, format);
    }

    let Some(pages) = args.pages.as_deref() else {
        eprintln!("Error: a pages file is required to build the structure table");
        eprintln!("\nUsage: docstruct [OPTIONS] <DOCUMENT> <PAGES>");
        eprintln!("       docstruct -l <DOCUMENT>    # headings only");
        process::exit(1);
    };

    let mut extraction = parse_structure(document, pages, &config);
    if let Outcome::SourceUnavailable { reason } = &extraction.outcome {
        eprintln!("Error: {}", reason);
        process::exit(1);
    }
    if let (Some(level), false) = (args.level, args.tree) {
        extraction.entries = entries_at_level(&extraction.headings, &extraction.entries, level);
    }

    if args.tree {
        let pairs = filter_pairs(pair_pages(&extraction.headings, &extraction.entries), &args);
        print_tree(pairs, format)?;
    } else if let Some(Command::AtPage { page }) = &args.command {
        print_section_at_page(&extraction, *page, format)?;
    } else {
        print_structure(&extraction, document, pages, format)?;
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Modes that only need the document: --list, --count, and --tree without pages.
fn handle_headings_mode(
    args: &Cli,
    document: &Path,
    config: &Config,
    format: OutputFormat,
) -> Result<()> {
    let paragraphs = input::read_paragraphs(document)
        .wrap_err_with(|| format!("Failed to read {}", document.display()))?;
    let headings = parser::HeadingClassifier::new(config.classifier.clone()).extract(&paragraphs);

    if args.count {
        print_heading_counts(&headings, format)
    } else if args.tree {
        let pairs = headings.into_iter().map(|h| (h, None)).collect();
        print_tree(filter_pairs(pairs, args), format)
    } else {
        let selected: Vec<_> = headings
            .iter()
            .filter(|h| args.level.is_none_or(|level| h.level == level))
            .collect();
        print_headings(&selected, format)
    }
}

fn filter_pairs(
    pairs: Vec<(HeadingCandidate, Option<(usize, usize)>)>,
    args: &Cli,
) -> Vec<(HeadingCandidate, Option<(usize, usize)>)> {
    match args.level {
        Some(level) => pairs.into_iter().filter(|(h, _)| h.level == level).collect(),
        None => pairs,
    }
}

fn print_headings(headings: &[&HeadingCandidate], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Plain => {
            for heading in headings {
                println!(
                    "{:>5}  {} {}",
                    heading.source_index,
                    pad_display(heading.level.into(), 8),
                    heading.text
                );
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(headings)?);
        }
    }
    Ok(())
}

fn print_tree(
    pairs: Vec<(HeadingCandidate, Option<(usize, usize)>)>,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Plain => {
            print!("{}", Outline::from_pairs(pairs).render_box_tree());
        }
        OutputFormat::Json => {
            // Flat list; nesting is implied by the levels.
            let headings: Vec<_> = pairs.into_iter().map(|(h, _)| h).collect();
            println!("{}", serde_json::to_string_pretty(&headings)?);
        }
    }
    Ok(())
}

fn print_heading_counts(headings: &[HeadingCandidate], format: OutputFormat) -> Result<()> {
    let counts = parser::level_counts(headings);
    match format {
        OutputFormat::Plain => {
            println!("Heading counts:");
            for (level, count) in &counts {
                println!("  {}: {}", level, count);
            }
            println!("\nTotal: {}", headings.len());
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&counts)?);
        }
    }
    Ok(())
}

fn print_section_at_page(extraction: &Extraction, page: usize, format: OutputFormat) -> Result<()> {
    let Some(entry) = section_at_page(&extraction.entries, page) else {
        eprintln!("No section contains page {}", page);
        process::exit(1);
    };

    match format {
        OutputFormat::Plain => println!("{}", entry.title),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(entry)?),
    }
    Ok(())
}

fn print_structure(
    extraction: &Extraction,
    document: &Path,
    pages: &Path,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Plain => {
            if extraction.outcome == Outcome::NoHeadings {
                eprintln!("No headings detected in {}", document.display());
                return Ok(());
            }

            let width = extraction
                .entries
                .iter()
                .map(|e| display_width(&e.title))
                .max()
                .unwrap_or(0);
            for entry in &extraction.entries {
                println!(
                    "{}  {:>5}  {:>5}",
                    pad_display(&entry.title, width),
                    entry.start_page,
                    entry.end_page
                );
            }
            if !extraction.unlocated.is_empty() {
                eprintln!("\nNot found in {}:", pages.display());
                for title in &extraction.unlocated {
                    eprintln!("  {}", title);
                }
            }
        }
        OutputFormat::Json => {
            let source = document.display().to_string();
            let rendering = pages.display().to_string();
            let output = parser::build_json_output(extraction, Some(&source), Some(&rendering));
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}
