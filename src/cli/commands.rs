use clap::{ArgAction, Parser, ValueEnum};
use docstruct::parser::HeadingLevel;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "docstruct")]
#[command(version)]
#[command(about = "Heading outline and page ranges for word-processed documents")]
#[command(
    long_about = "docstruct - classify the headings of a .docx document and place them on the pages\n\
    of its PDF rendering, producing a table of contents with page ranges.\n\n\
    Examples:\n  \
    docstruct bid.docx bid.pdf            # Structure table\n  \
    docstruct -l bid.docx                 # List detected headings\n  \
    docstruct --tree bid.docx bid.pdf     # Heading tree with pages\n  \
    docstruct bid.docx bid.pdf at-page 12 # Section containing page 12\n  \
    docstruct -o json bid.docx bid.pdf    # JSON output"
)]
pub struct Cli {
    /// Document to analyse (.docx, or .json paragraph dump)
    ///
    /// A JSON dump is an array of objects with `text`, optional `index`,
    /// `isBold`, and `runs` (each with `bold` and `fontSize` in points).
    #[arg(value_hint = clap::ValueHint::FilePath, required_unless_present = "init_config")]
    pub document: Option<PathBuf>,

    /// Paginated rendering of the document (.pdf, .json page array, or
    /// form-feed separated text such as `pdftotext` output)
    ///
    /// Required for the structure table and `at-page`; optional for
    /// --list, --tree and --count.
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub pages: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,

    /// List detected headings without locating pages
    ///
    /// Shows each heading with its level and paragraph index.
    /// Combine with --level to narrow results.
    #[arg(short = 'l', long = "list")]
    pub list: bool,

    /// Show the heading hierarchy with box-drawing characters
    ///
    /// Chapters contain level2 headings, which contain level3, and so on.
    /// Page ranges are shown when a pages file is given.
    #[arg(long = "tree")]
    pub tree: bool,

    /// Count headings by level
    #[arg(long = "count")]
    pub count: bool,

    /// Show only headings at one level (chapter, level2, level3, level4)
    ///
    /// Applies to every mode except --count. With `at-page`, finds the
    /// enclosing heading at that level, e.g. `-L chapter at-page 12`.
    #[arg(short = 'L', long = "level", value_name = "LEVEL")]
    pub level: Option<HeadingLevel>,

    /// Output format (overrides the config file)
    ///
    ///   plain - Human-readable text (default)
    ///   json  - JSON for scripting
    #[arg(short = 'o', long = "output")]
    pub output: Option<OutputFormat>,

    /// Read configuration from this file instead of the default location
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write the default configuration to the config directory and exit
    #[arg(long = "init-config", conflicts_with_all = ["document", "pages"])]
    pub init_config: bool,

    /// Increase log verbosity (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// Show the section containing a page
    ///
    /// The last section is taken to run to the end of the document.
    AtPage {
        /// Page index, in the numbering of the pages file (first page is 0)
        page: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    Plain,
    /// JSON output
    Json,
}
