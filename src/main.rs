//! msablocks - Block-wise Alignment Viewer
//!
//! Shows a FASTA multiple sequence alignment in fixed-width blocks, with
//! mismatches, consensus ties and end gaps marked and the ungapped start and
//! end position of every sequence on each line.
//!
//! ## Usage
//!
//! ```bash
//! msablocks alignment.fasta             # interactive viewer
//! msablocks -w 60 alignment.fasta.gz    # gzip input, 60 columns per block
//! msablocks -o - --color alignment.fa   # print the block view to stdout
//! msablocks --example                   # open the bundled demo alignment
//! ```
//!
//! ## Navigation (Vim-style)
//!
//! - `h/j/k/l`: Move left/down/up/right
//! - `PageUp/PageDown`: Previous/next block
//! - `:w 60`: Change line width
//! - `:q`: Quit

// Use jemalloc for better memory management (returns memory to OS)
#[cfg(not(windows))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, LevelFilter};

use msablocks::acquire::read_text;
use msablocks::controller::{run_app, run_app_with_loading};
use msablocks::layout::LineWidth;
use msablocks::model::AppState;
use msablocks::render::{render_text, RenderOptions};
use msablocks::session::{AlignmentSession, SessionOutcome, EXAMPLE_FASTA};

/// Name shown for the bundled example alignment.
const EXAMPLE_NAME: &str = "example";

/// msablocks - A block-wise viewer for multiple sequence alignments
///
/// When run without -o/--output, opens an interactive TUI viewer.
/// With -o/--output, writes the block view to a file (or stdout with "-").
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Aligned FASTA file, optionally gzip-compressed ("-" reads stdin)
    #[arg(required_unless_present = "example")]
    file: Option<PathBuf>,

    /// Show the bundled example alignment instead of a file
    #[arg(long = "example", conflicts_with = "file")]
    example: bool,

    /// Alignment columns per block
    #[arg(short = 'w', long = "width", default_value = "80", value_parser = LineWidth::parse)]
    width: LineWidth,

    /// Output file (enables text mode). Use "-" for stdout.
    #[arg(short = 'o', long = "output")]
    output: Option<String>,

    /// Colour mismatches, ties and end gaps in text mode
    #[arg(long = "color")]
    color: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,

    /// Log file (interactive mode logs to a temporary file by default)
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,
}

/// Sets up logging.
///
/// The interactive viewer owns the terminal, so it always logs to a file.
fn setup_logging(verbose: u8, log_file: Option<PathBuf>, interactive: bool) -> Result<()> {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    let log_path = log_file.or_else(|| {
        interactive.then(|| {
            std::env::temp_dir().join(format!("msablocks-{:08x}.log", rand::random::<u32>()))
        })
    });

    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(level)
        .parse_default_env()
        .format_timestamp_secs();
    if let Some(path) = log_path {
        let file = File::create(&path)
            .with_context(|| format!("Cannot create log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

/// Reads the alignment text named on the command line.
fn load_text(args: &Args) -> Result<String> {
    match &args.file {
        Some(path) => {
            read_text(path).with_context(|| format!("Cannot read {}", path.display()))
        }
        None => Ok(EXAMPLE_FASTA.to_string()),
    }
}

/// Runs text mode: parse, lay out and write the block view.
fn run_text_mode(text: &str, width: LineWidth, output: &str, color: bool) -> Result<()> {
    let session = match AlignmentSession::open_with(text, width)? {
        SessionOutcome::Ready(session) => session,
        SessionOutcome::NoSequences => anyhow::bail!("no sequences found"),
    };

    let options = RenderOptions { color };
    if output == "-" {
        // Write to stdout
        let stdout = io::stdout();
        let mut handle = BufWriter::new(stdout.lock());
        render_text(session.layout(), &options, &mut handle)?;
        handle.flush()?;
    } else {
        // Write to file
        let mut file = BufWriter::new(File::create(output)?);
        render_text(session.layout(), &options, &mut file)?;
        file.flush()?;
        info!(
            "Wrote {} blocks of {} sequences to {}",
            session.layout().block_count(),
            session.alignment().sequence_count(),
            output
        );
    }

    Ok(())
}

/// Opens the bundled example in the viewer; there is nothing to load.
fn run_example(width: LineWidth) -> Result<()> {
    match AlignmentSession::open_with(EXAMPLE_FASTA, width)? {
        SessionOutcome::Ready(session) => {
            run_app(AppState::new(session, EXAMPLE_NAME.to_string()))
        }
        SessionOutcome::NoSequences => anyhow::bail!("no sequences found"),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.verbose, args.log_file.clone(), args.output.is_none())?;

    // CLI mode: output to file/stdout
    if let Some(output) = &args.output {
        let text = load_text(&args)?;
        run_text_mode(&text, args.width, output, args.color)?;
    } else if let Some(path) = args.file {
        run_app_with_loading(path, args.width)?;
    } else {
        run_example(args.width)?;
    }

    Ok(())
}
