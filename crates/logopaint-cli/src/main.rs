//! LogoPaint CLI - headless driver for the canvas engine.
//!
//! Applies agent command batches to saved documents, prints canvas
//! summaries and writes built-in templates.

use clap::{Parser, Subcommand};
use logopaint_core::{AgentError, AgentReply, Canvas, Document, DocumentError, GridType, Template};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;

/// LogoPaint CLI - edit mosaic documents without a window
#[derive(Parser)]
#[command(name = "logopaint")]
#[command(about = "Headless driver for the LogoPaint mosaic canvas")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply an agent reply (JSON array, actions object or fenced text) as one batch
    Apply {
        /// File holding the reply text
        reply: PathBuf,

        /// Document to start from (default: empty canvas)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Where to write the resulting document (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Seed for commands that use randomness
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Print the row-by-row summary of a document
    Info {
        /// Document to describe
        document: PathBuf,
    },

    /// Write a built-in template as a document
    Template {
        /// Template name (diamond, flower, arrow)
        name: String,

        /// Grid type (sq, tri, rtri, dia, hex)
        #[arg(short, long)]
        grid: Option<String>,

        /// Where to write the document (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{path}: {source}")]
    Document {
        path: PathBuf,
        source: DocumentError,
    },
    #[error(transparent)]
    Agent(#[from] AgentError),
    #[error("failed to encode document: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("unknown template {0:?}")]
    UnknownTemplate(String),
    #[error("unknown grid type {0:?}")]
    UnknownGrid(String),
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Apply {
            reply,
            input,
            output,
            seed,
        } => apply(&reply, input.as_deref(), output.as_deref(), seed),
        Commands::Info { document } => info(&document),
        Commands::Template { name, grid, output } => template(&name, grid.as_deref(), output.as_deref()),
    }
}

fn read(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a canvas from a document file.
fn open(canvas: &mut Canvas, path: &Path) -> Result<(), CliError> {
    let json = read(path)?;
    Document::from_json(&json)
        .and_then(|doc| canvas.load_document(&doc))
        .map_err(|source| CliError::Document {
            path: path.to_path_buf(),
            source,
        })
}

/// Write a document to `output`, or stdout when absent.
fn save(canvas: &Canvas, output: Option<&Path>) -> Result<(), CliError> {
    let json = canvas.to_document().to_json()?;
    match output {
        Some(path) => {
            std::fs::write(path, json).map_err(|source| CliError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            log::info!("wrote {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn apply(reply: &Path, input: Option<&Path>, output: Option<&Path>, seed: Option<u64>) -> Result<(), CliError> {
    let mut canvas = seed.map_or_else(Canvas::new, Canvas::with_seed);
    if let Some(input) = input {
        open(&mut canvas, input)?;
    }

    let parsed = AgentReply::parse(&read(reply)?)?;
    let report = canvas.apply_agent_batch(&parsed.actions);
    eprintln!(
        "{} ({} applied, {} skipped, {} ignored)",
        parsed.message_or_default(),
        report.applied,
        report.skipped,
        report.ignored
    );

    save(&canvas, output)
}

fn info(document: &Path) -> Result<(), CliError> {
    let mut canvas = Canvas::new();
    open(&mut canvas, document)?;
    println!("{}", canvas.describe().trim_start());
    Ok(())
}

fn template(name: &str, grid: Option<&str>, output: Option<&Path>) -> Result<(), CliError> {
    let template = Template::from_name(name).ok_or_else(|| CliError::UnknownTemplate(name.to_string()))?;
    let mut canvas = Canvas::new();
    if let Some(grid) = grid {
        let grid = GridType::from_name(grid).ok_or_else(|| CliError::UnknownGrid(grid.to_string()))?;
        canvas.set_grid(grid);
    }
    canvas.load_template(template);
    save(&canvas, output)
}
