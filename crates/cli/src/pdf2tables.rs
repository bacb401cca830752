//! pdf2tables - Extract tables from PDF files as JSON
//!
//! A command line tool that runs the table extraction pipeline over one
//! or more PDF files and writes one JSON table list per input: a list
//! of tables, each a list of records keyed by the table's header row.

use clap::{ArgAction, Parser};
use cuadro_core::engine::{EngineOptions, ExtractionEngine, error_payload};
use cuadro_core::lopdf_backend::LopdfBackend;
use cuadro_core::normalize::NormalizeOptions;
use cuadro_core::store::MemoryStore;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

/// A command line tool that extracts tables from PDF files and writes
/// them as JSON records.
#[derive(Parser, Debug)]
#[command(name = "pdf2tables")]
#[command(author, version, about, long_about = None)]
#[command(disable_version_flag = true)]
struct Args {
    /// One or more paths to PDF files
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Print version information
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    version: (),

    /// Use debug logging level
    #[arg(short = 'd', long, action = ArgAction::SetTrue)]
    debug: bool,

    // === Extraction options ===
    /// Number of worker threads per document (0 = one per CPU)
    #[arg(short = 't', long, default_value = "0")]
    threads: usize,

    /// Fill empty cells with the last non-empty value above them
    #[arg(long = "fill-down", action = ArgAction::SetTrue)]
    fill_down: bool,

    // === Output options ===
    /// Path to file where output is written, or "-" for stdout
    #[arg(short = 'o', long, default_value = "-")]
    outfile: String,

    /// Pretty-print the JSON output
    #[arg(short = 'p', long, action = ArgAction::SetTrue)]
    pretty: bool,
}

/// Re-render a compact JSON document for human reading.
fn prettify(json: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(json) {
        Ok(value) => serde_json::to_string_pretty(&value).unwrap_or_else(|_| json.to_string()),
        Err(_) => json.to_string(),
    }
}

/// Process a single PDF file, writing one JSON document to `writer`.
///
/// Extraction failures still produce an output entry (the error
/// payload), so a batch keeps one line per input file.
fn process_file<W: Write>(
    engine: &ExtractionEngine<LopdfBackend, MemoryStore>,
    path: &PathBuf,
    writer: &mut W,
    args: &Args,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let pdf_data = std::fs::read(path)?;

    match engine.try_extract(&pdf_data) {
        Ok(tables) => {
            let rendered = if args.pretty {
                prettify(&tables)
            } else {
                tables
            };
            writeln!(writer, "{}", rendered)?;
            Ok(())
        }
        Err(e) => {
            let payload = error_payload(&e);
            let rendered = if args.pretty {
                prettify(&payload)
            } else {
                payload
            };
            writeln!(writer, "{}", rendered)?;
            Err(Box::new(e))
        }
    }
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if args.debug {
        tracing_subscriber::fmt()
            .with_env_filter("cuadro_core=debug")
            .with_writer(io::stderr)
            .init();
    }

    let options = EngineOptions {
        threads: args.threads,
        normalize: NormalizeOptions {
            fill_down: args.fill_down,
        },
    };
    let engine = ExtractionEngine::with_options(LopdfBackend, MemoryStore::new(), options);

    // Open output file or use stdout
    let mut output: Box<dyn Write> = if args.outfile == "-" {
        Box::new(BufWriter::new(io::stdout()))
    } else {
        let file = File::create(&args.outfile)
            .map_err(|e| format!("Failed to create output file {}: {}", args.outfile, e))?;
        Box::new(BufWriter::new(file))
    };

    // Process each input file. One failed file does not stop the batch;
    // it is reported and reflected in the exit status.
    let mut had_error = false;
    for path in &args.files {
        if !path.exists() {
            eprintln!("Error: File not found: {}", path.display());
            had_error = true;
            continue;
        }

        if let Err(e) = process_file(&engine, path, &mut output, &args) {
            eprintln!("Error processing {}: {}", path.display(), e);
            had_error = true;
        }
    }

    output.flush()?;

    if had_error {
        std::process::exit(1);
    }

    Ok(())
}
