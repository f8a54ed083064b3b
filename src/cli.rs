//! Command-line front end
//!
//! ```text
//! pdf-tools split -i in.pdf [--outdir DIR] [--zip FILE.zip]
//! pdf-tools info -i in.pdf [--json]
//! pdf-tools compress -i in.pdf -o out.pdf
//! pdf-tools remove-pages -i in.pdf -o out.pdf --pages '2,5-8,11' [--mode keep]
//! ```

use crate::archive;
use crate::config::ValidationMode;
use crate::error::{Error, Result};
use crate::pdf::PdfEngine;
use crate::processor::{Processor, RemovePagesRequest};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pdf-tools")]
#[command(about = "Split, inspect, compress and remove pages from PDF files")]
#[command(version)]
pub struct Cli {
    /// Override PDF_VALIDATION_MODE (strict | relaxed)
    #[arg(long, global = true)]
    pub validation: Option<ValidationMode>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Split a PDF into one file per page
    #[command(alias = "burst")]
    Split {
        /// Input PDF
        #[arg(short, long)]
        input: PathBuf,

        /// Directory for the parts (default: a temporary directory)
        #[arg(long)]
        outdir: Option<PathBuf>,

        /// Write the parts into this ZIP archive
        #[arg(long)]
        zip: Option<PathBuf>,
    },

    /// Show page count and file size
    Info {
        /// Input PDF
        #[arg(short, long)]
        input: PathBuf,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Rewrite a PDF with compressed streams
    Compress {
        /// Input PDF
        #[arg(short, long)]
        input: PathBuf,

        /// Output PDF
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Remove the selected pages, or keep only them
    RemovePages {
        /// Input PDF
        #[arg(short, long)]
        input: PathBuf,

        /// Output PDF
        #[arg(short, long)]
        output: PathBuf,

        /// Page selection, e.g. "2,5-8,11"
        #[arg(short, long)]
        pages: String,

        /// remove | keep
        #[arg(short, long, default_value = "remove")]
        mode: String,
    },
}

/// Process exit code for a failed command: 2 for caller input errors,
/// 1 for everything else.
pub fn exit_code(err: &Error) -> u8 {
    if err.is_client_error() {
        2
    } else {
        1
    }
}

/// Execute `command`, writing human-readable output to `out`.
pub fn run<E, W>(command: Commands, processor: &Processor<E>, out: &mut W) -> Result<()>
where
    E: PdfEngine,
    W: Write,
{
    match command {
        Commands::Split {
            input,
            outdir,
            zip,
        } => {
            // Parts only needed for the archive go to a scratch dir removed afterwards
            let scratch = match (&outdir, &zip) {
                (None, Some(_)) => Some(processor.scratch_dir("pdf-split-")?),
                _ => None,
            };
            let target = outdir
                .as_deref()
                .or_else(|| scratch.as_ref().map(|dir| dir.path()));

            let result = processor.split(&input, target)?;

            match zip {
                Some(zip_path) => {
                    archive::zip_files(&zip_path, &result.file_paths())?;
                    writeln!(out, "wrote {}", zip_path.display())?;
                }
                None => {
                    writeln!(out, "parts:")?;
                    for file in &result.files {
                        writeln!(out, "{}", file)?;
                    }
                }
            }
        }
        Commands::Info { input, json } => {
            let info = processor.info(&input)?;
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&info)?)?;
            } else {
                writeln!(out, "File: {}", info.filename)?;
                writeln!(out, "Pages: {}", info.total_pages)?;
                writeln!(out, "Size: {} bytes", info.size_bytes)?;
            }
        }
        Commands::Compress { input, output } => {
            let result = processor.compress(&input, &output)?;
            writeln!(out, "Original size: {} bytes", result.original_size)?;
            writeln!(out, "Compressed size: {} bytes", result.compressed_size)?;
            writeln!(out, "Reduction: {:.2}%", result.reduction_percent)?;
            writeln!(out, "Output: {}", result.output_path)?;
        }
        Commands::RemovePages {
            input,
            output,
            pages,
            mode,
        } => {
            let request = RemovePagesRequest::new(input, output, Some(&pages), Some(&mode))?;
            let result = processor.remove_pages(&request)?;
            writeln!(out, "Mode: {}", result.mode)?;
            writeln!(out, "Original pages: {}", result.original_pages)?;
            writeln!(out, "Removed: {} pages", result.removed_count)?;
            writeln!(out, "Remaining: {} pages", result.remaining_pages)?;
            writeln!(out, "Output: {}", result.output_path)?;
        }
    }

    Ok(())
}
