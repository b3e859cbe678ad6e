//! Bencode command-line tool.
//!
//! Reads one bencode document from a file or stdin and decodes, checks,
//! canonicalizes or interprets it as torrent metainfo. Data goes to stdout,
//! logs go to stderr.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use clap_verbosity_flag::InfoLevel;
use serde_json::json;
use tracing::debug;

use rush_bencode::bencode::{
    decode_with_options, encode, validate_canonical, DecodeOptions, DuplicateKeyPolicy,
};
use rush_bencode::{DecodeError, Metainfo};

#[derive(Parser)]
#[command(name = "bencode")]
#[command(version, about = "Strict, canonical bencode codec", long_about = None)]
struct Cli {
    #[command(flatten)]
    verbosity: clap_verbosity_flag::Verbosity<InfoLevel>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a document and print its diagnostic rendering
    Decode {
        /// Input file, or `-` for stdin
        #[arg(value_name = "PATH")]
        path: Option<PathBuf>,

        /// Accept unsorted and repeated dictionary keys
        #[arg(long, action = ArgAction::SetTrue)]
        lenient: bool,

        /// Maximum container nesting depth
        #[arg(long, value_name = "N")]
        max_depth: Option<usize>,

        /// Print a JSON result object instead of the rendering
        #[arg(long, action = ArgAction::SetTrue)]
        json: bool,
    },

    /// Check that a document is canonical bencode
    Check {
        /// Input file, or `-` for stdin
        #[arg(value_name = "PATH")]
        path: Option<PathBuf>,

        /// Maximum container nesting depth
        #[arg(long, value_name = "N")]
        max_depth: Option<usize>,
    },

    /// Rewrite a document in canonical form
    Canonicalize {
        /// Input file, or `-` for stdin
        #[arg(value_name = "PATH")]
        path: Option<PathBuf>,

        /// Output file (stdout if omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Fail on repeated dictionary keys instead of keeping the last value
        #[arg(long, action = ArgAction::SetTrue)]
        reject_duplicates: bool,
    },

    /// Print the metainfo of a .torrent file as JSON
    Metainfo {
        /// Input file, or `-` for stdin
        #[arg(value_name = "PATH")]
        path: Option<PathBuf>,
    },

    /// Show version information
    Version,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.verbosity)
        .with_writer(io::stderr)
        .init();

    match run(cli.command) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> anyhow::Result<ExitCode> {
    match command {
        Commands::Decode {
            path,
            lenient,
            max_depth,
            json,
        } => {
            let input = read_input(path.as_deref())?;
            let base = if lenient {
                DecodeOptions::lenient()
            } else {
                DecodeOptions::strict()
            };
            let options = with_depth(base, max_depth);

            match decode_with_options(&input, options) {
                Ok(value) if json => {
                    println!("{}", json!({ "ok": { "render": value.to_string() } }));
                }
                Ok(value) => println!("{}", value),
                Err(err) if json => {
                    println!("{}", error_json(&err));
                    return Ok(ExitCode::FAILURE);
                }
                Err(err) => return Err(err).context("input is not valid bencode"),
            }
            Ok(ExitCode::SUCCESS)
        }

        Commands::Check { path, max_depth } => {
            let input = read_input(path.as_deref())?;
            let options = with_depth(DecodeOptions::strict(), max_depth);

            match validate_canonical(&input, options) {
                Ok(()) => {
                    println!(
                        "{}",
                        json!({ "ok": { "canonical": true, "bytes": input.len() } })
                    );
                    Ok(ExitCode::SUCCESS)
                }
                Err(err) => {
                    println!("{}", error_json(&err));
                    Ok(ExitCode::FAILURE)
                }
            }
        }

        Commands::Canonicalize {
            path,
            output,
            reject_duplicates,
        } => {
            let input = read_input(path.as_deref())?;
            let mut options = DecodeOptions::lenient();
            if reject_duplicates {
                options = options.with_duplicate_keys(DuplicateKeyPolicy::Reject);
            }

            let value =
                decode_with_options(&input, options).context("input is not valid bencode")?;
            let canonical = encode(&value);
            debug!(
                input_len = input.len(),
                output_len = canonical.len(),
                changed = canonical != input,
                "canonicalized"
            );

            match output {
                Some(out) => fs::write(&out, &canonical)
                    .with_context(|| format!("failed to write {}", out.display()))?,
                None => {
                    let mut stdout = io::stdout().lock();
                    stdout.write_all(&canonical)?;
                    stdout.flush()?;
                }
            }
            Ok(ExitCode::SUCCESS)
        }

        Commands::Metainfo { path } => {
            let input = read_input(path.as_deref())?;
            let meta = Metainfo::from_bytes(&input).context("not a valid torrent file")?;
            debug!(info_bytes = meta.info_bytes().len(), "extracted metainfo");
            println!("{}", serde_json::to_string_pretty(&meta)?);
            Ok(ExitCode::SUCCESS)
        }

        Commands::Version => {
            println!("bencode v{}", env!("CARGO_PKG_VERSION"));
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Read the whole input from `path`, or from stdin when it is absent or `-`.
fn read_input(path: Option<&Path>) -> anyhow::Result<Vec<u8>> {
    match path {
        Some(p) if p != Path::new("-") => {
            fs::read(p).with_context(|| format!("failed to read {}", p.display()))
        }
        _ => {
            let mut buf = Vec::new();
            io::stdin()
                .lock()
                .read_to_end(&mut buf)
                .context("failed to read stdin")?;
            Ok(buf)
        }
    }
}

fn with_depth(options: DecodeOptions, max_depth: Option<usize>) -> DecodeOptions {
    match max_depth {
        Some(depth) => options.with_max_nesting_depth(depth),
        None => options,
    }
}

fn error_json(err: &DecodeError) -> serde_json::Value {
    json!({
        "err": {
            "code": err.code(),
            "name": err.name(),
            "offset": err.offset(),
            "message": err.to_string(),
        }
    })
}
