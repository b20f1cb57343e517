mod report;
mod walk;

use anyhow::Result;
use clap::Parser;
use shatag_core::{check_file, Algorithm, Mode, Stats};
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use crate::report::{Reporter, Verbosity};
use crate::walk::{for_each_target, Target};

const EXIT_CORRUPT: u8 = 5;
const EXIT_ALL_FAILED: u8 = 3;
const EXIT_SOME_FAILED: u8 = 2;

#[derive(Parser, Debug)]
#[command(
    name = "shatag",
    author,
    version,
    about = "Detect silent data corruption using checksums stored in extended attributes",
    long_about = None
)]
struct Cli {
    /// Files or directories to check
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Descend into directories
    #[arg(short, long)]
    recursive: bool,

    /// Remove all shatag attributes instead of checking
    #[arg(long)]
    remove: bool,

    /// Use MD5 instead of SHA-256
    #[arg(long)]
    md5: bool,

    /// Only compare the checksum in the file name with the stored one
    #[arg(long, conflicts_with = "check_filename")]
    filename_only: bool,

    /// Also require the file name to carry the checksum of an ok file
    #[arg(long)]
    check_filename: bool,

    /// Do not print ok files
    #[arg(short, long)]
    quiet: bool,

    /// Only print corrupt files and errors
    #[arg(long)]
    qq: bool,

    /// Print the run summary as JSON on stdout; verdict lines move to stderr
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn algorithm(&self) -> Algorithm {
        if self.md5 {
            Algorithm::Md5
        } else {
            Algorithm::Sha256
        }
    }

    fn mode(&self) -> Mode {
        Mode {
            remove: self.remove,
            filename_only: self.filename_only,
            verify_filename: self.check_filename,
        }
    }

    fn verbosity(&self) -> Verbosity {
        if self.qq {
            Verbosity::VeryQuiet
        } else if self.quiet {
            Verbosity::Quiet
        } else {
            Verbosity::Normal
        }
    }
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .init();
    let cli = Cli::parse();

    let algorithm = cli.algorithm();
    let mode = cli.mode();
    // stdout carries only the JSON summary under --json
    let out: Box<dyn Write> = if cli.json {
        Box::new(io::stderr().lock())
    } else {
        Box::new(io::stdout().lock())
    };
    let mut reporter = Reporter::new(out, cli.verbosity());
    let mut stats = Stats::default();
    let mut output = Ok(());

    for_each_target(&cli.paths, cli.recursive, |target| {
        if output.is_err() {
            return;
        }
        match target {
            Target::File(path) => {
                let verdict = check_file(algorithm, &path, mode);
                stats.record(&verdict);
                output = reporter.verdict(&verdict);
            }
            Target::Skipped { path, reason } => {
                stats.record_skipped();
                reporter.skipped(&path, &reason);
            }
        }
    });
    output?;
    drop(reporter);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else if cli.verbosity() > Verbosity::VeryQuiet {
        eprintln!("{stats}");
    }

    Ok(ExitCode::from(exit_status(&stats)))
}

fn exit_status(stats: &Stats) -> u8 {
    if stats.has_corruption() {
        EXIT_CORRUPT
    } else if stats.has_errors() && stats.errors() >= stats.total {
        EXIT_ALL_FAILED
    } else if stats.has_errors() {
        EXIT_SOME_FAILED
    } else {
        0
    }
}
