// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Akshar — English/Hindi OCR for scanned images and PDFs
//
// Entry point. Initialises logging, loads config, and dispatches to the
// extract command or diagnostics. Every error ends here: logged with its full
// chain, shown to the user in plain words, non-zero exit.

mod doctor;
mod extract;
mod logging;
mod output;
mod progress;
mod prompt;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use akshar_core::AksharError;
use akshar_core::AppConfig;
use akshar_core::human_errors::humanize_error;
use akshar_document::{Pdftoppm, TesseractCli};
use anyhow::Context;
use clap::{Parser, Subcommand};

use extract::{Engines, ExtractArgs, Outcome};
use logging::LogHandle;
use prompt::Prompter;

#[derive(Parser, Debug)]
#[command(name = "akshar", version, about, args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    extract: ExtractArgs,

    /// Show informational messages on the terminal
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file to use instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check that tesseract and pdftoppm are installed
    Doctor,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let log = logging::init(cli.verbose);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Akshar starting");

    match run(cli, &log) {
        Ok(code) => code,
        Err(err) => {
            tracing::error!("{err:#}");
            report(&err, &log);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, log: &LogHandle) -> anyhow::Result<ExitCode> {
    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => AppConfig::load()?,
    };

    match cli.command {
        Some(Commands::Doctor) => {
            let report = doctor::run_diagnostics(&config, log.path.as_deref());
            report.write_to(&mut io::stdout().lock())?;
            Ok(if report.all_passed() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        None => {
            let recognizer = TesseractCli::new(&config.tesseract_cmd);
            let rasterizer = Pdftoppm::new(config.poppler_path.clone());
            let mut prompter = Prompter::new(io::stdin().lock(), io::stdout().lock());
            let outcome = extract::run_extract(
                &cli.extract,
                &config,
                Engines {
                    recognizer: &recognizer,
                    rasterizer: &rasterizer,
                },
                &mut prompter,
            )?;
            if let Outcome::Written(destination) = outcome {
                tracing::info!(%destination, "Extraction finished");
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Plain-language error on stderr, with a pointer to the log.
fn report(err: &anyhow::Error, log: &LogHandle) {
    let mut stderr = io::stderr().lock();
    match err.downcast_ref::<AksharError>() {
        Some(akshar) => {
            let human = humanize_error(akshar);
            let _ = writeln!(stderr, "Error: {}", human.message);
            let _ = writeln!(stderr, "  {}", human.suggestion);
        }
        None => {
            let _ = writeln!(stderr, "Error: {err:#}");
        }
    }
    if let Some(path) = &log.path {
        let _ = writeln!(stderr, "Details were written to {}", path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn output_flags_are_exclusive() {
        assert!(Cli::try_parse_from(["akshar", "scan.png", "-o", "out", "--print"]).is_err());
        assert!(Cli::try_parse_from(["akshar", "scan.png", "-d", "-p"]).is_err());
        let cli = Cli::try_parse_from(["akshar", "scan.png", "-d", "--english-only"]).unwrap();
        assert!(cli.extract.download && cli.extract.english_only);
        assert!(cli.command.is_none());
    }

    #[test]
    fn doctor_subcommand_parses() {
        let cli = Cli::try_parse_from(["akshar", "doctor", "--verbose"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Doctor)));
        assert!(cli.verbose);
    }
}
