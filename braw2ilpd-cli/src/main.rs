// braw2ilpd-cli/src/main.rs
//
// Command-line entry point: parses arguments, sets up logging, runs the
// extraction pipeline from braw2ilpd-core, and maps per-artifact outcomes to
// exit codes.

use braw2ilpd_core::{ArtifactOutcome, DumpToolSource, ExtractionOptions};
use clap::Parser;
use log::debug;
use std::process;

mod cli;
use cli::Cli;

// Exit codes kept close to the classic tool: 2 when the clip cannot be
// queried, 7 when an artifact write fails.
const EXIT_SOURCE_FAILURE: i32 = 2;
const EXIT_WRITE_FAILURE: i32 = 7;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    process::exit(run(cli));
}

fn run(cli: Cli) -> i32 {
    debug!(
        "Using attribute dump tool '{}' for clip '{}'",
        cli.dump_tool,
        cli.input.display()
    );

    let source = match DumpToolSource::open(&cli.dump_tool, &cli.input) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error: {e}");
            return EXIT_SOURCE_FAILURE;
        }
    };

    let options = ExtractionOptions {
        output_arg: cli.output.clone(),
        write_report: cli.all,
    };
    let summary = braw2ilpd_core::run_extraction(&source, &cli.input, &options);

    let mut exit_code = 0;
    match &summary.primary {
        ArtifactOutcome::Written(path) => {
            println!("ILPD projection data saved to: {}", path.display());
        }
        ArtifactOutcome::Skipped(reason) => {
            eprintln!("Warning: {reason}, ILPD file not created");
        }
        ArtifactOutcome::Failed(e) => {
            eprintln!("Error: {e}");
            exit_code = EXIT_WRITE_FAILURE;
        }
    }

    if let Some(report) = &summary.report {
        match report {
            ArtifactOutcome::Written(path) => {
                println!("Detailed attributes saved to: {}", path.display());
            }
            ArtifactOutcome::Skipped(reason) => {
                eprintln!("Warning: detailed attributes not written: {reason}");
            }
            ArtifactOutcome::Failed(e) => {
                eprintln!("Error: {e}");
                exit_code = EXIT_WRITE_FAILURE;
            }
        }
    }

    debug!("Extraction finished with exit code {exit_code}");
    if exit_code == 0 {
        println!("Extraction completed successfully!");
    }
    exit_code
}
