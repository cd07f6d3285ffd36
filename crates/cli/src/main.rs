//! xzbundle CLI
//!
//! - `xzbundle archive --store DIR -c CONTAINER -o OUTPUT [...]` runs one
//!   archive and prints the JSON response
//! - `xzbundle archive --store DIR --request FILE|-` reads a JSON request
//! - `xzbundle config` prints the default `xzbundle.toml`
//!
//! A failed run prints a JSON failure report and exits with status 1.
//! Logs go to stderr so stdout stays machine-readable.

mod commands;
mod parse;

use std::path::Path;
use std::process;

use clap::ArgMatches;
use xzbundle_core::Stage;
use xzbundle_engine::{
    ArchiveFailure, ArchiveOrchestrator, ArchiveResponse, BundleConfig, BundleError,
};
use xzbundle_storage::LocalObjectStore;

use commands::build_cli;
use parse::{log_level, matches_to_config, matches_to_request};

fn main() {
    let matches = build_cli().get_matches();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(log_level(&matches))
        .init();

    let exit_code = match matches.subcommand() {
        Some(("archive", sub)) => run_archive(sub),
        Some(("config", sub)) => run_config(sub),
        _ => 2,
    };
    process::exit(exit_code);
}

fn run_archive(matches: &ArgMatches) -> i32 {
    match archive(matches) {
        Ok(response) => print_json(&response),
        Err(e) => {
            tracing::error!(target: "xzbundle::cli", error = %e, "Archive run failed");
            print_json(&ArchiveFailure::from_error(&e));
            1
        }
    }
}

fn archive(matches: &ArgMatches) -> Result<ArchiveResponse, BundleError> {
    let config = matches_to_config(matches)?;
    let request = matches_to_request(matches)?;

    let root = matches
        .get_one::<String>("store")
        .map(String::as_str)
        .unwrap_or(".");
    let store =
        LocalObjectStore::new(root).map_err(|e| BundleError::storage(Stage::Listing, root, e))?;

    ArchiveOrchestrator::new(&store, config)?.run(&request)
}

fn run_config(matches: &ArgMatches) -> i32 {
    match matches.get_one::<String>("write") {
        Some(path) => match BundleConfig::write_default_if_missing(Path::new(path)) {
            Ok(()) => {
                eprintln!("Config at {}", path);
                0
            }
            Err(e) => {
                eprintln!("{}", e);
                1
            }
        },
        None => {
            print!("{}", BundleConfig::default_toml());
            0
        }
    }
}

/// Pretty JSON on stdout; 0 on success
fn print_json<T: serde::Serialize>(value: &T) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(text) => {
            println!("{}", text);
            0
        }
        Err(e) => {
            eprintln!("Failed to encode output: {}", e);
            1
        }
    }
}
