//! Turn parsed arguments into a request and configuration.

use std::io::Read;
use std::path::Path;

use clap::ArgMatches;
use tracing::Level;
use xzbundle_engine::{ArchiveRequest, BundleConfig, BundleError};

/// Log level from `-v` / `-q`
pub fn log_level(matches: &ArgMatches) -> Level {
    if matches.get_flag("quiet") {
        return Level::ERROR;
    }
    match matches.get_count("verbose") {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Build the request from `--request` or from individual flags
pub fn matches_to_request(matches: &ArgMatches) -> Result<ArchiveRequest, BundleError> {
    if let Some(source) = matches.get_one::<String>("request") {
        let text = read_request_text(source)?;
        return ArchiveRequest::from_json(&text);
    }

    let container = matches
        .get_one::<String>("container")
        .cloned()
        .unwrap_or_default();
    let output = matches
        .get_one::<String>("output")
        .cloned()
        .unwrap_or_default();
    let mut request = ArchiveRequest::new(container, output)
        .with_delete_after_archive(matches.get_flag("delete"));
    if let Some(prefix) = matches.get_one::<String>("prefix") {
        request = request.with_prefix(prefix.clone());
    }
    if let Some(keys) = matches.get_many::<String>("key") {
        request = request.with_keys(keys.cloned());
    }
    request.validate()?;
    Ok(request)
}

fn read_request_text(source: &str) -> Result<String, BundleError> {
    let text = if source == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text).map(|_| text)
    } else {
        std::fs::read_to_string(source)
    };
    text.map_err(|e| {
        BundleError::InvalidRequest(format!("cannot read request '{}': {}", source, e))
    })
}

/// Load `--config` if given, then apply `--level`
pub fn matches_to_config(matches: &ArgMatches) -> Result<BundleConfig, BundleError> {
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => BundleConfig::from_file(Path::new(path))?,
        None => BundleConfig::default(),
    };
    if let Some(level) = matches.get_one::<u32>("level") {
        config = config.with_compression_level(*level);
    }
    config.validate()?;
    Ok(config)
}
