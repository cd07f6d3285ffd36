//! Clap command tree definition.

use clap::{Arg, ArgAction, Command};

/// Build the complete CLI command tree.
pub fn build_cli() -> Command {
    Command::new("xzbundle")
        .about("Bundle stored objects into a verified tar.xz archive")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("More log output on stderr (repeat for trace)")
                .action(ArgAction::Count)
                .global(true),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Only log errors")
                .action(ArgAction::SetTrue)
                .conflicts_with("verbose")
                .global(true),
        )
        .subcommand(build_archive())
        .subcommand(build_config())
}

// =========================================================================
// archive
// =========================================================================

fn build_archive() -> Command {
    Command::new("archive")
        .about("Archive objects, upload the archive, then optionally delete them")
        .arg(
            Arg::new("store")
                .long("store")
                .help("Root directory of the local object store (one subdirectory per container)")
                .required(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("Path to xzbundle.toml (default: built-in settings)"),
        )
        .arg(
            Arg::new("request")
                .long("request")
                .help("JSON request file, or '-' for stdin")
                .conflicts_with_all(["container", "prefix", "key", "output", "delete"]),
        )
        .arg(
            Arg::new("container")
                .short('c')
                .long("container")
                .help("Container holding the sources")
                .required_unless_present("request"),
        )
        .arg(
            Arg::new("prefix")
                .short('p')
                .long("prefix")
                .help("Only archive keys starting with this"),
        )
        .arg(
            Arg::new("key")
                .short('k')
                .long("key")
                .help("Archive only this key (repeatable)")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .help("Key to upload the archive to")
                .required_unless_present("request"),
        )
        .arg(
            Arg::new("delete")
                .long("delete")
                .help("Delete the sources after a verified upload")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("level")
                .short('l')
                .long("level")
                .help("xz compression level 0-9, overrides the config file")
                .value_parser(clap::value_parser!(u32).range(0..=9)),
        )
}

// =========================================================================
// config
// =========================================================================

fn build_config() -> Command {
    Command::new("config")
        .about("Print the default configuration file")
        .arg(
            Arg::new("write")
                .long("write")
                .help("Write the defaults to this path unless it already exists"),
        )
}
