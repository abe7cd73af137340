use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;

/// Command-line arguments for the repack tool
#[derive(Debug, Default)]
pub struct Args {
    /// Enable verbose output
    pub verbose: bool,

    /// Directory holding the extracted package parts
    pub source: Option<PathBuf>,

    /// Package file to create (overwritten if present)
    pub output: Option<PathBuf>,

    /// Path to a repack config file
    pub config: Option<PathBuf>,
}

impl Args {
    /// Parse command-line arguments
    pub fn parse() -> Self {
        Self::from_matches(&command().get_matches())
    }

    fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            verbose: matches.get_flag("verbose"),
            source: matches.get_one::<String>("source").map(PathBuf::from),
            output: matches.get_one::<String>("output").map(PathBuf::from),
            config: matches.get_one::<String>("config").map(PathBuf::from),
        }
    }
}

fn command() -> Command {
    Command::new("hwpx-repack")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Rebuild an HWPX package from extracted parts in canonical member order")
        .arg(
            Arg::new("source")
                .short('s')
                .long("source")
                .value_name("DIR")
                .env("HWPX_REPACK_SOURCE")
                .help("Directory containing the extracted package parts"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Package file to write (default: <source>.hwpx)"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Config file with source, output and member order"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Enable verbose output"),
        )
}
