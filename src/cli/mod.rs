//! CLI module for PyCycle.
//!
//! Commands:
//! - check: report import cycles (default)
//! - export: write the import graph as Graphviz DOT
//! - stats: module and import counts

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pycycle")]
#[command(version, about = "Find circular imports in a Python source tree")]
pub struct Cli {
    /// Project root directory (default: current directory)
    #[arg(short, long, global = true, default_value = ".")]
    pub root: PathBuf,

    /// Config file (default: <root>/.pycycle.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose logging (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Disable coloured output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Include hidden files and directories
    #[arg(long, global = true)]
    pub hidden: bool,

    /// Scan files even if .gitignore excludes them
    #[arg(long, global = true)]
    pub no_ignore: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan the tree and report every import cycle
    Check {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Also write the import graph to this DOT file
        #[arg(short, long)]
        export: Option<PathBuf>,
    },

    /// Write the full import graph as a Graphviz DOT file
    Export {
        /// Destination file
        #[arg(short, long, default_value = "graph.dot")]
        output: PathBuf,
    },

    /// Show module and import counts
    Stats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl Default for Commands {
    fn default() -> Self {
        Commands::Check {
            format: OutputFormat::Text,
            export: None,
        }
    }
}

/// Tracing filter directive for a `-v` count.
pub fn log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_defaults_to_check() {
        let cli = Cli::parse_from(["pycycle", "--root", "src"]);
        assert_eq!(cli.root, PathBuf::from("src"));
        assert!(cli.command.is_none());
        assert!(matches!(
            cli.command.unwrap_or_default(),
            Commands::Check {
                format: OutputFormat::Text,
                export: None
            }
        ));
    }

    #[test]
    fn test_check_with_json_and_export() {
        let cli = Cli::parse_from(["pycycle", "check", "-f", "json", "-e", "out.dot", "-vv"]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Some(Commands::Check { format, export }) => {
                assert_eq!(format, OutputFormat::Json);
                assert_eq!(export, Some(PathBuf::from("out.dot")));
            }
            _ => panic!("expected check"),
        }
    }

    #[test]
    fn test_log_level() {
        assert_eq!(log_level(0), "warn");
        assert_eq!(log_level(1), "info");
        assert_eq!(log_level(9), "trace");
    }
}
