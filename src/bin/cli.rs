//! PyCycle CLI - circular import detection for Python source trees.
//!
//! Usage:
//!   pycycle -r <dir>                  # Report cycles (same as `check`)
//!   pycycle -r <dir> check -f json    # Machine-readable report
//!   pycycle -r <dir> check -e g.dot   # Report and export the graph
//!   pycycle -r <dir> export -o g.dot  # Export only
//!   pycycle -r <dir> stats            # Module and import counts

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::io::IsTerminal;
use std::path::Path;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pycycle::cli::{log_level, Cli, Commands, OutputFormat};
use pycycle::{
    build_graph, export_dot, export_dot_or_warn, render_text, AnalysisReport, AnalyzerConfig,
};

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so reports on stdout stay clean
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(log_level(cli.verbose))),
        )
        .init();

    if cli.no_color || !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "Fatal:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let root = cli.root.canonicalize().unwrap_or_else(|_| cli.root.clone());
    let mut config = match &cli.config {
        Some(path) => AnalyzerConfig::try_load(path)?,
        None => AnalyzerConfig::discover(&root),
    };
    if cli.hidden {
        config.include_hidden = true;
    }
    if cli.no_ignore {
        config.respect_gitignore = false;
    }

    match cli.command.unwrap_or_default() {
        Commands::Check { format, export } => {
            if format == OutputFormat::Text {
                println!("Starting PyCycle Analysis...");
                println!("Target Directory: {}", root.display());
            }
            let outcome = build_graph(&root, &config)
                .with_context(|| format!("could not analyze {}", root.display()))?;
            let cycles = outcome.graph.find_cycles();
            let report = AnalysisReport::new(&root, &outcome, cycles);

            match format {
                OutputFormat::Text => print!("{}", render_text(&report)),
                OutputFormat::Json => println!("{}", report.to_json()?),
            }

            if let Some(path) = export.or(config.export) {
                if export_dot_or_warn(outcome.graph.graph(), &path) && format == OutputFormat::Text
                {
                    print_export_tip(&path);
                }
            }
        }

        Commands::Export { output } => {
            let outcome = build_graph(&root, &config)
                .with_context(|| format!("could not analyze {}", root.display()))?;
            export_dot(outcome.graph.graph(), &output)?;
            print_export_tip(&output);
        }

        Commands::Stats => {
            let outcome = build_graph(&root, &config)
                .with_context(|| format!("could not analyze {}", root.display()))?;
            let stats = outcome.graph.stats();
            info!(%stats, "stats computed");
            println!("PyCycle - Import Graph");
            println!("══════════════════════");
            println!("Files:    {}", outcome.stats.files_scanned);
            println!("Failed:   {}", outcome.stats.files_failed);
            println!("Modules:  {}", stats.module_count);
            println!("Imports:  {}", stats.edge_count);
            println!("Self:     {}", stats.self_imports);
        }
    }

    Ok(())
}

fn print_export_tip(path: &Path) {
    println!("\nGraph exported to {}", path.display().to_string().cyan());
    println!(
        "   Tip: Render it using '{}'",
        format!("dot -Tpng {} -o graph.png", path.display()).yellow()
    );
}
