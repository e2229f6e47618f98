//! xfdashboard-tool
//!
//! Inspect what the dashboard would make of selectors, theme stylesheets
//! and key binding files, without starting the dashboard.

mod inspect;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Inspect xfdashboard selectors, stylesheets and bindings
#[derive(Parser, Debug)]
#[command(name = "xfdashboard-tool")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Show how a selector is parsed
    xfdashboard-tool selector 'XfdashboardViewSelector > .view-button:focus'

    # List the rules of a theme stylesheet
    xfdashboard-tool stylesheet ~/.themes/xfdashboard/xfdashboard-1.0/xfdashboard.css

    # List the bindings the dashboard would load
    xfdashboard-tool bindings

    # List the bindings of one file as JSON
    xfdashboard-tool bindings --file ./bindings.xml --json
"#)]
struct Cli {
    /// Log debug output (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse selectors and print their rule chains
    Selector {
        /// Selectors to parse
        #[arg(value_name = "SELECTOR", required = true)]
        selectors: Vec<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Parse a theme stylesheet and list its rules
    Stylesheet {
        /// Stylesheet file
        #[arg(value_name = "FILE")]
        path: PathBuf,

        /// Priority given to the sheet's selectors
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        priority: i32,
    },

    /// Load binding files and list the bindings
    Bindings {
        /// Files to load in order; defaults to the system, user and
        /// override files
        #[arg(short, long = "file", value_name = "FILE")]
        files: Vec<PathBuf>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Selector { selectors, json } => inspect::selectors(&selectors, json),
        Command::Stylesheet { path, priority } => inspect::stylesheet(&path, priority),
        Command::Bindings { files, json } => inspect::bindings(&files, json),
    }
}
