use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Parse test filter expressions and select tests from a catalog
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Filter set expression, e.g. "Category:Smoke exclude Category:Flaky"
    #[arg(short, long, global = true, env = "TEST_SELECT_FILTER")]
    pub filter: Option<String>,

    /// Path to a TOML config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short = 'F', long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// When to color text output
    #[arg(long, global = true, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the tokens of an expression
    Tokens {
        /// Expression to tokenize
        expression: String,
    },
    /// Parse a filter set expression and print its canonical form
    Parse {
        /// Expression to parse
        expression: String,

        /// Also print the parsed tree
        #[arg(long)]
        tree: bool,
    },
    /// Select tests from a JSON or JSON5 catalog
    Select {
        /// Catalog file
        catalog: PathBuf,

        /// List unselected tests as well
        #[arg(short, long)]
        all: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

impl Cli {
    /// Log level implied by `--quiet` and `-v`.
    pub fn log_level(&self) -> log::LevelFilter {
        if self.quiet {
            return log::LevelFilter::Error;
        }
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}

pub fn cli_parse() -> Cli {
    Cli::parse()
}
