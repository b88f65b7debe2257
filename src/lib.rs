pub mod catalog;
pub mod cli;
pub mod config;
pub mod descriptor;
pub mod display;
pub mod filter;
pub mod selection;

use anyhow::Context;
use log::{debug, info};

pub use catalog::{CatalogError, CatalogTest, TestCatalog, TestRecord, TypeDecl};
pub use cli::{Cli, ColorMode, Commands, OutputFormat, cli_parse};
pub use config::{ConfigError, SelectorConfig, load_config, load_config_from_path};
pub use descriptor::{Metadata, TestDescriptor, TypeRef};
pub use filter::{
    Filter, FilterKey, FilterParseError, FilterRule, FilterRuleType, FilterSet, FilterSetResult,
    ValueFilter, parse_filter, parse_filter_optional, parse_filter_set, to_filter_expr,
    to_filter_set_expr, tokenize, tokenize_optional,
};
pub use selection::{SelectionEntry, select};

fn init_logging(cli: &Cli) {
    // RUST_LOG still wins over the flags
    let _ = env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .format_timestamp(None)
        .try_init();
}

fn apply_color_mode(mode: ColorMode) {
    match mode {
        ColorMode::Always => colored::control::set_override(true),
        ColorMode::Never => colored::control::set_override(false),
        ColorMode::Auto => {}
    }
}

/// The `--filter` expression if given, otherwise the config's filter set.
fn effective_filter_set(cli: &Cli, config: &SelectorConfig) -> anyhow::Result<FilterSet> {
    match cli.filter.as_deref() {
        Some(expression) => {
            debug!("using filter set from command line: {expression}");
            parse_filter_set(expression).context("Invalid filter expression")
        }
        None => {
            debug!("using filter set from profile '{}'", config.profile_name);
            Ok(config.filter_set()?)
        }
    }
}

pub fn run() -> anyhow::Result<()> {
    let cli = cli_parse();
    init_logging(&cli);
    apply_color_mode(cli.color);

    let config = load_config(cli.config.as_deref()).context("Failed to load config")?;
    info!("config profile: {}", config.profile_name);

    let output = match &cli.command {
        Commands::Tokens { expression } => {
            display::render_tokens(&tokenize(expression), cli.format)
        }
        Commands::Parse { expression, tree } => {
            let set = parse_filter_set(expression)?;
            display::render_filter_set(&set, *tree, cli.format)
        }
        Commands::Select { catalog, all } => {
            let set = effective_filter_set(&cli, &config)?;
            info!("filter set: {set}");
            let catalog = TestCatalog::load(catalog)?;
            let entries = select(&catalog, &set);
            display::render_selection(&entries, &config.output, *all, cli.format)
        }
    };

    print!("{output}");
    Ok(())
}
