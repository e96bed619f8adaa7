//! MileSort CLI
//!
//! CLI tool for checking mileage labels and running the offer sorter against
//! saved snapshots of the offers page.

mod snapshot;

#[cfg(feature = "e2e")]
mod e2e;

use std::fs;
use std::path::Path;

use clap::{Parser, Subcommand, ValueEnum};

use ms_core::{
    is_multiplier, parse_mileage, MultiplierRule, OfferPage, OfferSorter, SortOptions, SortProfile,
    SorterConfig,
};

use crate::snapshot::SnapshotPage;

#[derive(Parser)]
#[command(name = "ms-cli")]
#[command(about = "MileSort offer sorting tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
enum ProfileArg {
    Simple,
    Instrumented,
}

impl From<ProfileArg> for SortProfile {
    fn from(arg: ProfileArg) -> Self {
        match arg {
            ProfileArg::Simple => SortProfile::Simple,
            ProfileArg::Instrumented => SortProfile::Instrumented,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Parse mileage labels
    Parse {
        /// Label texts, e.g. "Up to 12,500 miles"
        #[arg(required = true)]
        labels: Vec<String>,

        /// Use the strict multiplier rule ("<N>X miles" only)
        #[arg(long)]
        strict: bool,
    },

    /// Sort the offers in a saved HTML snapshot
    Sort {
        /// Snapshot of the offers page
        #[arg(short, long)]
        input: String,

        /// Hide multiplier offers
        #[arg(short, long)]
        filter_multipliers: bool,

        /// Build flavour to emulate
        #[arg(short, long, value_enum, default_value = "simple")]
        profile: ProfileArg,

        /// JSON config overriding the profile
        #[arg(short, long)]
        config: Option<String>,

        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the configuration for a profile
    Config {
        #[arg(short, long, value_enum, default_value = "simple")]
        profile: ProfileArg,
    },

    /// Run browser checks against the unpacked extension
    #[cfg(feature = "e2e")]
    E2e {
        /// WebDriver endpoint
        #[arg(long, default_value = "http://localhost:9515")]
        chromedriver_url: String,

        /// Unpacked extension directory
        #[arg(long)]
        extension_path: String,

        #[arg(long)]
        headless: bool,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Parse { labels, strict } => cmd_parse(&labels, strict),
        Commands::Sort {
            input,
            filter_multipliers,
            profile,
            config,
            json,
        } => cmd_sort(&input, filter_multipliers, profile.into(), config.as_deref(), json),
        Commands::Config { profile } => cmd_config(profile.into()),
        #[cfg(feature = "e2e")]
        Commands::E2e {
            chromedriver_url,
            extension_path,
            headless,
        } => e2e::run_e2e(e2e::E2eOptions {
            chromedriver_url,
            extension_path,
            headless,
        }),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn cmd_parse(labels: &[String], strict: bool) -> Result<(), String> {
    let rule = if strict { MultiplierRule::Strict } else { MultiplierRule::Loose };
    for label in labels {
        let marker = if is_multiplier(label, rule) { " (multiplier)" } else { "" };
        println!("{:>8}  {:?}{}", parse_mileage(label), label, marker);
    }
    Ok(())
}

fn load_config(profile: SortProfile, path: Option<&str>) -> Result<SorterConfig, String> {
    match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .map_err(|e| format!("Failed to read '{}': {}", path, e))?;
            SorterConfig::from_json(&text).map_err(|e| format!("'{}': {}", path, e))
        }
        None => Ok(SorterConfig::for_profile(profile)),
    }
}

fn cmd_sort(
    input: &str,
    filter_multipliers: bool,
    profile: SortProfile,
    config_path: Option<&str>,
    json: bool,
) -> Result<(), String> {
    let config = load_config(profile, config_path)?;
    let html = snapshot::read_html(Path::new(input))?;
    let page = SnapshotPage::new(&html);

    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| format!("Failed to start tokio runtime: {}", e))?;
    let outcome = runtime
        .block_on(OfferSorter::new(&config).sort(&page, SortOptions { filter_multipliers }))
        .map_err(|e| e.to_string())?;

    if json {
        let text = serde_json::to_string_pretty(&outcome)
            .map_err(|e| format!("Failed to serialize JSON: {}", e))?;
        println!("{}", text);
        return Ok(());
    }

    println!("Sorted {} offers in '{}'", outcome.count, input);
    for tile in page.ranking() {
        println!("  {:>3}. {}", tile.order + 1, tile.text);
    }

    let carousel = config
        .selectors
        .carousel
        .as_deref()
        .and_then(|selector| page.query(selector));
    let hidden = page.hidden(carousel.as_ref());
    if !hidden.is_empty() {
        println!("Hidden ({}):", hidden.len());
        for text in hidden {
            println!("       {}", text);
        }
    }

    if let Some(metrics) = outcome.metrics {
        println!(
            "  Time:     {:.1}ms (load: {:.1}ms, parse: {:.1}ms, reorder: {:.1}ms)",
            metrics.total_ms, metrics.load_ms, metrics.parse_ms, metrics.reorder_ms,
        );
        println!(
            "  Tiles:    {} processed, {} filtered, {} load attempt(s)",
            metrics.total_tiles, metrics.filtered_out, metrics.load_attempts
        );
    }

    Ok(())
}

fn cmd_config(profile: SortProfile) -> Result<(), String> {
    let text = SorterConfig::for_profile(profile)
        .to_json_pretty()
        .map_err(|e| e.to_string())?;
    println!("{}", text);
    Ok(())
}
