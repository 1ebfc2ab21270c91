//! Homoglyph Check CLI Application
//!
//! Expands a domain into its visually confusable variants and checks which of
//! them can still be registered. This is a thin front end over
//! homoglyph-check-lib: argument parsing, configuration precedence, logging
//! and report rendering.

mod ui;

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::Parser;
use homoglyph_check_lib::{
    encodable_candidates, estimate_candidate_count, load_env_config, merge_registrar_config,
    validate_base_domain, CheckConfig, ConfigManager, EnvConfig, HomoglyphChecker, LoadedConfig,
    NullSink, Progress, Registrar, RegistrarBackend, ReportRow, DEFAULT_CONFIG_PATH,
};
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

/// CLI arguments for homoglyph-check
#[derive(Parser, Debug)]
#[command(name = "homoglyph-check")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Check domain availability for similar-looking domains")]
#[command(
    long_about = "Check domain availability for similar-looking domains.\n\nEvery character of the domain is replaced by each of its look-alikes from the\nconfiguration file, and every resulting name is checked with the registrar,\none at a time."
)]
#[command(styles = STYLES)]
pub struct Args {
    /// The base domain to check for similar-looking domains (e.g. apple.com)
    #[arg(value_name = "DOMAIN")]
    pub domain: String,

    /// Confusable-character file [default: similar_chars.toml]
    #[arg(long = "config", value_name = "FILE", help_heading = "Configuration")]
    pub config: Option<String>,

    /// List the candidates that would be checked without contacting the registrar
    #[arg(long = "dry-run", help_heading = "Output Format")]
    pub dry_run: bool,

    /// Output the final report as JSON
    #[arg(short = 'j', long = "json", help_heading = "Output Format")]
    pub json: bool,

    /// Verbose logging
    #[arg(short = 'v', long = "verbose", help_heading = "Configuration")]
    pub verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();

    init_logger(args.verbose);

    if let Err(e) = run(args).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Install the stderr log subscriber. `RUST_LOG` wins over `--verbose`.
fn init_logger(verbose: bool) {
    let default_filter = if verbose {
        "homoglyph_check=debug,homoglyph_check_lib=debug,warn"
    } else {
        "homoglyph_check=info,homoglyph_check_lib=info,warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let domain = validate_base_domain(&args.domain)?;

    let env_config = load_env_config();
    let config_path = resolve_config_path(&args, &env_config);
    tracing::debug!("Using configuration file {}", config_path);

    let loaded = ConfigManager::new().load_file(&config_path)?;
    let config = build_config(&loaded, &env_config);

    if args.dry_run {
        print_dry_run(&domain, &loaded);
        return Ok(());
    }

    let registrar = RegistrarBackend::from_config(&config).await?;
    let total = estimate_candidate_count(&domain, &loaded.confusables);
    let registrar_name = registrar.name();
    let checker = HomoglyphChecker::new(loaded.confusables, registrar, config.retry, config.pacing);

    if args.json {
        let report = checker.run(&domain, &mut NullSink).await;
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    ui::print_header(&domain, total, registrar_name);
    let mut print_row = |row: &ReportRow, progress: Progress| ui::print_row(row, progress);
    let report = checker.run(&domain, &mut print_row).await;

    println!();
    println!("Full Results:");
    print!("{}", ui::render_table(&report));
    ui::print_summary(&report.summary(), total.saturating_sub(report.len()));

    Ok(())
}

/// Configuration file path: `--config`, then `HOMOGLYPH_CONFIG`, then the default.
fn resolve_config_path(args: &Args, env_config: &EnvConfig) -> String {
    args.config
        .clone()
        .or_else(|| env_config.config.clone())
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string())
}

/// Build the run configuration.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (HOMOGLYPH_*)
/// 2. `[registrar]` table of the configuration file
/// 3. Built-in defaults
fn build_config(loaded: &LoadedConfig, env_config: &EnvConfig) -> CheckConfig {
    let mut config = CheckConfig::default();
    if let Some(registrar) = &loaded.registrar {
        config = merge_registrar_config(config, registrar);
    }
    env_config.apply(config)
}

fn print_dry_run(domain: &str, loaded: &LoadedConfig) {
    let total = estimate_candidate_count(domain, &loaded.confusables);
    let candidates = encodable_candidates(domain, &loaded.confusables);

    for (candidate, encoded) in &candidates {
        println!("{}", ui::format_candidate(candidate, encoded));
    }
    eprintln!(
        "{} candidates would be checked ({} of {} generated were not encodable)",
        candidates.len(),
        total - candidates.len(),
        total
    );
}
