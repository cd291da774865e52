use anyhow::Result;
use clap::{Arg, Command};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use trend_analyzer::source::source_for_path;
use trend_analyzer::{Analyzer, Config, OutputFormat, TrendReport};

#[tokio::main]
async fn main() -> Result<()> {
    let matches = Command::new("Trend Analyzer")
        .version("0.1.0")
        .author("TigreRoll")
        .about("Word cloud, top keywords and category rankings for trending videos")
        .arg(
            Arg::new("input")
                .short('i')
                .long("input")
                .value_name("PATH")
                .help("JSON file or directory of JSON files with video records")
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file (TOML)")
        )
        .arg(
            Arg::new("format")
                .short('f')
                .long("format")
                .value_name("FORMAT")
                .help("Output format")
                .value_parser(["json", "text"])
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Write the report to a file instead of stdout")
        )
        .arg(
            Arg::new("locale")
                .long("locale")
                .value_name("TAG")
                .help("Locale for number formatting in text output")
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging")
                .action(clap::ArgAction::SetTrue)
        )
        .get_matches();

    let verbose = matches.get_flag("verbose");

    // Config is read before logging is set up, so load warnings go to stderr directly
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => Config::from_file(path).unwrap_or_else(|e| {
            eprintln!("Failed to load config {}, using defaults: {:#}", path, e);
            Config::from_env()
        }),
        None => Config::load().unwrap_or_else(|e| {
            eprintln!("Failed to load config, using defaults: {:#}", e);
            Config::default()
        }),
    };

    let log_level = if verbose { "debug" } else { config.output.log_level.as_str() };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("trend_analyzer={},warn", log_level)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Some(input) = matches.get_one::<String>("input") {
        config.input.path = Some(PathBuf::from(input));
    }
    if let Some(format) = matches.get_one::<String>("format") {
        config.output.format = format.parse()?;
    }
    if let Some(output) = matches.get_one::<String>("output") {
        config.output.path = Some(PathBuf::from(output));
    }
    if let Some(locale) = matches.get_one::<String>("locale") {
        config.display.locale = locale.clone();
    }

    config.reset_invalid_sections();

    info!("🚀 Trend Analyzer starting...");
    if verbose {
        info!("{}", config.summary());
    }

    let start_time = std::time::Instant::now();
    let (analyzer, source_name) = match config.input.path.as_deref() {
        Some(path) => {
            let source = source_for_path(path);
            let analyzer = Analyzer::from_source(source.as_ref(), &config.analysis).await;
            (analyzer, source.describe())
        }
        None => (
            Analyzer::with_config(None, &config.analysis),
            "<unavailable>".to_string(),
        ),
    };

    info!(
        "📊 Aggregated {} videos in {:.2}ms",
        analyzer.record_count(),
        start_time.elapsed().as_secs_f64() * 1000.0
    );

    let report = TrendReport::new(&analyzer, source_name);
    let rendered = match config.output.format {
        OutputFormat::Json => report.to_json(config.output.pretty)?,
        OutputFormat::Text => report.render_text(&config.display.locale),
    };

    match &config.output.path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(path, rendered).await?;
            info!("💾 Report written to: {}", path.display());
        }
        None => println!("{}", rendered),
    }

    Ok(())
}
