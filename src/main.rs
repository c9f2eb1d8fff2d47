//! Glosa - Bilingual Dictionary Client
//!
//! Entry point: parses arguments, sets up logging and configuration, then
//! runs batch lookups, the interactive prompt or a maintenance command.

use anyhow::Result;
use clap::Parser;
use console::style;
use tracing::{info, Level};
use tracing_subscriber::{filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};
use tracing_appender::{non_blocking, rolling};

use glosa::cache::{CacheStore, JsonFileStore};
use glosa::cli::{Args, CacheAction, Commands, ConfigAction};
use glosa::config::{data_dir, Config};
use glosa::error::GlosaError;
use glosa::lookup::{Dictionary, LookupOptions};
use glosa::render::{render_origin, render_result};
use glosa::repl::Repl;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Setup logging to both console and file
    setup_logging(args.verbose)?;

    // Load configuration
    let config = Config::load(args.config.as_deref())?;

    let options = LookupOptions::new(
        args.from.as_deref().unwrap_or(&config.session.from),
        args.to.as_deref().unwrap_or(&config.session.to),
    )
    .with_audio(args.audio || config.session.with_audio);

    match args.command.unwrap_or(Commands::Repl) {
        Commands::Repl => {
            let dictionary = Dictionary::from_config(&config, !args.no_cache)?;
            validate_pair(&dictionary, &options)?;
            info!("Starting prompt for {} -> {}", options.from, options.to);

            let mut repl = Repl::new(&dictionary, options);
            repl.run().await?;
        }
        Commands::Lookup { words } => {
            let dictionary = Dictionary::from_config(&config, !args.no_cache)?;
            validate_pair(&dictionary, &options)?;

            for word in &words {
                match dictionary.lookup(word, &options).await {
                    Ok(outcome) => {
                        println!("{} {}", style(word).green().bold(), render_origin(&outcome));
                        println!("{}", render_result(&outcome.result, &options));
                    }
                    Err(e) => {
                        println!("{}", style(word).green().bold());
                        println!("{}\n", style(e).red().bold());
                    }
                }
            }
        }
        Commands::Locales => {
            println!("{:<6} {:<15} {:<8}", "Code", "Name", "Context");
            println!("{}", "-".repeat(31));
            for entry in &config.locales {
                println!("{:<6} {:<15} {:<8}", entry.code, entry.name, entry.context);
            }
        }
        Commands::Cache { action } => {
            let store = JsonFileStore::new(config.cache_dir());
            manage_cache(&store, action).await?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Init { output, force } => {
                if output.exists() && !force {
                    return Err(GlosaError::Config(format!(
                        "{} already exists, use --force to overwrite",
                        output.display()
                    ))
                    .into());
                }
                Config::default().save_to_file(&output)?;
                println!("Wrote default configuration to {}", output.display());
            }
        },
    }

    Ok(())
}

/// Reject an unsupported configured pair before any prompt is shown
fn validate_pair(dictionary: &Dictionary, options: &LookupOptions) -> Result<()> {
    dictionary.locales().resolve_pair(&options.from, &options.to)?;
    Ok(())
}

async fn manage_cache(store: &JsonFileStore, action: CacheAction) -> Result<()> {
    match action {
        CacheAction::List => {
            let pairs = store.pairs().await?;
            if pairs.is_empty() {
                println!("No cached lookups found.");
                return Ok(());
            }

            println!("\nCached Language Pairs:");
            println!("{:<10} {:<10} {:<25}", "Pair", "Entries", "Updated");
            println!("{}", "-".repeat(45));
            for pair in pairs {
                if let Some(document) = store.read(&pair).await? {
                    let updated = document
                        .updated_at
                        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                        .unwrap_or_else(|| "-".to_string());
                    println!("{:<10} {:<10} {:<25}", pair, document.data.len(), updated);
                }
            }
        }
        CacheAction::Info => {
            let pairs = store.pairs().await?;
            let mut entries = 0;
            let mut size = 0;
            for pair in &pairs {
                if let Some(document) = store.read(pair).await? {
                    entries += document.data.len();
                }
                if let Ok(metadata) = tokio::fs::metadata(store.dir().join(format!("{}.json", pair))).await {
                    size += metadata.len();
                }
            }

            println!("\nCache Statistics:");
            println!("Directory: {}", store.dir().display());
            println!("Language pairs: {}", pairs.len());
            println!("Cached lookups: {}", entries);
            println!("Total cache size: {:.2} KB", size as f64 / 1024.0);
        }
        CacheAction::Clear { pair } => {
            let pairs = match pair {
                Some(pair) => vec![pair],
                None => store.pairs().await?,
            };

            let mut count = 0;
            for pair in &pairs {
                if store.remove(pair).await? {
                    count += 1;
                }
            }
            println!("Cleared {} cached language pairs", count);
        }
    }
    Ok(())
}

/// Setup logging to both console and file
fn setup_logging(verbose: bool) -> Result<()> {
    // Create log directory
    let log_dir = data_dir().join("log");
    std::fs::create_dir_all(&log_dir)?;

    // Set up file appender with daily rotation
    let file_appender = rolling::daily(&log_dir, "glosa.log");
    let (non_blocking_file, _guard) = non_blocking(file_appender);
    // Keep the guard alive for the duration of the program
    std::mem::forget(_guard);

    // Determine log level
    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    // The prompt shares the terminal, so the console only shows warnings unless verbose
    let console_level = if verbose { LevelFilter::DEBUG } else { LevelFilter::WARN };
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .with_filter(console_level);

    // Create file layer
    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false); // No ANSI colors in file

    // Setup layered subscriber
    let subscriber = tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer);

    // Initialize the subscriber
    subscriber.try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!("Logging initialized - level: {}, file: {}",
          log_level, log_dir.join("glosa.log").display());

    Ok(())
}
