//! # Templight - Template Fragment Highlighting
//!
//! Finds `<% %>` script fragments in a note and prints the decorations an
//! editor would apply to them.
//!
//! ## Quick Start
//!
//! ```bash
//! # Decorate a note with the default config
//! cargo run -- path/to/note.md
//!
//! # Use a specific config file
//! cargo run -- --config templight.toml path/to/note.md
//!
//! # Write the default config to the user config directory
//! cargo run -- --init-config
//! ```

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use templight_buffer::TextBuffer;
use templight_core::{Config, ViewController};

/// Templight - highlights template script fragments
#[derive(Parser, Debug)]
#[command(name = "templight")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Document to decorate
    #[arg(value_name = "FILE", required_unless_present = "init_config")]
    file: Option<PathBuf>,

    /// Config file to use instead of the default location
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Save the default config and exit
    #[arg(long)]
    init_config: bool,

    /// Print compact JSON
    #[arg(long)]
    compact: bool,

    /// Verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = match args.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    tracing::info!("Starting Templight v{}", env!("CARGO_PKG_VERSION"));

    if args.init_config {
        let path = Config::default_path()?;
        Config::default().save_to(&path)?;
        println!("{}", path.display());
        return Ok(());
    }

    let config = match &args.config {
        Some(path) => Config::load_from(path)
            .map_err(|e| anyhow::anyhow!("Cannot load {}: {}", path.display(), e))?,
        None => Config::load(),
    };

    let Some(file) = args.file else {
        anyhow::bail!("No document given");
    };
    let document = TextBuffer::from_file(&file)
        .map_err(|e| anyhow::anyhow!("Cannot open {}: {}", file.display(), e))?;

    let view = ViewController::from_config(&config, &document)?;
    let decorations = view.decorations();

    let output = if args.compact {
        serde_json::to_string(&*decorations)?
    } else {
        serde_json::to_string_pretty(&*decorations)?
    };
    println!("{}", output);

    view.destroy();
    Ok(())
}
