//! WooCommerce YML CLI - Offline feed rendering and store checks.
//!
//! # Usage
//!
//! ```bash
//! # Render the full feed to stdout
//! woo-yml render
//!
//! # Render a filtered feed to a file
//! woo-yml render --categories 5,shoes --exclude-categories 9 -o feed.xml
//!
//! # Check that the store is reachable and WooCommerce is active
//! woo-yml check
//! ```
//!
//! # Commands
//!
//! - `render` - Build the YML document once, exactly as the server would
//! - `check` - Run the platform check
//!
//! Configuration comes from the same `WOOCOMMERCE_*` variables as the server.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "woo-yml")]
#[command(author, version, about = "WooCommerce YML feed tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the feed once
    Render {
        /// Include every category and product
        #[arg(long)]
        all: bool,

        /// Comma-separated category ids or slugs to include
        #[arg(long)]
        categories: Option<String>,

        /// Comma-separated category ids or slugs to exclude
        #[arg(long)]
        exclude_categories: Option<String>,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Check the store and WooCommerce plugin
    Check,
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so a rendered feed on stdout stays clean
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "woo_yml=info,woo_yml_server=info".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Render {
            all,
            categories,
            exclude_categories,
            output,
        } => {
            let query = commands::render::query(all, categories, exclude_categories);
            commands::render::run(&query, output.as_deref()).await?;
        }
        Commands::Check => commands::check::run().await?,
    }
    Ok(())
}
