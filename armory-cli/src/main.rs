//! armory CLI
//!
//! Command-line interface for the armor tracker companion: runs the
//! spreadsheet extraction pipeline and the REST API server.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stderr;

mod commands;
mod error;

#[derive(Parser)]
#[command(name = "armory")]
#[command(about = "Armor tracker companion: extraction pipeline and API server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Common arguments for commands that touch the static assets tree.
#[derive(Args, Clone)]
struct AssetArgs {
    /// Static assets root (data/ and images/ live beneath it)
    #[arg(long, default_value = "public", env = "ARMORY_ASSETS")]
    assets: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the spreadsheet extraction pipeline
    Extract {
        /// Read a local workbook file instead of downloading
        #[arg(long)]
        workbook: Option<PathBuf>,

        /// Published Google Sheet id to download the workbook from
        #[arg(long, env = "ARMORY_SHEET_ID")]
        sheet_id: Option<String>,

        /// Write catalog JSON only; skip icon fetch/convert
        #[arg(long)]
        skip_images: bool,

        /// Concurrent icon conversions
        #[arg(long, default_value_t = armory_extract::DEFAULT_CONCURRENCY)]
        concurrency: usize,

        /// Icon byte cache directory (default: the platform cache dir)
        #[arg(long)]
        cache_dir: Option<PathBuf>,

        #[command(flatten)]
        assets: AssetArgs,
    },

    /// Start the REST API server
    Serve {
        /// Bind address
        #[arg(long, default_value = "127.0.0.1:3000", env = "ARMORY_ADDR")]
        addr: String,

        /// SQLite database path
        #[arg(long, default_value = "armory.db", env = "ARMORY_DB")]
        db: PathBuf,

        /// Deployment environment; `dev` relaxes catalog caching
        #[arg(long, default_value = "dev", env = "ARMORY_ENV")]
        env: String,

        /// Session lifetime in days
        #[arg(long, default_value_t = 30)]
        session_ttl: i64,

        #[command(flatten)]
        assets: AssetArgs,
    },
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Extract {
            workbook,
            sheet_id,
            skip_images,
            concurrency,
            cache_dir,
            assets,
        } => {
            commands::extract::run(
                workbook,
                sheet_id,
                skip_images,
                concurrency,
                cache_dir,
                assets.assets,
            )
            .await
        }
        Commands::Serve {
            addr,
            db,
            env,
            session_ttl,
            assets,
        } => commands::serve::run(addr, db, env, session_ttl, assets.assets).await,
    };

    if let Err(e) = result {
        eprintln!(
            "{} {e}",
            "error:".if_supports_color(Stderr, |t| t.bright_red())
        );
        std::process::exit(1);
    }
}
