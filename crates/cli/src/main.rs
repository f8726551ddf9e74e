//! Popup demo CLI - share links, presets and checkout scenario replay.
//!
//! # Usage
//!
//! ```bash
//! # Encode a share link for a preset with a custom accent colour
//! pd-cli share encode --preset g --company "Acme" --accent "#ff0066"
//!
//! # Decode a share link (full URL or fragment)
//! pd-cli share decode "https://demo.example.com/demo#v3_..."
//!
//! # List presets
//! pd-cli presets
//!
//! # Replay a checkout scenario against recording doubles
//! pd-cli simulate crates/cli/scenarios/single_select.yaml
//! ```
//!
//! # Environment Variables
//!
//! - `DEMO_BASE_URL` - Default base URL for `share encode`

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

use commands::share::EncodeArgs;

#[derive(Parser)]
#[command(name = "pd-cli")]
#[command(author, version, about = "Popup demo CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode or decode share links
    Share {
        #[command(subcommand)]
        action: ShareAction,
    },
    /// List the preset storefronts
    Presets,
    /// Replay a YAML checkout scenario and print what happened
    Simulate {
        /// Scenario file
        file: PathBuf,
    },
}

#[derive(Subcommand)]
enum ShareAction {
    /// Build a share fragment (and URL) from options
    Encode(EncodeArgs),
    /// Print the configuration a share link carries
    Decode {
        /// Share URL, fragment or bare token
        input: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Share { action } => match action {
            ShareAction::Encode(args) => commands::share::encode(&args)?,
            ShareAction::Decode { input } => commands::share::decode(&input)?,
        },
        Commands::Presets => commands::presets::list()?,
        Commands::Simulate { file } => commands::simulate::run_file(&file).await?,
    }
    Ok(())
}
