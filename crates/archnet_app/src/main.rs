// SPDX-License-Identifier: MIT OR Apache-2.0
//! Archnet - grows canvas documents with AI-generated note cards.
//!
//! A canvas is a JSON graph of positioned cards and connections. Archnet
//! reconstructs the ancestor chain of a selected card into a prompt, hands
//! it to a completion engine (a remote HTTP API or a locally spawned
//! inference process) and appends the completions as child cards laid out
//! below the selection.
//!
//! ## Architecture
//!
//! The binary is a thin command layer: the document model and layout math
//! live in `archnet_canvas`, the engine bindings in `archnet_engine`. Every
//! command is one read→compute→write cycle guarded by a per-document lock.

mod command;
mod settings;

use archnet_canvas::{CanvasError, DocumentLocks, FsCanvasStore};
use clap::{Parser, Subcommand};
use command::{CommandContext, CommandError};
use settings::Settings;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "archnet", version, about = "Grow canvas documents with AI-generated note cards")]
struct Cli {
    /// Settings file path.
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand)]
enum CliCommand {
    /// Expand the selected card with engine completions.
    Expand {
        /// Canvas file to grow.
        #[arg(long)]
        canvas: PathBuf,
        /// Selected card id. Exactly one is required.
        #[arg(long = "node")]
        nodes: Vec<String>,
        /// Completions to request, overriding the settings value.
        #[arg(long)]
        count: Option<usize>,
    },
    /// Print the prompt that would be sent for the selected card.
    Prompt {
        /// Canvas file to read.
        #[arg(long)]
        canvas: PathBuf,
        /// Selected card id. Exactly one is required.
        #[arg(long = "node")]
        nodes: Vec<String>,
    },
    /// Place file cards on the canvas in a grid.
    AddFiles {
        /// Canvas file to grow.
        #[arg(long)]
        canvas: PathBuf,
        /// Files to reference, one card each.
        files: Vec<String>,
    },
    /// Write a default settings file.
    SettingsInit,
}

fn main() {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive("archnet=info".parse().unwrap());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Archnet v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("failed to start runtime: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(run(cli)) {
        tracing::error!("command failed: {e:#}");
        eprintln!("{}", user_notice(&e));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let settings_path = cli
        .settings
        .unwrap_or_else(|| PathBuf::from(settings::SETTINGS_FILE_NAME));
    let settings = Settings::load_or_default(&settings_path)?;

    let store = FsCanvasStore::new();
    let locks = DocumentLocks::new();
    let ctx = CommandContext {
        store: &store,
        locks: &locks,
    };

    match cli.command {
        CliCommand::Expand {
            canvas,
            nodes,
            count,
        } => {
            let engine = command::engine_from_settings(&settings.engine)?;
            let result =
                command::expand(&ctx, engine.as_ref(), &settings, &canvas, &nodes, count).await;
            if let Err(e) = engine.shutdown().await {
                tracing::warn!("engine shutdown failed: {e}");
            }
            let outcome = result?;
            println!(
                "Added {} generated card(s) to {}",
                outcome.created.len(),
                canvas.display()
            );
        }
        CliCommand::Prompt { canvas, nodes } => {
            let prompt = command::prompt(&ctx, &canvas, &nodes).await?;
            println!("{prompt}");
        }
        CliCommand::AddFiles { canvas, files } => {
            let created = command::add_files(&ctx, &settings, &canvas, &files).await?;
            println!("Added {} file card(s) to {}", created.len(), canvas.display());
        }
        CliCommand::SettingsInit => {
            settings.save(&settings_path)?;
            println!("Wrote settings to {}", settings_path.display());
        }
    }

    Ok(())
}

/// Map an error to the single notice shown to the user.
fn user_notice(err: &anyhow::Error) -> String {
    if let Some(cmd) = err.downcast_ref::<CommandError>() {
        return match cmd {
            CommandError::NotACanvas(_) => "No active canvas file.".to_string(),
            CommandError::Canvas(CanvasError::Malformed(_)) => {
                "An unexpected error has occurred. It's possible the canvas file contents \
                 are out of sync. Wait a few moments before running commands."
                    .to_string()
            }
            other => other.to_string(),
        };
    }
    err.to_string()
}
