#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the CRICOS registry import tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use cricos_ingest::{import_contacts, import_institution, import_institutions};
use cricos_store::JsonFileStore;

#[derive(Parser)]
#[command(name = "cricos_ingest", about = "CRICOS registry import tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a range of provider ids and write them to the store
    Institutions {
        /// First provider id (inclusive)
        #[arg(long)]
        from: u32,
        /// Last provider id (inclusive)
        #[arg(long)]
        to: u32,
        /// Maximum extractions in flight at once (each on its own session)
        #[arg(long, default_value = "4")]
        concurrency: usize,
        /// Data directory for the JSON store
        #[arg(long, default_value = "data")]
        output: PathBuf,
    },
    /// Import a single institution and print it as JSON
    Institution {
        /// Provider id to import
        provider_id: u32,
    },
    /// Import the per-state contact directory and write it to the store
    Contacts {
        /// Data directory for the JSON store
        #[arg(long, default_value = "data")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Institutions {
            from,
            to,
            concurrency,
            output,
        } => {
            let institutions = import_institutions(from, to, concurrency).await;
            let path = JsonFileStore::new(output).save_institutions(&institutions)?;
            println!("{} institutions -> {}", institutions.len(), path.display());
        }
        Commands::Institution { provider_id } => match import_institution(provider_id).await? {
            Some(institution) => println!("{}", serde_json::to_string_pretty(&institution)?),
            None => println!("provider {provider_id} not found"),
        },
        Commands::Contacts { output } => {
            let contacts = import_contacts().await?;
            let path = JsonFileStore::new(output).save_contacts(&contacts)?;
            println!("{} contacts -> {}", contacts.len(), path.display());
        }
    }

    Ok(())
}
