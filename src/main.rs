mod cli;

use std::path::PathBuf;

use anyhow::Result;
use babel::config::BabelConfig;
use babel::entry::{EntryType, TypeFilter};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cli::entry::EntryFields;

#[derive(Parser)]
#[command(name = "babel", version, about = "Capture and curate words, phrases, authors, concepts and excerpts")]
struct Cli {
    /// Config file to use instead of ~/.babel/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check the store connection and print a health report
    Doctor,
    /// List every entry, newest first
    List,
    /// Search entries by text and type
    Search {
        /// Matched case-insensitively against title, content, and source
        #[arg(default_value = "")]
        term: String,
        /// all, word, phrase, author, concept, or excerpt
        #[arg(long = "type", default_value = "all")]
        filter: TypeFilter,
    },
    /// Record a new entry
    Add {
        /// word, phrase, author, concept, or excerpt
        #[arg(long = "type")]
        entry_type: EntryType,
        #[command(flatten)]
        fields: EntryFields,
    },
    /// Change fields of an existing entry
    Edit {
        id: String,
        #[arg(long = "type")]
        entry_type: Option<EntryType>,
        #[command(flatten)]
        fields: EntryFields,
    },
    /// Delete an entry
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
    /// Bulk-create entries from a JSON file (or free text with --smart)
    Import {
        file: PathBuf,
        /// Parse unstructured notes instead of JSON
        #[arg(long)]
        smart: bool,
        /// Batch label stamped on every imported entry
        #[arg(long)]
        batch: Option<String>,
    },
    /// Export all entries as JSON to stdout
    Export,
    /// Show counts by type, category, and batch
    Stats,
    /// Interactive search: type to filter, results update as they arrive
    Browse,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => BabelConfig::load_from(path)?,
        None => BabelConfig::load()?,
    };

    // Log to stderr so stdout stays clean for listings and exports.
    let filter = EnvFilter::try_new(&config.client.log_level)
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Doctor => cli::doctor::doctor(&config, cli.config.as_deref()).await?,
        Command::List => cli::search::list(&config).await?,
        Command::Search { term, filter } => cli::search::search(&config, &term, filter).await?,
        Command::Add { entry_type, fields } => cli::entry::add(&config, entry_type, fields).await?,
        Command::Edit {
            id,
            entry_type,
            fields,
        } => cli::entry::edit(&config, &id, entry_type, fields).await?,
        Command::Delete { id, yes } => cli::entry::delete(&config, &id, yes).await?,
        Command::Import { file, smart, batch } => {
            cli::import::import(&config, &file, smart, batch.as_deref()).await?
        }
        Command::Export => cli::export::export(&config).await?,
        Command::Stats => cli::stats::stats(&config).await?,
        Command::Browse => cli::browse::browse(&config).await?,
    }

    Ok(())
}
