use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::commands::entry::EntryPatch;

#[derive(Parser, Debug)]
#[command(name = "ilre", version, about = "Offline-first prompt catalog with cloud backup")]
pub struct Cli {
    /// Data directory (database and config). Defaults to the platform data dir.
    #[arg(long, global = true, env = "ILRE_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List entries, newest first
    List {
        #[arg(long)]
        category: Option<String>,
        #[arg(long, short)]
        search: Option<String>,
    },
    /// Show one entry
    Show { id: String },
    /// Add a new entry
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        body: String,
        #[arg(long, default_value = "txt2img")]
        category: String,
        #[command(flatten)]
        fields: EntryFields,
    },
    /// Edit an existing entry
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        body: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[command(flatten)]
        fields: EntryFields,
    },
    /// Delete an entry (queued for remote deletion)
    Remove { id: String },
    /// Upload local changes to the cloud
    Push,
    /// Replace all local data with the cloud copy
    Pull {
        /// Confirm that local data will be discarded
        #[arg(long)]
        yes: bool,
    },
    /// Storage usage and sync state
    Status,
    /// Check the cloud connection
    Ping,
    /// Configure the cloud connection
    Config {
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        key: Option<String>,
        #[arg(long)]
        table: Option<String>,
    },
}

#[derive(Args, Debug, Default)]
pub struct EntryFields {
    /// Tags separated by commas or spaces
    #[arg(long)]
    pub tags: Option<String>,
    #[arg(long)]
    pub negative: Option<String>,
    /// Output media URL or data URI
    #[arg(long)]
    pub media: Option<String>,
    /// Input/reference media URL or data URI
    #[arg(long)]
    pub input_media: Option<String>,
    #[arg(long)]
    pub video: Option<bool>,
}

impl EntryFields {
    pub fn into_patch(self) -> EntryPatch {
        EntryPatch {
            tags: self.tags,
            negative_body: self.negative,
            primary_media_ref: self.media,
            secondary_media_ref: self.input_media,
            is_video: self.video,
            ..EntryPatch::default()
        }
    }
}
