use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Clipboard history manager with encrypted local persistence.
#[derive(Parser, Debug)]
#[command(name = "pastelet", version, about)]
pub struct Cli {
    /// Configuration file (defaults to `<data_dir>/config.toml` when present)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Watch the clipboard and record history until interrupted
    Run,

    /// Print the history, newest first
    List,

    /// Put the entry at INDEX (as shown by `list`) back on the clipboard
    Paste { index: usize },

    /// Delete all history entries and stored images
    Clear,

    /// Generate a new encryption key and re-encrypt the history with it
    RotateKey,

    /// Restore example snippets and clear all history
    Reset,

    /// Manage applications whose clipboard content is never recorded
    Exclude {
        #[command(subcommand)]
        action: ExcludeAction,
    },

    /// Manage saved snippets
    Snippets {
        #[command(subcommand)]
        action: SnippetsAction,
    },
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ExcludeAction {
    /// Stop recording content copied from APP_ID
    Add { app_id: String },
    /// Resume recording content copied from APP_ID
    Remove { app_id: String },
    /// Print the excluded application identifiers
    List,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum SnippetsAction {
    /// Print folders and their snippets
    List,
    /// Add a snippet to the folder at FOLDER (as shown by `snippets list`)
    Add {
        folder: usize,
        title: String,
        content: String,
    },
    /// Put a snippet on the clipboard without recording it in history
    Paste { folder: usize, snippet: usize },
    /// Replace all snippets with the example set
    Reset,
}
