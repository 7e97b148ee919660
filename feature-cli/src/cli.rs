use clap::{Parser, Subcommand};
use std::path::PathBuf;

use feature_core::ImportFormat;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Edit feature lists and import them from loosely structured files")]
pub struct Cli {
    /// Folder holding the feature list files (defaults to the configured folder)
    #[clap(long, short = 'f', env = "FM_FOLDER", global = true)]
    pub folder: Option<PathBuf>,

    /// Show debug output
    #[clap(long, short = 'v', global = true)]
    pub verbose: bool,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the feature files in the folder
    Files,

    /// Create a new, empty feature file
    New,

    /// Rename a feature file (fails if the new name is taken)
    Rename {
        /// Current file name
        old: String,

        /// New file name
        new: String,
    },

    /// Show the features of a file
    Show {
        /// File name within the folder
        file: String,
    },

    /// Add a feature to a file
    Add {
        /// File name within the folder
        file: String,

        /// Name of the feature
        #[clap(long)]
        name: Option<String>,

        /// Description of the feature
        #[clap(long)]
        description: Option<String>,

        /// Priority 1-10 (anything else means "none")
        #[clap(long)]
        priority: Option<i64>,
    },

    /// Delete a feature from a file
    Del {
        /// File name within the folder
        file: String,

        /// Id of the feature to delete
        id: i64,
    },

    /// Import features from a JSON, delimited text or spreadsheet file
    Import {
        /// Source file
        source: PathBuf,

        /// Source format (json, delimited, spreadsheet); inferred from the extension if omitted
        #[clap(long)]
        format: Option<ImportFormat>,

        /// Merge into this feature file instead of printing the result
        #[clap(long)]
        into: Option<String>,

        /// Write the imported features to this path instead of stdout
        #[clap(long, short = 'o', conflicts_with = "into")]
        output: Option<PathBuf>,
    },

    /// Export a feature file as JSON or delimited text (by extension)
    Export {
        /// File name within the folder
        file: String,

        /// Output path
        output: PathBuf,
    },

    /// Edit a feature file interactively (with undo/redo)
    Edit {
        /// File name within the folder
        file: String,
    },

    /// Settings management
    #[clap(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the current settings
    Show,

    /// Write the default settings file if there is none
    Init,

    /// Print the path to the settings file
    Path,
}
