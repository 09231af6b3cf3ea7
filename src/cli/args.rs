// src/cli/args.rs
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)] // Read from `Cargo.toml`
#[command(arg_required_else_help = true, disable_help_subcommand = true)]
pub struct Args {
    /// Path to config file (optional)
    #[arg(short, long, value_name = "CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Verbosity level (-v = debug, -vv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List all notes with resolved image URLs
    List {
        /// Output notes as JSON
        #[arg(long, conflicts_with = "html")]
        json: bool,

        /// Render notes as an HTML page and open it in the browser
        #[arg(long)]
        html: bool,
    },

    /// Create a note, optionally uploading an image first
    Create {
        /// Note name
        #[arg(value_name = "NAME")]
        name: String,

        /// Note description
        #[arg(value_name = "DESCRIPTION")]
        description: String,

        /// Image file to attach
        #[arg(short, long, value_name = "IMAGE")]
        image: Option<PathBuf>,
    },

    /// Delete a note by id
    Delete {
        /// Note ID to delete
        #[arg(value_name = "NOTE_ID")]
        note_id: String,
    },

    /// Upload an image under its file name
    Upload {
        /// Image file to upload
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },

    /// Write a default config file
    Init,

    /// Forget the stored session token
    SignOut,
}
