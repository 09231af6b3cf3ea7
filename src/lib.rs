// src/lib.rs
pub mod application;
pub mod cli;
pub mod constants;
pub mod domain;
pub mod infrastructure;
pub mod ports;
pub mod util;

use std::path::{Path, PathBuf};
use anyhow::{bail, Context, Result};
use application::{BoardOptions, CreateOutcome, NoteBoard};
use domain::NoteId;
use infrastructure::{Config, GraphQlNoteService, HttpBlobStore, Session};
use ports::{HtmlPresenter, TextPresenter};
use tracing::{debug, info, warn};
use crate::cli::args::{Args, Command};

type Board = NoteBoard<GraphQlNoteService, HttpBlobStore>;

pub fn run(args: Args) -> Result<()> {
    debug!(?args, "Starting noteboard with arguments");

    let config_path = match args.config {
        Some(path) => {
            debug!(?path, "Using provided config path");
            path
        }
        None => Config::default_path()?,
    };

    let command = match args.command {
        Command::Init => return init_config(&config_path),
        Command::SignOut => return Session::sign_out(&config_path),
        Command::List { json, html } => BoardCommand::List { json, html },
        Command::Create {
            name,
            description,
            image,
        } => BoardCommand::Create {
            name,
            description,
            image,
        },
        Command::Delete { note_id } => BoardCommand::Delete { id: NoteId::new(note_id) },
        Command::Upload { path } => BoardCommand::Upload { path },
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    runtime.block_on(run_board(&config_path, command))
}

/// Subcommands that need a loaded board
#[derive(Debug)]
enum BoardCommand {
    List { json: bool, html: bool },
    Create {
        name: String,
        description: String,
        image: Option<PathBuf>,
    },
    Delete { id: NoteId },
    Upload { path: PathBuf },
}

fn init_config(path: &Path) -> Result<()> {
    if path.exists() {
        bail!("Config file already exists: {}", path.display());
    }
    Config::create_default(path)?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}

fn open_board(config_path: &Path) -> Result<Board> {
    let config = Config::load(config_path)
        .context("No usable config; run `noteboard init` and fill in the endpoints")?;
    let session = Session::from_config(&config)?;

    let service = GraphQlNoteService::new(&config, session.clone())?;
    let blobs = HttpBlobStore::new(&config, session)?;
    let options = BoardOptions {
        resolve_concurrency: config.board.resolve_concurrency,
    };
    Ok(NoteBoard::new(service, blobs, options))
}

async fn run_board(config_path: &Path, command: BoardCommand) -> Result<()> {
    let board = open_board(config_path)?;
    let report = board.activate().await?;
    debug!(?report, "Board activated");

    let result = execute(&board, command).await;
    board.deactivate();
    result
}

async fn execute(board: &Board, command: BoardCommand) -> Result<()> {
    match command {
        BoardCommand::List { json, html } => {
            let notes = board.notes();
            if json {
                println!("{}", serde_json::to_string_pretty(&notes)?);
            } else if html {
                let page = HtmlPresenter::new().render(&notes);
                let mut renderer = infrastructure::renderer::BrowserRenderer::new();
                let path = renderer.create_temp_file(&page)?;
                renderer.open_in_browser(&path)?;
            } else {
                println!("{}", TextPresenter::new().render(&notes));
            }
        }
        BoardCommand::Create {
            name,
            description,
            image,
        } => {
            board.set_name(name);
            board.set_description(description);
            if let Some(path) = image {
                select_image(board, &path).await?;
            }
            match board.create().await? {
                CreateOutcome::Created(note) => {
                    info!(id = %note.id, "Note created");
                    println!("{}", note.id);
                }
                CreateOutcome::Skipped => warn!("Name and description are required"),
                CreateOutcome::UploadPending => bail!("Image upload still in progress"),
                CreateOutcome::Discarded(note) => {
                    warn!(id = %note.id, "Note created after board was closed")
                }
            }
        }
        BoardCommand::Delete { id } => {
            board.delete(&id).await?;
            println!("Deleted note {id}");
        }
        BoardCommand::Upload { path } => {
            let key = select_image(board, &path).await?;
            println!("Uploaded {key}");
        }
    }
    Ok(())
}

/// Upload a local file under its file name; returns the blob key
async fn select_image(board: &Board, path: &Path) -> Result<String> {
    let key = path
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("Image path has no file name: {}", path.display()))?
        .to_string();
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read image {}", path.display()))?;

    board.select_image(&key, bytes).await?;
    Ok(key)
}

#[cfg(test)]
mod tests {
    use crate::util::testing;
    #[ctor::ctor]
    fn init() {
        testing::init_test_setup().expect("Failed to initialize test setup");
    }
}
