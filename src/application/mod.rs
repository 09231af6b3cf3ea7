// src/application/mod.rs
pub mod collaborators;
pub mod image_resolver;
pub mod note_board;
pub mod state;

pub use collaborators::{BlobStore, NoteService};
pub use image_resolver::{ImageResolution, ImageResolver};
pub use note_board::{BoardOptions, CreateOutcome, LoadReport, NoteBoard};
pub use state::{Action, BoardState, DraftField, LoadTicket, Stamp, Transition};
