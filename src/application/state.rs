// src/application/state.rs
//
// Board state as an explicit container. Every change goes through `reduce`,
// so transitions can be exercised without any network collaborator.
use crate::domain::{Draft, Note, NoteId};
use tracing::{debug, trace};

/// Lifetime generation a piece of async work was started under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stamp {
    generation: u64,
}

/// Identifies one list-and-resolve run; only the latest run may land.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    stamp: Stamp,
    seq: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftField {
    Name(String),
    Description(String),
    Image(String),
}

#[derive(Debug, Clone)]
pub enum Action {
    LoadStarted,
    LoadSucceeded { ticket: LoadTicket, notes: Vec<Note> },
    CreateSucceeded { stamp: Stamp, note: Note },
    DeleteRequested { id: NoteId },
    DeleteFailed { stamp: Stamp, note: Note, index: usize },
    DraftChanged(DraftField),
    UploadStarted { key: String },
    UploadFinished { key: String },
    Deactivated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Applied,
    /// Result of work started under an older generation or superseded load
    Stale,
    /// Optimistic removal; carries what is needed to roll back
    Removed { note: Note, index: usize },
    /// Nothing to remove locally
    Absent,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardState {
    notes: Vec<Note>,
    draft: Draft,
    pending_uploads: usize,
    generation: u64,
    load_seq: u64,
}

impl BoardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    /// True while any upload started on this board has not finished
    pub fn upload_pending(&self) -> bool {
        self.pending_uploads > 0
    }

    pub fn pending_uploads(&self) -> usize {
        self.pending_uploads
    }

    pub fn stamp(&self) -> Stamp {
        Stamp {
            generation: self.generation,
        }
    }

    pub fn is_current(&self, stamp: Stamp) -> bool {
        stamp.generation == self.generation
    }

    /// Register a new load and hand out its ticket
    pub fn begin_load(&mut self) -> LoadTicket {
        self.reduce(Action::LoadStarted);
        LoadTicket {
            stamp: self.stamp(),
            seq: self.load_seq,
        }
    }

    pub fn reduce(&mut self, action: Action) -> Transition {
        trace!(?action, "Reducing board action");
        match action {
            Action::LoadStarted => {
                self.load_seq += 1;
                Transition::Applied
            }
            Action::LoadSucceeded { ticket, notes } => {
                if !self.is_current(ticket.stamp) || ticket.seq != self.load_seq {
                    debug!(seq = ticket.seq, latest = self.load_seq, "Dropping stale load result");
                    return Transition::Stale;
                }
                self.notes = notes;
                Transition::Applied
            }
            Action::CreateSucceeded { stamp, note } => {
                if !self.is_current(stamp) {
                    debug!(id = %note.id, "Dropping stale create result");
                    return Transition::Stale;
                }
                self.notes.push(note);
                self.draft = Draft::default();
                Transition::Applied
            }
            Action::DeleteRequested { id } => {
                match self.notes.iter().position(|n| n.id == id) {
                    Some(index) => {
                        let note = self.notes.remove(index);
                        Transition::Removed { note, index }
                    }
                    None => Transition::Absent,
                }
            }
            Action::DeleteFailed { stamp, note, index } => {
                if !self.is_current(stamp) {
                    return Transition::Stale;
                }
                // a reload may already have brought it back
                if self.notes.iter().any(|n| n.id == note.id) {
                    return Transition::Absent;
                }
                let index = index.min(self.notes.len());
                self.notes.insert(index, note);
                Transition::Applied
            }
            Action::DraftChanged(field) => {
                match field {
                    DraftField::Name(name) => self.draft.name = name,
                    DraftField::Description(description) => self.draft.description = description,
                    DraftField::Image(image) => self.draft.image = image,
                }
                Transition::Applied
            }
            Action::UploadStarted { key } => {
                self.draft.image = key;
                self.pending_uploads += 1;
                Transition::Applied
            }
            // counted across generations: the transfer outlives a teardown
            Action::UploadFinished { key } => {
                self.pending_uploads = self.pending_uploads.saturating_sub(1);
                debug!(%key, outstanding = self.pending_uploads, "Upload finished");
                Transition::Applied
            }
            Action::Deactivated => {
                self.generation += 1;
                Transition::Applied
            }
        }
    }
}
