// src/application/note_board.rs
use crate::application::state::{Action, BoardState, DraftField, Transition};
use crate::application::{BlobStore, ImageResolver, NoteService};
use crate::constants::DEFAULT_RESOLVE_CONCURRENCY;
use crate::domain::{DomainError, Draft, ImageRef, Note, NoteId};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, error, info, instrument, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardOptions {
    /// Upper bound on simultaneous image resolutions during a load
    pub resolve_concurrency: usize,
}

impl Default for BoardOptions {
    fn default() -> Self {
        Self {
            resolve_concurrency: DEFAULT_RESOLVE_CONCURRENCY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub total: usize,
    pub unresolved_images: usize,
    /// False when the result arrived after the board moved on
    pub applied: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    Created(Note),
    /// Name or description empty; nothing was sent
    Skipped,
    /// An image upload is still running; nothing was sent
    UploadPending,
    /// Created remotely, but the board was deactivated meanwhile
    Discarded(Note),
}

/// The note board: one stateful view over the note service and blob store.
///
/// All state lives in a [`BoardState`] behind a mutex that is only held for
/// the duration of a single transition, never across a network round trip.
pub struct NoteBoard<S: NoteService, B: BlobStore> {
    service: S,
    blobs: B,
    resolver: ImageResolver,
    state: Mutex<BoardState>,
}

impl<S: NoteService, B: BlobStore> NoteBoard<S, B> {
    pub fn new(service: S, blobs: B, options: BoardOptions) -> Self {
        Self {
            service,
            blobs,
            resolver: ImageResolver::new(options.resolve_concurrency),
            state: Mutex::new(BoardState::new()),
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn blobs(&self) -> &B {
        &self.blobs
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut BoardState) -> T) -> T {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }

    fn dispatch(&self, action: Action) -> Transition {
        self.with_state(|state| state.reduce(action))
    }

    pub fn snapshot(&self) -> BoardState {
        self.with_state(|state| state.clone())
    }

    pub fn notes(&self) -> Vec<Note> {
        self.with_state(|state| state.notes().to_vec())
    }

    pub fn draft(&self) -> Draft {
        self.with_state(|state| state.draft().clone())
    }

    pub fn set_name(&self, name: impl Into<String>) {
        self.dispatch(Action::DraftChanged(DraftField::Name(name.into())));
    }

    pub fn set_description(&self, description: impl Into<String>) {
        self.dispatch(Action::DraftChanged(DraftField::Description(description.into())));
    }

    /// First activation: same as a full reload
    pub async fn activate(&self) -> Result<LoadReport, DomainError> {
        info!("Activating note board");
        self.load().await
    }

    /// Tear down: results of work still in flight will be dropped
    pub fn deactivate(&self) {
        info!("Deactivating note board");
        self.dispatch(Action::Deactivated);
    }

    /// List all notes and resolve their images, then replace the local list.
    ///
    /// A list failure leaves the current list untouched.
    #[instrument(level = "debug", skip(self))]
    pub async fn load(&self) -> Result<LoadReport, DomainError> {
        let ticket = self.with_state(BoardState::begin_load);

        let notes = self.service.list().await.map_err(|e| {
            warn!(error = %e, "Failed to list notes");
            e
        })?;
        let (notes, unresolved_images) = self.resolver.resolve_notes(&self.blobs, notes).await;
        let total = notes.len();

        let applied = self.dispatch(Action::LoadSucceeded { ticket, notes }) == Transition::Applied;
        debug!(total, unresolved_images, applied, "Load finished");
        Ok(LoadReport {
            total,
            unresolved_images,
            applied,
        })
    }

    /// Submit the current draft.
    ///
    /// On failure the draft is kept so the user can simply try again.
    #[instrument(level = "debug", skip(self))]
    pub async fn create(&self) -> Result<CreateOutcome, DomainError> {
        let (draft, stamp, upload_pending) =
            self.with_state(|state| (state.draft().clone(), state.stamp(), state.upload_pending()));

        if !draft.is_submittable() {
            debug!("Draft incomplete, not creating note");
            return Ok(CreateOutcome::Skipped);
        }
        if upload_pending {
            debug!(image = %draft.image, "Upload still pending, not creating note");
            return Ok(CreateOutcome::UploadPending);
        }

        let mut note = match self.service.create(&draft.to_input()).await {
            Ok(note) => note,
            Err(e) => {
                error!(error = %e, "Error creating note");
                return Err(e);
            }
        };

        if let Some(key) = draft.image_key() {
            note.image = Some(match self.blobs.get_url(key).await {
                Ok(url) => ImageRef::Url { url },
                Err(e) => {
                    warn!(%key, error = %e, "Created note but could not resolve its image");
                    ImageRef::Unresolved {
                        key: key.to_string(),
                        reason: e.to_string(),
                    }
                }
            });
        }

        let transition = self.dispatch(Action::CreateSucceeded {
            stamp,
            note: note.clone(),
        });
        if transition == Transition::Stale {
            return Ok(CreateOutcome::Discarded(note));
        }
        info!(id = %note.id, "Created note");
        Ok(CreateOutcome::Created(note))
    }

    /// Remove locally first, then ask the service.
    ///
    /// If the service call fails the note is put back where it was and the
    /// error is returned.
    #[instrument(level = "debug", skip(self))]
    pub async fn delete(&self, id: &NoteId) -> Result<(), DomainError> {
        let (removed, stamp) = self.with_state(|state| {
            let removed = state.reduce(Action::DeleteRequested { id: id.clone() });
            (removed, state.stamp())
        });
        if removed == Transition::Absent {
            debug!(%id, "Note not in local list");
        }

        match self.service.delete(id).await {
            Ok(()) => {
                info!(%id, "Deleted note");
                Ok(())
            }
            Err(e) => {
                warn!(%id, error = %e, "Delete failed, restoring note");
                if let Transition::Removed { note, index } = removed {
                    self.dispatch(Action::DeleteFailed { stamp, note, index });
                }
                Err(e)
            }
        }
    }

    /// Record the file as the draft's image, upload it under its name and
    /// resynchronize the whole board once the upload is done.
    #[instrument(level = "debug", skip(self, bytes), fields(size = bytes.len()))]
    pub async fn select_image(&self, file_name: &str, bytes: Vec<u8>) -> Result<(), DomainError> {
        let stamp = self.with_state(|state| {
            state.reduce(Action::UploadStarted {
                key: file_name.to_string(),
            });
            state.stamp()
        });

        let uploaded = self.blobs.put(file_name, bytes).await;
        self.dispatch(Action::UploadFinished {
            key: file_name.to_string(),
        });
        if let Err(e) = uploaded {
            warn!(key = file_name, error = %e, "Image upload failed");
            return Err(e);
        }
        info!(key = file_name, "Uploaded image");

        if !self.with_state(|state| state.is_current(stamp)) {
            debug!("Board deactivated during upload, skipping reload");
            return Ok(());
        }
        self.load().await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NoteInput;
    use crate::util::testing::{MockBlobStore, MockNoteService};

    fn board(service: MockNoteService, blobs: MockBlobStore) -> NoteBoard<MockNoteService, MockBlobStore> {
        NoteBoard::new(service, blobs, BoardOptions::default())
    }

    #[tokio::test]
    async fn given_empty_name_when_creating_then_sends_nothing() {
        // Arrange
        let board = board(MockNoteService::builder().build(), MockBlobStore::builder().build());
        board.set_description("B");

        // Act
        let outcome = board.create().await.expect("Create should not fail");

        // Assert
        assert_eq!(outcome, CreateOutcome::Skipped);
        assert!(board.service().create_calls().is_empty());
        assert!(board.notes().is_empty());
        assert_eq!(board.draft().description, "B");
    }

    #[tokio::test]
    async fn given_service_failure_when_creating_then_keeps_draft_and_list() {
        // Arrange
        let service = MockNoteService::builder()
            .with_create_failure(DomainError::Service("boom".to_string()))
            .build();
        let board = board(service, MockBlobStore::builder().build());
        board.set_name("A");
        board.set_description("B");

        // Act
        let result = board.create().await;

        // Assert
        assert!(matches!(result, Err(DomainError::Service(_))));
        assert_eq!(board.draft(), Draft::new("A", "B"));
        assert!(board.notes().is_empty());
        assert_eq!(
            board.service().create_calls(),
            vec![NoteInput {
                name: "A".to_string(),
                description: "B".to_string(),
                image: String::new(),
            }]
        );
    }

    #[tokio::test]
    async fn given_list_failure_when_loading_then_keeps_previous_notes() {
        // Arrange
        let service = MockNoteService::builder()
            .with_note(Note::from_wire("1", "A", "a", None))
            .build();
        let board = board(service, MockBlobStore::builder().build());
        board.load().await.expect("First load should succeed");
        board.service().fail_list(DomainError::Transport("offline".to_string()));

        // Act
        let result = board.load().await;

        // Assert
        assert!(matches!(result, Err(DomainError::Transport(_))));
        assert_eq!(board.notes().len(), 1);
    }

    #[tokio::test]
    async fn given_failed_upload_when_selecting_image_then_clears_pending_and_keeps_key() {
        // Arrange
        let blobs = MockBlobStore::builder()
            .with_put_failure(DomainError::Blob("denied".to_string()))
            .build();
        let board = board(MockNoteService::builder().build(), blobs);

        // Act
        let result = board.select_image("cat.png", vec![1, 2, 3]).await;

        // Assert
        assert!(result.is_err());
        let state = board.snapshot();
        assert!(!state.upload_pending());
        assert_eq!(state.draft().image, "cat.png");
        assert_eq!(board.service().list_calls(), 0);
    }
}
