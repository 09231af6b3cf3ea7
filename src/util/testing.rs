// src/util/testing.rs

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::env;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::Notify;
use tracing::{debug, info};
use tracing_subscriber::{
    filter::filter_fn,
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::application::{BlobStore, NoteService};
use crate::domain::{DomainError, Note, NoteId, NoteInput};

fn locked<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-memory note service for exercising the board without a backend
///
/// Records every call so tests can assert on request counts and payloads.
/// Optional gates hold a call open until the test releases it, which makes
/// "before the backend answers" observable.
///
/// # Examples
///
/// ```
/// use noteboard::util::testing::MockNoteService;
/// use noteboard::domain::Note;
///
/// let service = MockNoteService::builder()
///     .with_note(Note::from_wire("1", "Groceries", "milk, eggs", None))
///     .build();
/// assert_eq!(service.list_calls(), 0);
/// ```
pub struct MockNoteService {
    notes: Mutex<Vec<Note>>,
    next_id: AtomicU64,
    list_failure: Mutex<Option<DomainError>>,
    create_failure: Option<DomainError>,
    delete_failure: Option<DomainError>,
    list_gate: Option<Arc<Notify>>,
    delete_gate: Option<Arc<Notify>>,
    list_calls: AtomicUsize,
    create_calls: Mutex<Vec<NoteInput>>,
    delete_calls: Mutex<Vec<NoteId>>,
}

impl MockNoteService {
    pub fn builder() -> MockNoteServiceBuilder {
        MockNoteServiceBuilder::new()
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn create_calls(&self) -> Vec<NoteInput> {
        locked(&self.create_calls).clone()
    }

    pub fn delete_calls(&self) -> Vec<NoteId> {
        locked(&self.delete_calls).clone()
    }

    /// Records currently held by the "backend"
    pub fn stored_notes(&self) -> Vec<Note> {
        locked(&self.notes).clone()
    }

    /// Make subsequent list calls fail
    pub fn fail_list(&self, error: DomainError) {
        *locked(&self.list_failure) = Some(error);
    }
}

#[async_trait]
impl NoteService for MockNoteService {
    async fn list(&self) -> Result<Vec<Note>, DomainError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.list_gate {
            gate.notified().await;
        }
        if let Some(error) = locked(&self.list_failure).clone() {
            return Err(error);
        }
        Ok(self.stored_notes())
    }

    async fn create(&self, input: &NoteInput) -> Result<Note, DomainError> {
        locked(&self.create_calls).push(input.clone());
        if let Some(error) = &self.create_failure {
            return Err(error.clone());
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst).to_string();
        let note = Note::from_wire(
            id,
            input.name.clone(),
            input.description.clone(),
            Some(input.image.clone()),
        );
        locked(&self.notes).push(note.clone());
        Ok(note)
    }

    async fn delete(&self, id: &NoteId) -> Result<(), DomainError> {
        locked(&self.delete_calls).push(id.clone());
        if let Some(gate) = &self.delete_gate {
            gate.notified().await;
        }
        if let Some(error) = &self.delete_failure {
            return Err(error.clone());
        }
        locked(&self.notes).retain(|n| &n.id != id);
        Ok(())
    }
}

/// Builder for MockNoteService
pub struct MockNoteServiceBuilder {
    notes: Vec<Note>,
    first_id: u64,
    create_failure: Option<DomainError>,
    delete_failure: Option<DomainError>,
    list_gate: Option<Arc<Notify>>,
    delete_gate: Option<Arc<Notify>>,
}

impl MockNoteServiceBuilder {
    pub fn new() -> Self {
        Self {
            notes: vec![],
            first_id: 1,
            create_failure: None,
            delete_failure: None,
            list_gate: None,
            delete_gate: None,
        }
    }

    /// Add a record returned by list
    pub fn with_note(mut self, note: Note) -> Self {
        self.notes.push(note);
        self
    }

    /// First id handed out by create; later creates count up from it
    pub fn with_first_id(mut self, id: u64) -> Self {
        self.first_id = id;
        self
    }

    pub fn with_create_failure(mut self, error: DomainError) -> Self {
        self.create_failure = Some(error);
        self
    }

    pub fn with_delete_failure(mut self, error: DomainError) -> Self {
        self.delete_failure = Some(error);
        self
    }

    /// Hold every list call until the gate is notified
    pub fn with_list_gate(mut self, gate: Arc<Notify>) -> Self {
        self.list_gate = Some(gate);
        self
    }

    /// Hold every delete call until the gate is notified
    pub fn with_delete_gate(mut self, gate: Arc<Notify>) -> Self {
        self.delete_gate = Some(gate);
        self
    }

    pub fn build(self) -> MockNoteService {
        MockNoteService {
            notes: Mutex::new(self.notes),
            next_id: AtomicU64::new(self.first_id),
            list_failure: Mutex::new(None),
            create_failure: self.create_failure,
            delete_failure: self.delete_failure,
            list_gate: self.list_gate,
            delete_gate: self.delete_gate,
            list_calls: AtomicUsize::new(0),
            create_calls: Mutex::new(vec![]),
            delete_calls: Mutex::new(vec![]),
        }
    }
}

impl Default for MockNoteServiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// In-memory blob store; URLs look like `mock://blobs/<key>`
pub struct MockBlobStore {
    objects: Mutex<HashMap<String, Vec<u8>>>,
    put_failure: Option<DomainError>,
    put_gate: Option<Arc<Notify>>,
    put_calls: Mutex<Vec<String>>,
    get_url_calls: Mutex<Vec<String>>,
}

impl MockBlobStore {
    pub fn builder() -> MockBlobStoreBuilder {
        MockBlobStoreBuilder::new()
    }

    pub fn put_calls(&self) -> Vec<String> {
        locked(&self.put_calls).clone()
    }

    pub fn get_url_calls(&self) -> Vec<String> {
        locked(&self.get_url_calls).clone()
    }

    pub fn object(&self, key: &str) -> Option<Vec<u8>> {
        locked(&self.objects).get(key).cloned()
    }
}

#[async_trait]
impl BlobStore for MockBlobStore {
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<(), DomainError> {
        locked(&self.put_calls).push(key.to_string());
        if let Some(gate) = &self.put_gate {
            gate.notified().await;
        }
        if let Some(error) = &self.put_failure {
            return Err(error.clone());
        }
        locked(&self.objects).insert(key.to_string(), bytes);
        Ok(())
    }

    async fn get_url(&self, key: &str) -> Result<String, DomainError> {
        locked(&self.get_url_calls).push(key.to_string());
        if locked(&self.objects).contains_key(key) {
            Ok(format!("mock://blobs/{key}"))
        } else {
            Err(DomainError::BlobNotFound(key.to_string()))
        }
    }
}

/// Builder for MockBlobStore
pub struct MockBlobStoreBuilder {
    objects: HashMap<String, Vec<u8>>,
    put_failure: Option<DomainError>,
    put_gate: Option<Arc<Notify>>,
}

impl MockBlobStoreBuilder {
    pub fn new() -> Self {
        Self {
            objects: HashMap::new(),
            put_failure: None,
            put_gate: None,
        }
    }

    /// Pretend an object already exists under `key`
    pub fn with_object(mut self, key: &str) -> Self {
        self.objects.insert(key.to_string(), vec![]);
        self
    }

    pub fn with_put_failure(mut self, error: DomainError) -> Self {
        self.put_failure = Some(error);
        self
    }

    /// Hold every upload until the gate is notified
    pub fn with_put_gate(mut self, gate: Arc<Notify>) -> Self {
        self.put_gate = Some(gate);
        self
    }

    pub fn build(self) -> MockBlobStore {
        MockBlobStore {
            objects: Mutex::new(self.objects),
            put_failure: self.put_failure,
            put_gate: self.put_gate,
            put_calls: Mutex::new(vec![]),
            get_url_calls: Mutex::new(vec![]),
        }
    }
}

impl Default for MockBlobStoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn init_test_setup() -> Result<()> {
    // Set up logging first
    setup_test_logging();

    info!("Test Setup complete");
    Ok(())
}

fn setup_test_logging() {
    debug!("INIT: Attempting logger init from testing.rs");
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "trace");
    }

    // Create a filter for noisy modules
    let noisy_modules = ["hyper", "reqwest", "rustls", "mio", "axum"];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(module_filter)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}
