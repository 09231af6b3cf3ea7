use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{post, put};
use axum::{Json, Router};
use noteboard::infrastructure::config::{AuthMode, Config};
use noteboard::infrastructure::Session;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

pub const TOKEN: &str = "test-token";

/// Records held by the fake backend
#[derive(Default)]
pub struct BackendState {
    pub notes: Mutex<Vec<Value>>,
    pub blobs: Mutex<HashMap<String, Vec<u8>>>,
    pub authorization: Mutex<Vec<String>>,
    next_id: AtomicU64,
}

/// In-process GraphQL endpoint plus object store, bound to a random local port
#[allow(dead_code)]
pub struct FakeBackend {
    pub base_url: String,
    pub state: Arc<BackendState>,
}

impl FakeBackend {
    pub async fn start() -> anyhow::Result<Self> {
        let state = Arc::new(BackendState::default());
        let app = Router::new()
            .route("/graphql", post(graphql))
            .route("/bucket/public/{key}", put(put_blob).head(head_blob))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            base_url: format!("http://{addr}"),
            state,
        })
    }

    pub fn seed_note(&self, id: &str, name: &str, image: Option<&str>) {
        self.state.notes.lock().unwrap().push(json!({
            "id": id,
            "name": name,
            "description": format!("about {name}"),
            "image": image,
        }));
    }

    pub fn seed_blob(&self, key: &str, bytes: &[u8]) {
        self.state
            .blobs
            .lock()
            .unwrap()
            .insert(key.to_string(), bytes.to_vec());
    }

    /// Config pointing at this backend with a bearer token
    pub fn config(&self) -> Config {
        let mut config = Config::default();
        config.api.endpoint = format!("{}/graphql", self.base_url);
        config.storage.endpoint = format!("{}/bucket", self.base_url);
        config.auth.mode = AuthMode::Bearer;
        config.auth.token = TOKEN.to_string();
        config.http.request_timeout_secs = 5;
        config
    }

    pub fn session(&self) -> Session {
        Session::resolve(&self.config(), None).expect("Test config carries a token")
    }
}

/// Writes a config file into a temporary directory
#[allow(dead_code)]
pub struct TestConfig {
    _temp_dir: TempDir,
    pub path: std::path::PathBuf,
}

#[allow(dead_code)]
impl TestConfig {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let temp_dir = tempfile::tempdir()?;
        let path = temp_dir.path().join("config.toml");
        config.save(&path)?;
        Ok(Self {
            _temp_dir: temp_dir,
            path,
        })
    }
}

async fn graphql(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    state.authorization.lock().unwrap().push(auth.clone());
    if auth != format!("Bearer {TOKEN}") {
        return (StatusCode::UNAUTHORIZED, Json(json!({"errors": [{"message": "Unauthorized"}]})));
    }

    let query = body["query"].as_str().unwrap_or_default();
    let input = &body["variables"]["input"];
    let response = if query.contains("listNotes") {
        let items = state.notes.lock().unwrap().clone();
        json!({"data": {"listNotes": {"items": items}}})
    } else if query.contains("createNote") {
        let id = (state.next_id.fetch_add(1, Ordering::SeqCst) + 100).to_string();
        let note = json!({
            "id": id,
            "name": input["name"],
            "description": input["description"],
            "image": input["image"],
        });
        state.notes.lock().unwrap().push(note.clone());
        json!({"data": {"createNote": note}})
    } else if query.contains("deleteNote") {
        let id = input["id"].clone();
        state.notes.lock().unwrap().retain(|n| n["id"] != id);
        json!({"data": {"deleteNote": {"id": id}}})
    } else {
        json!({"data": null, "errors": [{"message": "Unknown operation"}]})
    };
    (StatusCode::OK, Json(response))
}

async fn put_blob(
    State(state): State<Arc<BackendState>>,
    Path(key): Path<String>,
    body: Bytes,
) -> StatusCode {
    state.blobs.lock().unwrap().insert(key, body.to_vec());
    StatusCode::OK
}

async fn head_blob(State(state): State<Arc<BackendState>>, Path(key): Path<String>) -> StatusCode {
    if state.blobs.lock().unwrap().contains_key(&key) {
        StatusCode::OK
    } else {
        StatusCode::NOT_FOUND
    }
}
