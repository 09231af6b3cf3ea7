// src/infrastructure/graphql.rs
use crate::application::NoteService;
use crate::domain::{DomainError, Note, NoteId, NoteInput};
use crate::infrastructure::config::Config;
use crate::infrastructure::{build_http_client, Session};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

const LIST_NOTES: &str = "query ListNotes {
  listNotes {
    items { id name description image }
  }
}";

const CREATE_NOTE: &str = "mutation CreateNote($input: CreateNoteInput!) {
  createNote(input: $input) { id name description image }
}";

const DELETE_NOTE: &str = "mutation DeleteNote($input: DeleteNoteInput!) {
  deleteNote(input: $input) { id }
}";

/// Note service backed by a GraphQL endpoint.
pub struct GraphQlNoteService {
    http: reqwest::Client,
    endpoint: String,
    session: Session,
}

impl GraphQlNoteService {
    pub fn new(config: &Config, session: Session) -> Result<Self, DomainError> {
        let endpoint = config.api.endpoint.trim().to_string();
        if endpoint.is_empty() {
            return Err(DomainError::Config("api.endpoint is not set".to_string()));
        }
        let http = build_http_client(&config.http)?;
        Ok(Self {
            http,
            endpoint,
            session,
        })
    }

    async fn execute<V, T>(&self, operation: &str, query: &str, variables: V) -> Result<T, DomainError>
    where
        V: Serialize + Send,
        T: DeserializeOwned,
    {
        let body = GraphQlRequest { query, variables };
        let response = self
            .session
            .authorize(self.http.post(&self.endpoint))
            .json(&body)
            .send()
            .await
            .map_err(|e| DomainError::Transport(format!("{operation}: {e}")))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| DomainError::Transport(format!("{operation}: {e}")))?;
        debug!(operation, status = status.as_u16(), "GraphQL response");

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(DomainError::NotAuthenticated);
        }
        if !status.is_success() {
            return Err(DomainError::Service(format!(
                "{operation}: HTTP {}: {text}",
                status.as_u16()
            )));
        }
        parse_response(operation, &text)
    }
}

#[async_trait]
impl NoteService for GraphQlNoteService {
    #[instrument(level = "debug", skip(self))]
    async fn list(&self) -> Result<Vec<Note>, DomainError> {
        let data: ListNotesData = self
            .execute("listNotes", LIST_NOTES, serde_json::json!({}))
            .await?;
        Ok(data
            .list_notes
            .map(|connection| connection.items.into_iter().flatten().map(Note::from).collect())
            .unwrap_or_default())
    }

    #[instrument(level = "debug", skip(self))]
    async fn create(&self, input: &NoteInput) -> Result<Note, DomainError> {
        let data: CreateNoteData = self
            .execute("createNote", CREATE_NOTE, InputVariables { input })
            .await?;
        data.create_note
            .map(Note::from)
            .ok_or_else(|| DomainError::Service("createNote: no record returned".to_string()))
    }

    #[instrument(level = "debug", skip(self))]
    async fn delete(&self, id: &NoteId) -> Result<(), DomainError> {
        let input = DeleteNoteInput { id: id.as_str() };
        let _: DeleteNoteData = self
            .execute("deleteNote", DELETE_NOTE, InputVariables { input: &input })
            .await?;
        Ok(())
    }
}

/// Decode a GraphQL response body, turning `errors` into a service error
pub fn parse_response<T: DeserializeOwned>(operation: &str, text: &str) -> Result<T, DomainError> {
    let response: GraphQlResponse<T> = serde_json::from_str(text)
        .map_err(|e| DomainError::Service(format!("{operation}: invalid response: {e}")))?;

    if !response.errors.is_empty() {
        let messages: Vec<_> = response.errors.into_iter().map(|e| e.message).collect();
        return Err(DomainError::Service(format!(
            "{operation}: {}",
            messages.join("; ")
        )));
    }
    response
        .data
        .ok_or_else(|| DomainError::Service(format!("{operation}: response has no data")))
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Serialize)]
struct GraphQlRequest<'a, V> {
    query: &'a str,
    variables: V,
}

#[derive(Serialize)]
struct InputVariables<'a, I> {
    input: &'a I,
}

#[derive(Serialize, Debug)]
struct DeleteNoteInput<'a> {
    id: &'a str,
}

#[derive(Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Deserialize, Debug)]
pub struct WireNote {
    id: String,
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    image: Option<String>,
}

impl From<WireNote> for Note {
    fn from(wire: WireNote) -> Self {
        Note::from_wire(wire.id, wire.name, wire.description.unwrap_or_default(), wire.image)
    }
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ListNotesData {
    list_notes: Option<NoteConnection>,
}

#[derive(Deserialize, Debug)]
struct NoteConnection {
    // list resolvers may return null entries
    #[serde(default)]
    items: Vec<Option<WireNote>>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateNoteData {
    create_note: Option<WireNote>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct DeleteNoteData {
    #[allow(dead_code)]
    delete_note: Option<serde_json::Value>,
}
