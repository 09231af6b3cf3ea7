// src/domain/note.rs
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier assigned by the note service on creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(pub String);

impl NoteId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NoteId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// In-memory view of a note's image.
///
/// The wire format only knows a blob key; after resolution the key is
/// replaced by a fetchable URL. A failed resolution keeps the key around
/// together with the reason so the note still renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ImageRef {
    Key { key: String },
    Url { url: String },
    Unresolved { key: String, reason: String },
}

impl ImageRef {
    /// Blob key for unresolved references, `None` once resolved to a URL
    pub fn key(&self) -> Option<&str> {
        match self {
            ImageRef::Key { key } | ImageRef::Unresolved { key, .. } => Some(key),
            ImageRef::Url { .. } => None,
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            ImageRef::Url { url } => Some(url),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Note {
    pub id: NoteId,
    pub name: String,
    pub description: String,
    pub image: Option<ImageRef>,
}

impl Note {
    /// Build a note as returned by the service, with the image as a raw blob key.
    ///
    /// An empty image string counts as "no image".
    pub fn from_wire(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        image: Option<String>,
    ) -> Self {
        Self {
            id: NoteId(id.into()),
            name: name.into(),
            description: description.into(),
            image: image
                .filter(|key| !key.is_empty())
                .map(|key| ImageRef::Key { key }),
        }
    }

    /// Blob key that still needs resolving, if any
    pub fn pending_image_key(&self) -> Option<&str> {
        match &self.image {
            Some(ImageRef::Key { key }) => Some(key),
            _ => None,
        }
    }
}

/// Payload of a create request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteInput {
    pub name: String,
    pub description: String,
    pub image: String,
}

/// Unsaved form state for the note being composed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Draft {
    pub name: String,
    pub description: String,
    pub image: String,
}

impl Draft {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            image: String::new(),
        }
    }

    /// Name and description are the only required fields
    pub fn is_submittable(&self) -> bool {
        !self.name.is_empty() && !self.description.is_empty()
    }

    pub fn image_key(&self) -> Option<&str> {
        (!self.image.is_empty()).then_some(self.image.as_str())
    }

    pub fn to_input(&self) -> NoteInput {
        NoteInput {
            name: self.name.clone(),
            description: self.description.clone(),
            image: self.image.clone(),
        }
    }
}
