// src/application/image_resolver.rs
use crate::application::BlobStore;
use crate::constants::DEFAULT_RESOLVE_CONCURRENCY;
use crate::domain::{DomainError, ImageRef, Note};
use futures::stream::{self, StreamExt};
use tracing::{debug, instrument, warn};

/// Outcome of resolving one note's image key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageResolution {
    /// Position of the note in the batch
    pub index: usize,
    pub key: String,
    pub result: Result<String, DomainError>,
}

/// Resolves blob keys to URLs with a cap on in-flight requests.
#[derive(Debug, Clone, Copy)]
pub struct ImageResolver {
    concurrency: usize,
}

impl ImageResolver {
    pub fn new(concurrency: usize) -> Self {
        Self {
            concurrency: concurrency.max(1),
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Resolve every note that carries an unresolved key.
    ///
    /// Completion order is unspecified. Each item succeeds or fails on its
    /// own; one missing blob never fails the batch.
    #[instrument(level = "debug", skip_all, fields(notes = notes.len()))]
    pub async fn resolve<B>(&self, blobs: &B, notes: &[Note]) -> Vec<ImageResolution>
    where
        B: BlobStore + ?Sized,
    {
        let jobs: Vec<(usize, String)> = notes
            .iter()
            .enumerate()
            .filter_map(|(index, note)| note.pending_image_key().map(|key| (index, key.to_string())))
            .collect();
        debug!(jobs = jobs.len(), concurrency = self.concurrency, "Resolving image keys");

        stream::iter(jobs)
            .map(|(index, key)| async move {
                let result = blobs.get_url(&key).await;
                ImageResolution { index, key, result }
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await
    }

    /// Resolve and write the outcomes back into the notes
    pub async fn resolve_notes<B>(&self, blobs: &B, mut notes: Vec<Note>) -> (Vec<Note>, usize)
    where
        B: BlobStore + ?Sized,
    {
        let resolutions = self.resolve(blobs, &notes).await;
        let mut failed = 0;
        for ImageResolution { index, key, result } in resolutions {
            notes[index].image = Some(match result {
                Ok(url) => ImageRef::Url { url },
                Err(e) => {
                    failed += 1;
                    warn!(%key, error = %e, "Could not resolve image");
                    ImageRef::Unresolved {
                        key,
                        reason: e.to_string(),
                    }
                }
            });
        }
        (notes, failed)
    }
}

impl Default for ImageResolver {
    fn default() -> Self {
        Self::new(DEFAULT_RESOLVE_CONCURRENCY)
    }
}
