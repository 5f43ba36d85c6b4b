//! Artifact persistence.
//!
//! The engine only talks to storage through `ArtifactStore`. The in-memory
//! implementation backs tests and single-process deployments.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use lessonforge_core::models::{ArtifactStatus, ContentArtifact};
use lessonforge_core::AppError;

/// Storage failures, kept separate from domain errors so callers can attach
/// operation context when mapping them.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Artifact not found")]
    NotFound,

    #[error("Artifact is in status {actual}, transition refused")]
    Conflict { actual: ArtifactStatus },

    #[error("Storage backend error: {0}")]
    Backend(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => AppError::NotFound("Artifact not found".to_string()),
            StoreError::Conflict { actual } => AppError::PreconditionFailed {
                operation: "transition".to_string(),
                required: "a compatible status".to_string(),
                actual: actual.to_string(),
            },
            StoreError::Backend(message) => AppError::Internal(message),
        }
    }
}

#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Store a new artifact.
    async fn insert(&self, artifact: ContentArtifact) -> Result<(), StoreError>;

    /// Fetch an artifact by id.
    async fn get(&self, id: Uuid) -> Result<ContentArtifact, StoreError>;

    /// Overwrite an existing artifact. Fails with `NotFound` when the
    /// artifact no longer exists, which is how an in-flight run learns that
    /// its artifact was deleted.
    async fn save(&self, artifact: ContentArtifact) -> Result<(), StoreError>;

    /// Remove an artifact. Returns whether anything was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;

    /// All artifacts, newest first.
    async fn list(&self) -> Result<Vec<ContentArtifact>, StoreError>;

    /// Atomically move an artifact from one of `allowed_from` to `to` and
    /// return the updated artifact.
    ///
    /// The status check and the write happen under one lock, so of two
    /// concurrent transitions out of the same state only one can succeed;
    /// the loser gets `Conflict` carrying the status it actually found.
    async fn transition_status(
        &self,
        id: Uuid,
        allowed_from: &[ArtifactStatus],
        to: ArtifactStatus,
    ) -> Result<ContentArtifact, StoreError>;
}

/// `ArtifactStore` backed by a `HashMap` behind an async lock.
#[derive(Default)]
pub struct InMemoryArtifactStore {
    artifacts: RwLock<HashMap<Uuid, ContentArtifact>>,
}

impl InMemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ArtifactStore for InMemoryArtifactStore {
    async fn insert(&self, artifact: ContentArtifact) -> Result<(), StoreError> {
        self.artifacts.write().await.insert(artifact.id, artifact);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<ContentArtifact, StoreError> {
        self.artifacts
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn save(&self, artifact: ContentArtifact) -> Result<(), StoreError> {
        let mut artifacts = self.artifacts.write().await;
        match artifacts.get_mut(&artifact.id) {
            Some(slot) => {
                *slot = artifact;
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.artifacts.write().await.remove(&id).is_some())
    }

    async fn list(&self) -> Result<Vec<ContentArtifact>, StoreError> {
        let artifacts = self.artifacts.read().await;
        let mut all: Vec<ContentArtifact> = artifacts.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    async fn transition_status(
        &self,
        id: Uuid,
        allowed_from: &[ArtifactStatus],
        to: ArtifactStatus,
    ) -> Result<ContentArtifact, StoreError> {
        let mut artifacts = self.artifacts.write().await;
        let artifact = artifacts.get_mut(&id).ok_or(StoreError::NotFound)?;

        if !allowed_from.contains(&artifact.status) {
            return Err(StoreError::Conflict {
                actual: artifact.status,
            });
        }

        artifact.status = to;
        artifact.touch();
        Ok(artifact.clone())
    }
}
