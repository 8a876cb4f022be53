//! Local mirror of the remote disease collection.
//!
//! The collection is only ever replaced wholesale by a completed refresh.
//! Mutations are forwarded to the backend and, once acknowledged, followed by
//! a refresh in the same awaited call, so callers observe either a fully
//! re-synchronized collection or the untouched previous one.

use std::{collections::HashSet, sync::Arc};

use shared::domain::{Disease, DiseaseDraft, DiseaseId};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::{
    error::{ClientError, TransportError, ValidationError},
    DiseaseBackend,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreSnapshot {
    pub records: Vec<Disease>,
    pub status: LoadStatus,
}

pub struct RecordStore {
    backend: Arc<dyn DiseaseBackend>,
    state: RwLock<StoreSnapshot>,
}

impl RecordStore {
    pub fn new(backend: Arc<dyn DiseaseBackend>) -> Self {
        Self {
            backend,
            state: RwLock::new(StoreSnapshot::default()),
        }
    }

    pub async fn snapshot(&self) -> StoreSnapshot {
        self.state.read().await.clone()
    }

    pub async fn records(&self) -> Vec<Disease> {
        self.state.read().await.records.clone()
    }

    pub async fn status(&self) -> LoadStatus {
        self.state.read().await.status.clone()
    }

    /// Replaces the collection with the backend's current list. On failure
    /// the previous collection stays available and the status turns `Failed`.
    pub async fn refresh(&self) -> Result<(), ClientError> {
        self.state.write().await.status = LoadStatus::Loading;

        let fetched = self
            .backend
            .list_diseases()
            .await
            .and_then(ensure_unique_ids);

        let mut guard = self.state.write().await;
        match fetched {
            Ok(records) => {
                info!(count = records.len(), "disease list refreshed");
                guard.records = records;
                guard.status = LoadStatus::Ready;
                Ok(())
            }
            Err(error) => {
                warn!(%error, "disease list refresh failed; keeping previous list");
                guard.status = LoadStatus::Failed(error.to_string());
                Err(error.into())
            }
        }
    }

    pub async fn create(&self, draft: &DiseaseDraft) -> Result<(), ClientError> {
        let draft = validated(draft)?;
        self.backend.create_disease(&draft).await.map_err(|error| {
            warn!(%error, "create disease failed");
            ClientError::from(error)
        })?;
        info!(name = %draft.name, "disease created");
        self.resync().await
    }

    pub async fn update(
        &self,
        disease_id: DiseaseId,
        draft: &DiseaseDraft,
    ) -> Result<(), ClientError> {
        let draft = validated(draft)?;
        self.backend
            .update_disease(disease_id, &draft)
            .await
            .map_err(|error| {
                warn!(disease_id = disease_id.0, %error, "update disease failed");
                ClientError::from(error)
            })?;
        info!(disease_id = disease_id.0, "disease updated");
        self.resync().await
    }

    pub async fn remove(&self, disease_id: DiseaseId) -> Result<(), ClientError> {
        self.backend
            .delete_disease(disease_id)
            .await
            .map_err(|error| {
                warn!(disease_id = disease_id.0, %error, "delete disease failed");
                ClientError::from(error)
            })?;
        info!(disease_id = disease_id.0, "disease deleted");
        self.resync().await
    }

    async fn resync(&self) -> Result<(), ClientError> {
        match self.refresh().await {
            Err(ClientError::Transport(error)) => Err(ClientError::Resync(error)),
            other => other,
        }
    }
}

fn validated(draft: &DiseaseDraft) -> Result<DiseaseDraft, ValidationError> {
    match draft.missing_field() {
        Some(field) => Err(ValidationError { field }),
        None => Ok(draft.trimmed()),
    }
}

fn ensure_unique_ids(records: Vec<Disease>) -> Result<Vec<Disease>, TransportError> {
    let mut seen = HashSet::with_capacity(records.len());
    if let Some(duplicate) = records.iter().find(|record| !seen.insert(record.id)) {
        return Err(TransportError::Malformed(format!(
            "disease id {} listed more than once",
            duplicate.id
        )));
    }
    Ok(records)
}

#[cfg(test)]
#[path = "tests/record_store_tests.rs"]
mod tests;
