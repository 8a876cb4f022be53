use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
};

use async_trait::async_trait;
use shared::domain::{Disease, DiseaseDraft, DiseaseId};
use tokio::sync::oneshot;

use crate::{DiseaseBackend, TransportError};

#[derive(Default)]
struct FakeRows {
    rows: Vec<Disease>,
    next_id: i64,
}

/// In-memory collaborator that lists newest first, like the real server.
#[derive(Default)]
pub(crate) struct FakeBackend {
    rows: Mutex<FakeRows>,
    fail_list: Mutex<Option<TransportError>>,
    fail_mutations: Mutex<Option<TransportError>>,
    held_lists: Mutex<VecDeque<oneshot::Receiver<()>>>,
    pub list_calls: AtomicUsize,
    pub create_calls: AtomicUsize,
    pub update_calls: AtomicUsize,
    pub delete_calls: AtomicUsize,
}

impl FakeBackend {
    pub fn with_rows(rows: Vec<Disease>) -> Self {
        let next_id = rows.iter().map(|row| row.id.0).max().unwrap_or(0);
        let backend = Self::default();
        *backend.rows.lock().expect("rows") = FakeRows { rows, next_id };
        backend
    }

    pub fn rows(&self) -> Vec<Disease> {
        self.rows.lock().expect("rows").rows.clone()
    }

    pub fn set_rows(&self, rows: Vec<Disease>) {
        self.rows.lock().expect("rows").rows = rows;
    }

    pub fn fail_list_with(&self, error: Option<TransportError>) {
        *self.fail_list.lock().expect("fail_list") = error;
    }

    pub fn fail_mutations_with(&self, error: Option<TransportError>) {
        *self.fail_mutations.lock().expect("fail_mutations") = error;
    }

    /// The next list call reads the rows immediately but only answers once
    /// the returned sender fires (or is dropped).
    pub fn hold_next_list(&self) -> oneshot::Sender<()> {
        let (release, held) = oneshot::channel();
        self.held_lists.lock().expect("held_lists").push_back(held);
        release
    }

    pub fn calls(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }

    fn mutation_failure(&self) -> Result<(), TransportError> {
        match self.fail_mutations.lock().expect("fail_mutations").clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

pub(crate) fn disease(id: i64, name: &str, symptoms: &str) -> Disease {
    Disease {
        id: DiseaseId(id),
        name: name.to_string(),
        symptoms: symptoms.to_string(),
    }
}

pub(crate) fn transport_failure() -> TransportError {
    TransportError::Status {
        status: 500,
        message: "database unavailable".into(),
    }
}

#[async_trait]
impl DiseaseBackend for FakeBackend {
    async fn list_diseases(&self) -> Result<Vec<Disease>, TransportError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.fail_list.lock().expect("fail_list").clone() {
            return Err(error);
        }
        let rows = self.rows();
        let held = self.held_lists.lock().expect("held_lists").pop_front();
        if let Some(held) = held {
            let _ = held.await;
        }
        Ok(rows)
    }

    async fn create_disease(&self, draft: &DiseaseDraft) -> Result<(), TransportError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.mutation_failure()?;
        let mut guard = self.rows.lock().expect("rows");
        guard.next_id += 1;
        let id = guard.next_id;
        guard
            .rows
            .insert(0, disease(id, &draft.name, &draft.symptoms));
        Ok(())
    }

    async fn update_disease(
        &self,
        disease_id: DiseaseId,
        draft: &DiseaseDraft,
    ) -> Result<(), TransportError> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        self.mutation_failure()?;
        let mut guard = self.rows.lock().expect("rows");
        let row = guard
            .rows
            .iter_mut()
            .find(|row| row.id == disease_id)
            .ok_or(TransportError::NotFound(disease_id))?;
        *row = disease(disease_id.0, &draft.name, &draft.symptoms);
        Ok(())
    }

    async fn delete_disease(&self, disease_id: DiseaseId) -> Result<(), TransportError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        self.mutation_failure()?;
        let mut guard = self.rows.lock().expect("rows");
        let before = guard.rows.len();
        guard.rows.retain(|row| row.id != disease_id);
        if guard.rows.len() == before {
            return Err(TransportError::NotFound(disease_id));
        }
        Ok(())
    }
}
