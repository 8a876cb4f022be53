//! Panel controller: form/dialog state, store dispatch and notifications.

pub mod notification;
pub mod reducer;
pub mod state;

use std::{sync::Arc, time::Duration};

use shared::domain::Disease;
use tokio::sync::mpsc;
use tracing::debug;

use crate::record_store::{LoadStatus, RecordStore};
use notification::{Notification, Notifier};
use reducer::{complete, reduce, Completion, PanelIntent, StoreCommand, Transition};
use state::{CreateForm, DialogState, PanelState};

pub const DEFAULT_NOTIFICATION_LIFETIME: Duration = Duration::from_secs(3);

#[derive(Debug, Clone)]
pub struct PanelConfig {
    pub notification_lifetime: Duration,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            notification_lifetime: DEFAULT_NOTIFICATION_LIFETIME,
        }
    }
}

/// Everything the rendering layer reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelView {
    pub records: Vec<Disease>,
    pub status: LoadStatus,
    pub form: CreateForm,
    pub dialog: DialogState,
    pub notification: Option<Notification>,
}

/// Drives the record store from user intents.
///
/// `dispatch` applies the transition synchronously and spawns any store call
/// on the current tokio runtime; the outcome comes back as a [`Completion`]
/// which must be fed to [`PanelController::apply_completion`] (or drained with
/// [`PanelController::settle`]).
pub struct PanelController {
    store: Arc<RecordStore>,
    state: PanelState,
    notifier: Notifier,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions_rx: mpsc::UnboundedReceiver<Completion>,
    in_flight: usize,
}

impl PanelController {
    pub fn new(store: Arc<RecordStore>, config: PanelConfig) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Self {
            store,
            state: PanelState::default(),
            notifier: Notifier::new(config.notification_lifetime),
            completions_tx,
            completions_rx,
            in_flight: 0,
        }
    }

    pub fn state(&self) -> &PanelState {
        &self.state
    }

    pub fn notification(&self) -> Option<Notification> {
        self.notifier.current()
    }

    /// Number of store calls whose completion has not been applied yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub async fn view(&self) -> PanelView {
        let snapshot = self.store.snapshot().await;
        PanelView {
            records: snapshot.records,
            status: snapshot.status,
            form: self.state.form.clone(),
            dialog: self.state.dialog.clone(),
            notification: self.notifier.current(),
        }
    }

    pub fn dispatch(&mut self, intent: PanelIntent) {
        let transition = reduce(&self.state, intent);
        self.apply(transition);
    }

    pub fn apply_completion(&mut self, completion: Completion) {
        self.in_flight = self.in_flight.saturating_sub(1);
        let transition = complete(&self.state, completion);
        self.apply(transition);
    }

    /// Waits for the next outstanding store call; `None` when nothing is in flight.
    pub async fn next_completion(&mut self) -> Option<Completion> {
        if self.in_flight == 0 {
            return None;
        }
        self.completions_rx.recv().await
    }

    /// Applies completions until no store call is outstanding.
    pub async fn settle(&mut self) {
        while let Some(completion) = self.next_completion().await {
            self.apply_completion(completion);
        }
    }

    fn apply(&mut self, transition: Transition) {
        let Transition {
            state,
            command,
            notification,
            dismiss_notification,
        } = transition;
        self.state = state;
        if dismiss_notification {
            self.notifier.dismiss();
        }
        if let Some(notification) = notification {
            self.notifier.post(notification);
        }
        if let Some(command) = command {
            self.spawn_command(command);
        }
    }

    fn spawn_command(&mut self, command: StoreCommand) {
        debug!(?command, "dispatching store command");
        self.in_flight += 1;
        let store = Arc::clone(&self.store);
        let completions = self.completions_tx.clone();
        tokio::spawn(async move {
            let completion = run_command(&store, command).await;
            let _ = completions.send(completion);
        });
    }
}

async fn run_command(store: &RecordStore, command: StoreCommand) -> Completion {
    match command {
        StoreCommand::Refresh => Completion::Refreshed(store.refresh().await),
        StoreCommand::Create(draft) => Completion::Created(store.create(&draft).await),
        StoreCommand::Update(id, draft) => Completion::Updated {
            id,
            result: store.update(id, &draft).await,
        },
        StoreCommand::Remove(id) => Completion::Removed {
            id,
            result: store.remove(id).await,
        },
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
