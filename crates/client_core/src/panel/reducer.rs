//! Pure panel transitions: `(state, intent) -> Transition` and
//! `(state, completion) -> Transition`. Nothing here touches the network or
//! the clock; the controller carries out the returned command and
//! notification.

use shared::domain::{Disease, DiseaseDraft, DiseaseId};
use tracing::debug;

use super::{
    notification::Notification,
    state::{CreateForm, DialogState, EditDraft, PanelState},
};
use crate::error::{ClientError, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelIntent {
    SetFormName(String),
    SetFormSymptoms(String),
    SubmitCreate,
    OpenEdit(Disease),
    SetDraftName(String),
    SetDraftSymptoms(String),
    SubmitEdit,
    OpenDelete(DiseaseId),
    ConfirmDelete,
    CancelDialog,
    DismissNotification,
    Refresh,
}

/// Work the controller hands to the record store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCommand {
    Refresh,
    Create(DiseaseDraft),
    Update(DiseaseId, DiseaseDraft),
    Remove(DiseaseId),
}

/// Outcome of a `StoreCommand`, fed back into the reducer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Refreshed(Result<(), ClientError>),
    Created(Result<(), ClientError>),
    Updated {
        id: DiseaseId,
        result: Result<(), ClientError>,
    },
    Removed {
        id: DiseaseId,
        result: Result<(), ClientError>,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transition {
    pub state: PanelState,
    pub command: Option<StoreCommand>,
    pub notification: Option<Notification>,
    pub dismiss_notification: bool,
}

impl Transition {
    fn unchanged(state: &PanelState) -> Self {
        Self::to(state.clone())
    }

    fn to(state: PanelState) -> Self {
        Self {
            state,
            ..Self::default()
        }
    }

    fn with_command(mut self, command: StoreCommand) -> Self {
        self.command = Some(command);
        self
    }

    fn notify(mut self, notification: Notification) -> Self {
        self.notification = Some(notification);
        self
    }
}

pub fn reduce(state: &PanelState, intent: PanelIntent) -> Transition {
    match intent {
        PanelIntent::SetFormName(name) => {
            let mut next = state.clone();
            next.form.draft.name = name;
            Transition::to(next)
        }
        PanelIntent::SetFormSymptoms(symptoms) => {
            let mut next = state.clone();
            next.form.draft.symptoms = symptoms;
            Transition::to(next)
        }
        PanelIntent::SubmitCreate => submit_create(state),
        PanelIntent::OpenEdit(record) => {
            open_dialog(state, DialogState::editing(EditDraft::from(&record)))
        }
        PanelIntent::OpenDelete(id) => open_dialog(state, DialogState::confirming_delete(id)),
        PanelIntent::SetDraftName(name) => edit_draft(state, |draft| draft.name = name),
        PanelIntent::SetDraftSymptoms(symptoms) => {
            edit_draft(state, |draft| draft.symptoms = symptoms)
        }
        PanelIntent::SubmitEdit => submit_edit(state),
        PanelIntent::ConfirmDelete => confirm_delete(state),
        PanelIntent::CancelDialog => {
            let mut next = state.clone();
            next.dialog = DialogState::None;
            Transition::to(next)
        }
        PanelIntent::DismissNotification => Transition {
            dismiss_notification: true,
            ..Transition::unchanged(state)
        },
        PanelIntent::Refresh => Transition::unchanged(state).with_command(StoreCommand::Refresh),
    }
}

fn submit_create(state: &PanelState) -> Transition {
    if state.form.busy {
        debug!("create submission ignored while previous one is outstanding");
        return Transition::unchanged(state);
    }
    if let Some(field) = state.form.draft.missing_field() {
        return Transition::unchanged(state).notify(validation_warning(ValidationError { field }));
    }
    let mut next = state.clone();
    next.form.busy = true;
    let draft = state.form.draft.trimmed();
    Transition::to(next).with_command(StoreCommand::Create(draft))
}

/// Replacing the dialog value is the implicit cancel of whatever was open.
/// A call still in flight for the replaced dialog completes on its own; its
/// completion only touches a dialog that targets the same id.
fn open_dialog(state: &PanelState, dialog: DialogState) -> Transition {
    let mut next = state.clone();
    next.dialog = dialog;
    Transition::to(next)
}

fn edit_draft(state: &PanelState, apply: impl FnOnce(&mut EditDraft)) -> Transition {
    let mut next = state.clone();
    match &mut next.dialog {
        DialogState::EditingDraft { draft, busy: false } => {
            apply(draft);
            Transition::to(next)
        }
        _ => Transition::unchanged(state),
    }
}

fn submit_edit(state: &PanelState) -> Transition {
    let DialogState::EditingDraft { draft, busy: false } = &state.dialog else {
        return Transition::unchanged(state);
    };
    let pending = draft.draft();
    if let Some(field) = pending.missing_field() {
        return Transition::unchanged(state).notify(validation_warning(ValidationError { field }));
    }
    let id = draft.id;
    let mut next = state.clone();
    next.dialog = DialogState::EditingDraft {
        draft: draft.clone(),
        busy: true,
    };
    Transition::to(next).with_command(StoreCommand::Update(id, pending.trimmed()))
}

fn confirm_delete(state: &PanelState) -> Transition {
    let DialogState::ConfirmingDelete { id, busy: false } = state.dialog else {
        return Transition::unchanged(state);
    };
    let mut next = state.clone();
    next.dialog = DialogState::ConfirmingDelete { id, busy: true };
    Transition::to(next).with_command(StoreCommand::Remove(id))
}

pub fn complete(state: &PanelState, completion: Completion) -> Transition {
    match completion {
        Completion::Refreshed(Ok(())) => Transition::unchanged(state),
        Completion::Refreshed(Err(error)) => Transition::unchanged(state)
            .notify(Notification::error(format!("Could not load diseases: {error}"))),
        Completion::Created(result) => created(state, result),
        Completion::Updated { id, result } => updated(state, id, result),
        Completion::Removed { id, result } => removed(state, id, result),
    }
}

fn created(state: &PanelState, result: Result<(), ClientError>) -> Transition {
    let mut next = state.clone();
    match result {
        Ok(()) => {
            next.form = CreateForm::default();
            Transition::to(next).notify(Notification::success("Disease added successfully!"))
        }
        Err(error) if error.mutation_acknowledged() => {
            next.form = CreateForm::default();
            Transition::to(next)
                .notify(Notification::error(format!("Disease added, but {error}")))
        }
        Err(error) => {
            next.form.busy = false;
            Transition::to(next).notify(failure("Failed to add disease", error))
        }
    }
}

fn updated(state: &PanelState, id: DiseaseId, result: Result<(), ClientError>) -> Transition {
    let mut next = state.clone();
    let owns_dialog = matches!(
        &state.dialog,
        DialogState::EditingDraft { draft, busy: true } if draft.id == id
    );
    match result {
        Ok(()) => {
            if owns_dialog {
                next.dialog = DialogState::None;
            }
            Transition::to(next).notify(Notification::success("Disease updated successfully!"))
        }
        Err(error) if error.mutation_acknowledged() => {
            if owns_dialog {
                next.dialog = DialogState::None;
            }
            Transition::to(next)
                .notify(Notification::error(format!("Disease updated, but {error}")))
        }
        Err(error) => {
            if owns_dialog {
                if let DialogState::EditingDraft { busy, .. } = &mut next.dialog {
                    *busy = false;
                }
            }
            Transition::to(next).notify(failure("Failed to update disease", error))
        }
    }
}

fn removed(state: &PanelState, id: DiseaseId, result: Result<(), ClientError>) -> Transition {
    let mut next = state.clone();
    let owns_dialog = matches!(
        state.dialog,
        DialogState::ConfirmingDelete { id: target, busy: true } if target == id
    );
    match result {
        Ok(()) => {
            if owns_dialog {
                next.dialog = DialogState::None;
            }
            Transition::to(next).notify(Notification::info("Disease deleted successfully!"))
        }
        Err(error) if error.mutation_acknowledged() => {
            if owns_dialog {
                next.dialog = DialogState::None;
            }
            Transition::to(next)
                .notify(Notification::error(format!("Disease deleted, but {error}")))
        }
        Err(error) => {
            if owns_dialog {
                next.dialog = DialogState::ConfirmingDelete { id, busy: false };
            }
            Transition::to(next).notify(failure("Failed to delete disease", error))
        }
    }
}

fn validation_warning(error: ValidationError) -> Notification {
    let mut text = error.to_string();
    if let Some(first) = text.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    Notification::warning(format!("{text}."))
}

fn failure(action: &str, error: ClientError) -> Notification {
    match error {
        ClientError::Validation(error) => validation_warning(error),
        other => Notification::error(format!("{action}: {other}")),
    }
}

#[cfg(test)]
#[path = "tests/reducer_tests.rs"]
mod tests;
