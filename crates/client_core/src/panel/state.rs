//! Transient panel state that never reaches the backend.

use shared::domain::{Disease, DiseaseDraft, DiseaseId};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateForm {
    pub draft: DiseaseDraft,
    /// Set while a create call is outstanding; re-submission is ignored.
    pub busy: bool,
}

/// Working copy of a record inside the edit dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDraft {
    pub id: DiseaseId,
    pub name: String,
    pub symptoms: String,
}

impl EditDraft {
    pub fn draft(&self) -> DiseaseDraft {
        DiseaseDraft::new(self.name.clone(), self.symptoms.clone())
    }
}

impl From<&Disease> for EditDraft {
    fn from(value: &Disease) -> Self {
        Self {
            id: value.id,
            name: value.name.clone(),
            symptoms: value.symptoms.clone(),
        }
    }
}

/// At most one dialog is open at any time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DialogState {
    #[default]
    None,
    EditingDraft {
        draft: EditDraft,
        busy: bool,
    },
    ConfirmingDelete {
        id: DiseaseId,
        busy: bool,
    },
}

impl DialogState {
    pub fn editing(draft: EditDraft) -> Self {
        DialogState::EditingDraft { draft, busy: false }
    }

    pub fn confirming_delete(id: DiseaseId) -> Self {
        DialogState::ConfirmingDelete { id, busy: false }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PanelState {
    pub form: CreateForm,
    pub dialog: DialogState,
}
