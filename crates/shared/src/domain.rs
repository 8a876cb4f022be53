use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(DiseaseId);

/// A persisted disease entry as reported by the backing store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Disease {
    pub id: DiseaseId,
    pub name: String,
    pub symptoms: String,
}

/// Unpersisted name/symptoms pair, used both as the write body and as the
/// working copy behind the create form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiseaseDraft {
    pub name: String,
    pub symptoms: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Name,
    Symptoms,
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DraftField::Name => f.write_str("disease name"),
            DraftField::Symptoms => f.write_str("symptoms"),
        }
    }
}

impl DiseaseDraft {
    pub fn new(name: impl Into<String>, symptoms: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            symptoms: symptoms.into(),
        }
    }

    /// First required field that is blank after trimming, if any.
    pub fn missing_field(&self) -> Option<DraftField> {
        if self.name.trim().is_empty() {
            Some(DraftField::Name)
        } else if self.symptoms.trim().is_empty() {
            Some(DraftField::Symptoms)
        } else {
            None
        }
    }

    pub fn trimmed(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            symptoms: self.symptoms.trim().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_fields_are_reported_in_form_order() {
        assert_eq!(
            DiseaseDraft::new("  ", "").missing_field(),
            Some(DraftField::Name)
        );
        assert_eq!(
            DiseaseDraft::new("Mange", " \n").missing_field(),
            Some(DraftField::Symptoms)
        );
        assert_eq!(DiseaseDraft::new("Mange", "itching").missing_field(), None);
    }

    #[test]
    fn disease_id_serializes_as_bare_integer() {
        let disease = Disease {
            id: DiseaseId(7),
            name: "Rabies".into(),
            symptoms: "fever".into(),
        };
        let json = serde_json::to_value(&disease).expect("serialize");
        assert_eq!(json["id"], 7);
    }
}
