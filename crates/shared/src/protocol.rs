use serde::{Deserialize, Serialize};

use crate::domain::Disease;

pub const DISEASES_ROUTE: &str = "/api/diseases";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiseaseListResponse {
    pub diseases: Vec<Disease>,
}

/// Acknowledgement body for create/update/delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MutationResponse {
    pub message: String,
}
