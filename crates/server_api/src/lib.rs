use shared::{
    domain::{Disease, DiseaseDraft, DiseaseId},
    error::{ApiError, ErrorCode},
    protocol::{DiseaseListResponse, MutationResponse},
};
use storage::Storage;
use tracing::info;

/// Longest accepted disease name, in characters.
pub const MAX_NAME_CHARS: usize = 100;

#[derive(Clone)]
pub struct ApiContext {
    pub storage: Storage,
}

pub async fn list_diseases(ctx: &ApiContext) -> Result<DiseaseListResponse, ApiError> {
    let diseases = ctx.storage.list_diseases().await.map_err(internal)?;
    Ok(DiseaseListResponse { diseases })
}

pub async fn create_disease(ctx: &ApiContext, draft: &DiseaseDraft) -> Result<Disease, ApiError> {
    let draft = validate_draft(draft)?;
    let disease_id = ctx
        .storage
        .insert_disease(&draft)
        .await
        .map_err(internal)?;
    info!(disease_id = disease_id.0, "disease added");
    ctx.storage
        .disease(disease_id)
        .await
        .map_err(internal)?
        .ok_or_else(|| ApiError::new(ErrorCode::Internal, "inserted disease vanished"))
}

pub async fn update_disease(
    ctx: &ApiContext,
    disease_id: DiseaseId,
    draft: &DiseaseDraft,
) -> Result<MutationResponse, ApiError> {
    let draft = validate_draft(draft)?;
    let updated = ctx
        .storage
        .update_disease(disease_id, &draft)
        .await
        .map_err(internal)?;
    if !updated {
        return Err(not_found(disease_id));
    }
    info!(disease_id = disease_id.0, "disease updated");
    Ok(MutationResponse {
        message: "Disease updated successfully".into(),
    })
}

pub async fn delete_disease(
    ctx: &ApiContext,
    disease_id: DiseaseId,
) -> Result<MutationResponse, ApiError> {
    let deleted = ctx
        .storage
        .delete_disease(disease_id)
        .await
        .map_err(internal)?;
    if !deleted {
        return Err(not_found(disease_id));
    }
    info!(disease_id = disease_id.0, "disease deleted");
    Ok(MutationResponse {
        message: "Disease deleted successfully".into(),
    })
}

fn validate_draft(draft: &DiseaseDraft) -> Result<DiseaseDraft, ApiError> {
    if let Some(field) = draft.missing_field() {
        return Err(ApiError::new(
            ErrorCode::Validation,
            format!("{field} required"),
        ));
    }
    let draft = draft.trimmed();
    if draft.name.chars().count() > MAX_NAME_CHARS {
        return Err(ApiError::new(
            ErrorCode::Validation,
            format!("disease name must be at most {MAX_NAME_CHARS} characters"),
        ));
    }
    Ok(draft)
}

fn not_found(disease_id: DiseaseId) -> ApiError {
    ApiError::new(
        ErrorCode::NotFound,
        format!("disease {disease_id} not found"),
    )
}

fn internal(err: anyhow::Error) -> ApiError {
    ApiError::new(ErrorCode::Internal, err.to_string())
}
