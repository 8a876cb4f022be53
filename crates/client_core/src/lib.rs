use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use shared::{
    domain::{Disease, DiseaseDraft, DiseaseId},
    error::ApiError,
    protocol::DiseaseListResponse,
};
use tracing::debug;
use url::Url;

pub mod error;
pub mod panel;
pub mod record_store;

pub use error::{ClientError, TransportError, ValidationError};
pub use panel::{
    notification::{Notification, NotificationKind},
    reducer::{Completion, PanelIntent, StoreCommand},
    state::{CreateForm, DialogState, EditDraft, PanelState},
    PanelConfig, PanelController, PanelView,
};
pub use record_store::{LoadStatus, RecordStore, StoreSnapshot};

/// Remote collection the record store keeps in sync with.
#[async_trait]
pub trait DiseaseBackend: Send + Sync {
    async fn list_diseases(&self) -> Result<Vec<Disease>, TransportError>;
    async fn create_disease(&self, draft: &DiseaseDraft) -> Result<(), TransportError>;
    async fn update_disease(
        &self,
        disease_id: DiseaseId,
        draft: &DiseaseDraft,
    ) -> Result<(), TransportError>;
    async fn delete_disease(&self, disease_id: DiseaseId) -> Result<(), TransportError>;
}

/// `DiseaseBackend` over the JSON API served under `{api_base}/diseases`.
pub struct HttpDiseaseBackend {
    http: Client,
    diseases_url: String,
}

impl HttpDiseaseBackend {
    pub fn new(api_base: &str) -> Result<Self, TransportError> {
        Self::with_client(Client::new(), api_base)
    }

    pub fn with_client(http: Client, api_base: &str) -> Result<Self, TransportError> {
        let parsed = Url::parse(api_base.trim())
            .map_err(|e| TransportError::Request(format!("invalid api url '{api_base}': {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(TransportError::Request(format!(
                "unsupported api url scheme '{}'",
                parsed.scheme()
            )));
        }
        Ok(Self {
            http,
            diseases_url: format!("{}/diseases", parsed.as_str().trim_end_matches('/')),
        })
    }

    pub fn diseases_url(&self) -> &str {
        &self.diseases_url
    }

    fn disease_url(&self, disease_id: DiseaseId) -> String {
        format!("{}/{}", self.diseases_url, disease_id.0)
    }
}

#[async_trait]
impl DiseaseBackend for HttpDiseaseBackend {
    async fn list_diseases(&self) -> Result<Vec<Disease>, TransportError> {
        let response = self.http.get(&self.diseases_url).send().await?;
        let body: DiseaseListResponse = ensure_success(response, None).await?.json().await?;
        debug!(count = body.diseases.len(), "listed diseases");
        Ok(body.diseases)
    }

    async fn create_disease(&self, draft: &DiseaseDraft) -> Result<(), TransportError> {
        let response = self.http.post(&self.diseases_url).json(draft).send().await?;
        ensure_success(response, None).await?;
        Ok(())
    }

    async fn update_disease(
        &self,
        disease_id: DiseaseId,
        draft: &DiseaseDraft,
    ) -> Result<(), TransportError> {
        let response = self
            .http
            .put(self.disease_url(disease_id))
            .json(draft)
            .send()
            .await?;
        ensure_success(response, Some(disease_id)).await?;
        Ok(())
    }

    async fn delete_disease(&self, disease_id: DiseaseId) -> Result<(), TransportError> {
        let response = self.http.delete(self.disease_url(disease_id)).send().await?;
        ensure_success(response, Some(disease_id)).await?;
        Ok(())
    }
}

async fn ensure_success(
    response: Response,
    target: Option<DiseaseId>,
) -> Result<Response, TransportError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if let (StatusCode::NOT_FOUND, Some(disease_id)) = (status, target) {
        return Err(TransportError::NotFound(disease_id));
    }
    let message = match response.json::<ApiError>().await {
        Ok(api_error) => api_error.message,
        Err(_) => status.canonical_reason().unwrap_or("unknown").to_string(),
    };
    Err(TransportError::Status {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
