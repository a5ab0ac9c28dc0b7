//! Pinning backend backed by the Pinata pinning API.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};

use crate::domain::ContentId;
use crate::port::{PinningBackend, PinningBackendError};

use super::config::{Credentials, PinataConfig};
use super::ConfigurationError;

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct PinByHashRequest<'a> {
    hash_to_pin: &'a str,
}

/// Pin job states that mean the content will never be pinned.
const FAILED_JOB_STATUSES: [&str; 5] = [
    "expired",
    "over_free_limit",
    "over_max_size",
    "invalid_object",
    "bad_host_node",
];

#[derive(serde::Deserialize)]
struct PinByHashResponse {
    id: Option<String>,
    status: Option<String>,
}

pub struct PinataClient {
    pub api_url: String,
    api_key: String,
    secret_key: String,
    http_client: Client,
}

impl PinataClient {
    pub fn new(config: &PinataConfig, credentials: &Credentials) -> Result<Self, ConfigurationError> {
        let http_client = Client::builder()
            .user_agent(concat!("content-store/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ConfigurationError::HttpClient(e.to_string()))?;

        Ok(Self {
            api_url: config.api_url.clone(),
            api_key: credentials.pinata_api_key.clone(),
            secret_key: credentials.pinata_secret_key.clone(),
            http_client,
        })
    }

    fn url(&self, route: &str) -> String {
        format!("{}/{}", self.api_url.trim_end_matches('/'), route)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("pinata_api_key", &self.api_key)
            .header("pinata_secret_api_key", &self.secret_key)
    }

    async fn check_status(resp: Response) -> Result<Response, PinningBackendError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(PinningBackendError::Status {
            status: status.as_u16(),
            body,
        })
    }

    /// Probe the configured keys without pinning anything.
    pub async fn test_authentication(&self) -> Result<(), PinningBackendError> {
        let resp = self
            .authorized(self.http_client.get(self.url("data/testAuthentication")))
            .send()
            .await
            .map_err(transport)?;
        Self::check_status(resp).await?;
        Ok(())
    }
}

fn transport(e: reqwest::Error) -> PinningBackendError {
    PinningBackendError::Transport(e.to_string())
}

#[async_trait]
impl PinningBackend for PinataClient {
    async fn pin_by_hash(&self, cid: &ContentId) -> Result<(), PinningBackendError> {
        let resp = self
            .authorized(self.http_client.post(self.url("pinning/pinByHash")))
            .json(&PinByHashRequest {
                hash_to_pin: cid.as_str(),
            })
            .send()
            .await
            .map_err(transport)?;
        let resp = Self::check_status(resp).await?;

        // A 2xx without a job body is still an acknowledgment.
        let job = match resp.json::<PinByHashResponse>().await {
            Ok(job) => job,
            Err(e) => {
                tracing::debug!(%cid, error = %e, "pin request accepted without job body");
                return Ok(());
            }
        };

        let status = job.status.as_deref().unwrap_or("-");
        if FAILED_JOB_STATUSES.contains(&status) {
            return Err(PinningBackendError::Rejected(format!(
                "pin job {} for {cid} ended as {status}",
                job.id.as_deref().unwrap_or("-")
            )));
        }
        tracing::debug!(
            %cid,
            job_id = job.id.as_deref().unwrap_or("-"),
            status,
            "pin request accepted"
        );
        Ok(())
    }
}
