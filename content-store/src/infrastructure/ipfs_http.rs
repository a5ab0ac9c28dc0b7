//! Primary storage backend speaking the IPFS HTTP RPC API (Kubo, Infura).

use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};

use crate::domain::{ContentId, StoredContent};
use crate::port::{ChunkStream, PrimaryStorageBackend, StorageBackendError};

use super::config::{Credentials, IpfsConfig};
use super::ConfigurationError;

#[derive(serde::Deserialize)]
struct AddResponse {
    #[serde(rename = "Hash")]
    hash: String,
}

pub struct IpfsHttpClient {
    pub api_url: String,
    pub cid_version: u8,
    project_id: String,
    project_secret: String,
    http_client: Client,
}

impl IpfsHttpClient {
    pub fn new(config: &IpfsConfig, credentials: &Credentials) -> Result<Self, ConfigurationError> {
        let http_client = Client::builder()
            .user_agent(concat!("content-store/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ConfigurationError::HttpClient(e.to_string()))?;

        Ok(Self {
            api_url: config.api_url.clone(),
            cid_version: config.cid_version,
            project_id: credentials.ipfs_project_id.clone(),
            project_secret: credentials.ipfs_project_secret.clone(),
            http_client,
        })
    }

    fn command_url(&self, command: &str) -> String {
        format!("{}/api/v0/{}", self.api_url.trim_end_matches('/'), command)
    }

    async fn check_status(resp: Response) -> Result<Response, StorageBackendError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(StorageBackendError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

fn transport(e: reqwest::Error) -> StorageBackendError {
    StorageBackendError::Transport(e.to_string())
}

#[async_trait]
impl PrimaryStorageBackend for IpfsHttpClient {
    async fn add(&self, content: &StoredContent) -> Result<ContentId, StorageBackendError> {
        let part = Part::stream_with_length(content.bytes().clone(), content.len() as u64)
            .file_name(content.name().to_string());
        let form = Form::new().part("file", part);

        tracing::debug!(name = content.name(), size = content.len(), "ipfs add");
        let resp = self
            .http_client
            .post(self.command_url("add"))
            // Retention is owned by the pinning backend, not by the node.
            .query(&[
                ("cid-version", self.cid_version.to_string()),
                ("pin", "false".to_string()),
            ])
            .basic_auth(&self.project_id, Some(&self.project_secret))
            .multipart(form)
            .send()
            .await
            .map_err(transport)?;
        let body = Self::check_status(resp)
            .await?
            .text()
            .await
            .map_err(transport)?;

        // add answers with one JSON object per line; the last names the root.
        let last = body
            .lines()
            .rev()
            .find(|line| !line.trim().is_empty())
            .ok_or_else(|| StorageBackendError::Decode("empty add response".into()))?;
        let added: AddResponse = serde_json::from_str(last)
            .map_err(|e| StorageBackendError::Decode(format!("add response: {e}")))?;

        Ok(ContentId::new(added.hash))
    }

    async fn cat(&self, cid: &ContentId) -> Result<ChunkStream, StorageBackendError> {
        tracing::debug!(%cid, "ipfs cat");
        let resp = self
            .http_client
            .post(self.command_url("cat"))
            .query(&[("arg", cid.as_str())])
            .basic_auth(&self.project_id, Some(&self.project_secret))
            .send()
            .await
            .map_err(transport)?;
        let resp = Self::check_status(resp).await?;

        Ok(resp.bytes_stream().map_err(transport).boxed())
    }
}
