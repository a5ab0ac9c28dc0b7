use std::io;
use std::path::Path;

use futures::TryStreamExt;
use serde::Serialize;

use crate::domain::{canonical_json, ContentId, StoredContent};
use crate::port::{PinningBackend, PrimaryStorageBackend};

use super::ContentStoreError;

/// Upload, pin and retrieval orchestration over two storage collaborators.
///
/// A value of this type only exists once its backends have been built, so
/// every operation runs against ready clients. The backends are read-only
/// after construction and concurrent calls share nothing else.
pub struct ContentStore<S, P> {
    primary: S,
    pinning: P,
}

impl<S, P> ContentStore<S, P>
where
    S: PrimaryStorageBackend,
    P: PinningBackend,
{
    pub fn new(primary: S, pinning: P) -> Self {
        Self { primary, pinning }
    }

    pub fn primary(&self) -> &S {
        &self.primary
    }

    pub fn pinning(&self) -> &P {
        &self.pinning
    }

    /// Stores the file at `path` under its final path segment and pins it.
    ///
    /// The whole file is buffered in memory. A pin failure is reported as
    /// [`ContentStoreError::Pinning`] carrying the CID of the stored content.
    pub async fn upload_file(&self, path: impl AsRef<Path>) -> Result<ContentId, ContentStoreError> {
        let path = path.as_ref();
        let result = self.upload_file_inner(path).await;
        if let Err(e) = &result {
            tracing::error!(path = %path.display(), error = %e, "IPFS upload failed");
        }
        result
    }

    async fn upload_file_inner(&self, path: &Path) -> Result<ContentId, ContentStoreError> {
        let metadata = match tokio::fs::metadata(path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(ContentStoreError::NotFound(path.to_path_buf()))
            }
            Err(e) => return Err(unreadable(path, e)),
        };
        if !metadata.is_file() {
            return Err(ContentStoreError::InvalidInput(format!(
                "{} is not a regular file",
                path.display()
            )));
        }

        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| {
                ContentStoreError::InvalidInput(format!("{} has no file name", path.display()))
            })?;

        let bytes = tokio::fs::read(path).await.map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ContentStoreError::NotFound(path.to_path_buf()),
            _ => unreadable(path, e),
        })?;

        self.store_and_pin(StoredContent::file(name, bytes)).await
    }

    /// Stores `metadata` as canonical JSON under `metadata.json` and pins it.
    ///
    /// Empty or non-object metadata is rejected before any backend call.
    pub async fn upload_json_metadata<T>(&self, metadata: &T) -> Result<ContentId, ContentStoreError>
    where
        T: Serialize + ?Sized,
    {
        let result = match canonical_json(metadata) {
            Ok(encoded) => self.store_and_pin(StoredContent::metadata(encoded)).await,
            Err(e) => Err(ContentStoreError::InvalidInput(e.to_string())),
        };
        if let Err(e) = &result {
            tracing::error!(error = %e, "IPFS metadata upload failed");
        }
        result
    }

    /// Reads the full content behind `cid` into a single buffer.
    pub async fn retrieve_file(&self, cid: &ContentId) -> Result<Vec<u8>, ContentStoreError> {
        let result = self.retrieve_inner(cid).await;
        match &result {
            Ok(bytes) => tracing::debug!(%cid, size = bytes.len(), "retrieved content"),
            Err(e) => tracing::error!(%cid, error = %e, "IPFS file retrieval failed"),
        }
        result
    }

    async fn retrieve_inner(&self, cid: &ContentId) -> Result<Vec<u8>, ContentStoreError> {
        let mut chunks = self.primary.cat(cid).await?;
        let mut buffer = Vec::new();
        while let Some(chunk) = chunks.try_next().await? {
            buffer.extend_from_slice(&chunk);
        }
        Ok(buffer)
    }

    /// Pins content that is expected to exist already.
    ///
    /// Existence is not checked here; the pinning backend decides.
    pub async fn pin_file(&self, cid: &ContentId) -> Result<(), ContentStoreError> {
        match self.pinning.pin_by_hash(cid).await {
            Ok(()) => {
                tracing::info!(%cid, "pinned content");
                Ok(())
            }
            Err(source) => {
                tracing::error!(%cid, error = %source, "pinning failed");
                Err(ContentStoreError::Pinning {
                    cid: cid.clone(),
                    source,
                })
            }
        }
    }

    // A pin failure never rolls back the store.
    async fn store_and_pin(&self, content: StoredContent) -> Result<ContentId, ContentStoreError> {
        let cid = self.primary.add(&content).await?;
        tracing::info!(%cid, name = content.name(), size = content.len(), "stored content");

        self.pinning
            .pin_by_hash(&cid)
            .await
            .map_err(|source| ContentStoreError::Pinning {
                cid: cid.clone(),
                source,
            })?;
        tracing::info!(%cid, "pinned content");

        Ok(cid)
    }
}

fn unreadable(path: &Path, e: io::Error) -> ContentStoreError {
    ContentStoreError::InvalidInput(format!("cannot read {}: {e}", path.display()))
}
