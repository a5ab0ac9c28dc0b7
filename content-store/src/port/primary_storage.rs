use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;

use crate::domain::{ContentId, StoredContent};

/// Finite, non-restartable sequence of byte chunks produced by `cat`.
///
/// The stream ends when the content is exhausted and may yield an error
/// part-way through.
pub type ChunkStream = BoxStream<'static, Result<Bytes, StorageBackendError>>;

#[derive(Debug, thiserror::Error)]
pub enum StorageBackendError {
    #[error("storage transport error: {0}")]
    Transport(String),
    #[error("storage backend returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("unexpected storage response: {0}")]
    Decode(String),
    #[error("content not found: {0}")]
    NotFound(ContentId),
}

/// Content-addressed storage: identical bytes always yield the same CID.
#[async_trait]
pub trait PrimaryStorageBackend: Send + Sync {
    /// Store `content` and return the identifier the backend derived from it.
    async fn add(&self, content: &StoredContent) -> Result<ContentId, StorageBackendError>;

    /// Open the chunk stream for previously stored content.
    async fn cat(&self, cid: &ContentId) -> Result<ChunkStream, StorageBackendError>;
}
