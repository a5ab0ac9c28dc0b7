use async_trait::async_trait;

use crate::domain::ContentId;

#[derive(Debug, thiserror::Error)]
pub enum PinningBackendError {
    #[error("pinning transport error: {0}")]
    Transport(String),
    #[error("pinning service returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("pin rejected: {0}")]
    Rejected(String),
}

/// Secondary service that keeps content retrievable regardless of the primary
/// backend's garbage collection.
///
/// Implementations must accept duplicate pin requests for the same CID.
#[async_trait]
pub trait PinningBackend: Send + Sync {
    async fn pin_by_hash(&self, cid: &ContentId) -> Result<(), PinningBackendError>;
}
