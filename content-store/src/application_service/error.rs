use std::path::PathBuf;

use crate::domain::ContentId;
use crate::port::{PinningBackendError, StorageBackendError};

#[derive(Debug, thiserror::Error)]
pub enum ContentStoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("storage backend error: {0}")]
    Storage(#[from] StorageBackendError),
    /// The content was stored under `cid` but the pin request failed. The
    /// stored content is not removed.
    #[error("content stored as {cid} but pinning failed: {source}")]
    Pinning {
        cid: ContentId,
        #[source]
        source: PinningBackendError,
    },
}

impl ContentStoreError {
    /// CID the failed pin request referred to. After an upload this content
    /// is stored and retrievable, just not pinned.
    pub fn stored_cid(&self) -> Option<&ContentId> {
        match self {
            ContentStoreError::Pinning { cid, .. } => Some(cid),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_names_path() {
        let error = ContentStoreError::NotFound(PathBuf::from("/no/such/path"));
        assert_eq!(error.to_string(), "File not found: /no/such/path");
        assert!(error.stored_cid().is_none());
    }

    #[test]
    fn test_pinning_error_exposes_stored_cid() {
        let error = ContentStoreError::Pinning {
            cid: ContentId::new("QmStored"),
            source: PinningBackendError::Rejected("quota exceeded".into()),
        };
        assert_eq!(error.stored_cid(), Some(&ContentId::new("QmStored")));
        assert!(error.to_string().contains("QmStored"));
    }
}
