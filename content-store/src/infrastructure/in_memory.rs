//! In-memory backends for offline use and tests.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError, RwLock};

use async_trait::async_trait;
use bytes::Bytes;
use cid::Cid;
use futures::StreamExt;
use multihash_codetable::{Code, MultihashDigest};

use crate::domain::{ContentId, StoredContent};
use crate::port::{
    ChunkStream, PinningBackend, PinningBackendError, PrimaryStorageBackend, StorageBackendError,
};

/// Chunk size used by `cat`, matching the default IPFS chunker.
pub const DEFAULT_CHUNK_SIZE: usize = 256 * 1024;

/// Multicodec for raw binary leaves.
const RAW_CODEC: u64 = 0x55;

/// Content-addressed store keyed by a CIDv1 (raw, sha2-256) of the bytes.
pub struct InMemoryStorage {
    blobs: RwLock<HashMap<ContentId, Bytes>>,
    /// Logical names in the order `add` received them.
    names: Mutex<Vec<String>>,
    chunk_size: usize,
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::with_chunk_size(DEFAULT_CHUNK_SIZE)
    }

    pub fn with_chunk_size(chunk_size: usize) -> Self {
        Self {
            blobs: RwLock::new(HashMap::new()),
            names: Mutex::new(Vec::new()),
            chunk_size: chunk_size.max(1),
        }
    }

    pub fn cid_for(bytes: &[u8]) -> ContentId {
        let mh = Code::Sha2_256.digest(bytes);
        ContentId::new(Cid::new_v1(RAW_CODEC, mh).to_string())
    }

    pub fn contains(&self, cid: &ContentId) -> bool {
        self.blobs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(cid)
    }

    /// Number of `add` calls received, including duplicates.
    pub fn add_count(&self) -> usize {
        self.names.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn names(&self) -> Vec<String> {
        self.names
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl PrimaryStorageBackend for InMemoryStorage {
    async fn add(&self, content: &StoredContent) -> Result<ContentId, StorageBackendError> {
        let cid = Self::cid_for(content.bytes());
        self.blobs
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(cid.clone(), content.bytes().clone());
        self.names
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(content.name().to_string());
        Ok(cid)
    }

    async fn cat(&self, cid: &ContentId) -> Result<ChunkStream, StorageBackendError> {
        let bytes = self
            .blobs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(cid)
            .cloned()
            .ok_or_else(|| StorageBackendError::NotFound(cid.clone()))?;

        let chunks: Vec<Result<Bytes, StorageBackendError>> = (0..bytes.len())
            .step_by(self.chunk_size)
            .map(|start| Ok(bytes.slice(start..(start + self.chunk_size).min(bytes.len()))))
            .collect();
        Ok(futures::stream::iter(chunks).boxed())
    }
}

/// Pinning backend that accepts every request and records it.
#[derive(Default)]
pub struct InMemoryPinning {
    pins: Mutex<Vec<ContentId>>,
}

impl InMemoryPinning {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every pin request received, in order, duplicates included.
    pub fn pins(&self) -> Vec<ContentId> {
        self.pins.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn pin_count(&self, cid: &ContentId) -> usize {
        self.pins
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|pinned| *pinned == cid)
            .count()
    }
}

#[async_trait]
impl PinningBackend for InMemoryPinning {
    async fn pin_by_hash(&self, cid: &ContentId) -> Result<(), PinningBackendError> {
        self.pins
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(cid.clone());
        Ok(())
    }
}
