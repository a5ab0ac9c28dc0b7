//! Port layer - Abstract interfaces for the two storage collaborators
//!
//! `ContentStore` only talks to these traits, so the HTTP clients in
//! `infrastructure` can be swapped for in-memory or failing doubles.

pub mod pinning_backend;
pub mod primary_storage;

pub use pinning_backend::{PinningBackend, PinningBackendError};
pub use primary_storage::{ChunkStream, PrimaryStorageBackend, StorageBackendError};
