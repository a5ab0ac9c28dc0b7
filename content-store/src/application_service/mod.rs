pub mod content_store;
pub mod error;

pub use content_store::ContentStore;
pub use error::ContentStoreError;
