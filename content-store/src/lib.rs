pub mod application_service;
pub mod domain;
pub mod infrastructure;
pub mod port;

pub use application_service::{ContentStore, ContentStoreError};
pub use domain::{ContentId, StoredContent};
pub use infrastructure::{ConfigurationError, RemoteContentStore, StoreConfig};
pub use port::{PinningBackend, PinningBackendError, PrimaryStorageBackend, StorageBackendError};

/// Initialize a store from a TOML configuration file, with environment
/// variables taking precedence over the file.
pub fn init_store_from_file<P: AsRef<std::path::Path>>(
    config_path: P,
) -> Result<RemoteContentStore, ConfigurationError> {
    let config = StoreConfig::from_file(config_path)?.with_env_overrides();
    RemoteContentStore::from_config(&config)
}

/// Initialize a store from the process environment (and `.env`, if present).
pub fn init_store_from_env() -> Result<RemoteContentStore, ConfigurationError> {
    RemoteContentStore::from_config(&StoreConfig::from_env())
}
