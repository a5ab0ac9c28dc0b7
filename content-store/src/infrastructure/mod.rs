pub mod config;
pub mod in_memory;
pub mod ipfs_http;
pub mod pinata;

pub use config::{ConfigurationError, Credentials, StoreConfig};
pub use in_memory::{InMemoryPinning, InMemoryStorage};
pub use ipfs_http::IpfsHttpClient;
pub use pinata::PinataClient;

use crate::application_service::ContentStore;

/// Store wired to the IPFS HTTP RPC API and the Pinata pinning service.
pub type RemoteContentStore = ContentStore<IpfsHttpClient, PinataClient>;

impl RemoteContentStore {
    /// Validate credentials, then build both HTTP clients.
    ///
    /// A missing credential fails before any client is constructed.
    pub fn from_config(config: &StoreConfig) -> Result<Self, ConfigurationError> {
        let credentials = config.validate()?;

        let primary = IpfsHttpClient::new(&config.ipfs, &credentials)?;
        let pinning = PinataClient::new(&config.pinata, &credentials)?;
        tracing::debug!(
            ipfs = %primary.api_url,
            pinata = %pinning.api_url,
            "content store ready"
        );

        Ok(ContentStore::new(primary, pinning))
    }
}
