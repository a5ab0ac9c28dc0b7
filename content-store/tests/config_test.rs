//! Construction-time credential validation through the public API.

use content_store::infrastructure::config::{
    INFURA_IPFS_PROJECT_ID, INFURA_IPFS_PROJECT_SECRET, PINATA_API_KEY, PINATA_SECRET_KEY,
};
use content_store::{ConfigurationError, RemoteContentStore, StoreConfig};
use std::collections::HashMap;
use std::io::Write;
use tempfile::NamedTempFile;

const REQUIRED: [&str; 4] = [
    INFURA_IPFS_PROJECT_ID,
    INFURA_IPFS_PROJECT_SECRET,
    PINATA_API_KEY,
    PINATA_SECRET_KEY,
];

fn env_without(missing: &str) -> HashMap<&'static str, String> {
    REQUIRED
        .iter()
        .filter(|name| **name != missing)
        .map(|name| (*name, format!("value-for-{name}")))
        .collect()
}

#[test]
fn test_each_missing_credential_aborts_construction() {
    for missing in REQUIRED {
        let env = env_without(missing);
        let config = StoreConfig::default().with_overrides(|name| env.get(name).cloned());

        match RemoteContentStore::from_config(&config) {
            Err(ConfigurationError::MissingCredential(name)) => assert_eq!(name, missing),
            Err(other) => panic!("unexpected error for {missing}: {other}"),
            Ok(_) => panic!("store constructed without {missing}"),
        }
    }
}

#[test]
fn test_all_credentials_present_constructs_store() {
    let env = env_without("");
    let config = StoreConfig::default().with_overrides(|name| env.get(name).cloned());

    assert!(RemoteContentStore::from_config(&config).is_ok());
}

#[test]
fn test_store_from_config_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[ipfs]
api_url = "http://127.0.0.1:5001"
project_id = "id"
project_secret = "secret"

[pinata]
api_key = "key"
secret_key = "secret-key"
"#
    )
    .unwrap();

    let config = StoreConfig::from_file(file.path()).unwrap();
    let store = RemoteContentStore::from_config(&config).unwrap();

    assert_eq!(store.primary().api_url, "http://127.0.0.1:5001");
}
