use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use super::errors::CredentialStoreError;
use super::profile::Credentials;

/// Fixed prefix of every key this crate writes into a credential store.
pub const CREDENTIAL_NAMESPACE: &str = "escluster.ClusterRegistry";

/// Maps a profile label to its credential-store key.
///
/// The namespace is constant, so distinct labels always give distinct keys
/// and the same label gives the same key in every session.
pub fn credential_key(label: &str) -> String {
    format!("{CREDENTIAL_NAMESPACE}/{label}")
}

/// An isolated key/value store for secrets.
///
/// Keys are produced by [`credential_key`]. Implementations must be safe to
/// share between threads; calls are treated as synchronous and may block.
pub trait CredentialStore: Send + Sync {
    /// `Ok(None)` when nothing is stored under `key`.
    fn get(&self, key: &str) -> Result<Option<Credentials>, CredentialStoreError>;

    /// Create or overwrite the entry under `key`.
    fn put(&self, key: &str, credentials: &Credentials) -> Result<(), CredentialStoreError>;

    /// Deleting an absent key is not an error.
    fn delete(&self, key: &str) -> Result<(), CredentialStoreError>;
}

/// Process-local credential store, for tests and `--ephemeral-credentials`.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    entries: RwLock<HashMap<String, Credentials>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        keys.sort();
        keys
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self, key: &str) -> Result<Option<Credentials>, CredentialStoreError> {
        Ok(self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned())
    }

    fn put(&self, key: &str, credentials: &Credentials) -> Result<(), CredentialStoreError> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_owned(), credentials.clone());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), CredentialStoreError> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}
