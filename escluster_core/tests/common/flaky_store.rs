//! An **in‑process credential store** whose individual keys can be made to
//! fail on demand.
//!
//! *  Wraps a real `MemoryCredentialStore`, so everything that succeeds is
//!    observable afterwards through `inner`.
//! *  `fail_key(key)` makes every call touching `key` return
//!    `CredentialStoreError::Unavailable`; `fail_all()` does it for every key.
//! *  `calls` records `(operation, key)` pairs in order, for assertions.

use std::collections::HashSet;
use std::sync::Mutex;

use escluster_core::{CredentialStore, CredentialStoreError, Credentials, MemoryCredentialStore};

#[derive(Default)]
pub struct FlakyCredentialStore {
    pub inner: MemoryCredentialStore,
    failing: Mutex<HashSet<String>>,
    fail_everything: Mutex<bool>,
    pub calls: Mutex<Vec<(&'static str, String)>>,
}

impl FlakyCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_key(&self, key: &str) {
        self.failing.lock().unwrap().insert(key.to_owned());
    }

    pub fn fail_all(&self) {
        *self.fail_everything.lock().unwrap() = true;
    }

    pub fn heal(&self) {
        self.failing.lock().unwrap().clear();
        *self.fail_everything.lock().unwrap() = false;
    }

    pub fn calls_for(&self, operation: &str) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(op, _)| *op == operation)
            .map(|(_, key)| key.clone())
            .collect()
    }

    fn check(&self, operation: &'static str, key: &str) -> Result<(), CredentialStoreError> {
        self.calls
            .lock()
            .unwrap()
            .push((operation, key.to_owned()));
        if *self.fail_everything.lock().unwrap() || self.failing.lock().unwrap().contains(key) {
            return Err(CredentialStoreError::Unavailable(format!(
                "vault locked while trying to {operation} '{key}'"
            )));
        }
        Ok(())
    }
}

impl CredentialStore for FlakyCredentialStore {
    fn get(&self, key: &str) -> Result<Option<Credentials>, CredentialStoreError> {
        self.check("get", key)?;
        self.inner.get(key)
    }

    fn put(&self, key: &str, credentials: &Credentials) -> Result<(), CredentialStoreError> {
        self.check("put", key)?;
        self.inner.put(key, credentials)
    }

    fn delete(&self, key: &str) -> Result<(), CredentialStoreError> {
        self.check("delete", key)?;
        self.inner.delete(key)
    }
}
