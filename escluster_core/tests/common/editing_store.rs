//! A credential store that runs a one-shot **edit of the registry** the
//! first time `put` is called, i.e. while a snapshot is in the middle of
//! writing credentials.
//!
//! *  Lets tests pin down the interleaving "snapshot has read the profile
//!    map, then the user edits a profile" without relying on thread timing.
//! *  Everything is forwarded to a real `MemoryCredentialStore` in `inner`.

use std::sync::Mutex;

use escluster_core::{CredentialStore, CredentialStoreError, Credentials, MemoryCredentialStore};

type Edit = Box<dyn FnOnce() + Send>;

#[derive(Default)]
pub struct EditingCredentialStore {
    pub inner: MemoryCredentialStore,
    on_first_put: Mutex<Option<Edit>>,
}

impl EditingCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm `edit` to run during the next `put`.
    pub fn on_next_put(&self, edit: impl FnOnce() + Send + 'static) {
        *self.on_first_put.lock().unwrap() = Some(Box::new(edit));
    }
}

impl CredentialStore for EditingCredentialStore {
    fn get(&self, key: &str) -> Result<Option<Credentials>, CredentialStoreError> {
        self.inner.get(key)
    }

    fn put(&self, key: &str, credentials: &Credentials) -> Result<(), CredentialStoreError> {
        let edit = self.on_first_put.lock().unwrap().take();
        if let Some(edit) = edit {
            edit();
        }
        self.inner.put(key, credentials)
    }

    fn delete(&self, key: &str) -> Result<(), CredentialStoreError> {
        self.inner.delete(key)
    }
}
