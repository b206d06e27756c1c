use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::debug;

use crate::storage::credentials::{credential_key, CredentialStore};
use crate::storage::document::{PersistedDocument, PersistedEntry, PersistedProfile};
use crate::storage::errors::CredentialStoreError;
use crate::storage::preferences::{RefreshMode, ViewMode};
use crate::storage::profile::{Credentials, Profile};

/// Which credential-store call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialOperation {
    Read,
    Write,
    Delete,
}

/// A credential-store call that failed for one profile. The rest of the
/// snapshot or restore went ahead without it.
#[derive(Debug)]
pub struct CredentialFailure {
    pub label: String,
    pub operation: CredentialOperation,
    pub error: CredentialStoreError,
}

/// A `profiles` entry that was dropped while restoring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedEntry {
    pub label: String,
    pub reason: String,
}

/// Result of [`ConfigurationRegistry::snapshot`].
#[derive(Debug)]
pub struct Snapshot {
    /// What goes to the settings store. Never contains credentials.
    pub document: PersistedDocument,
    pub failures: Vec<CredentialFailure>,
}

impl Snapshot {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Result of [`ConfigurationRegistry::restore`].
#[derive(Debug, Default)]
pub struct RestoreReport {
    pub malformed: Vec<MalformedEntry>,
    /// Profiles restored without credentials because the store could not be read.
    pub unavailable: Vec<CredentialFailure>,
}

impl RestoreReport {
    pub fn is_clean(&self) -> bool {
        self.malformed.is_empty() && self.unavailable.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Preferences {
    refresh_mode: RefreshMode,
    view_mode: ViewMode,
}

#[derive(Default)]
struct Inner {
    profiles: RwLock<HashMap<String, Profile>>,
    preferences: RwLock<Preferences>,
    /// Labels whose credential-store entry should be deleted on the next snapshot.
    /// Only changed while the `profiles` lock is held.
    purge: Mutex<HashSet<String>>,
    /// Serializes `snapshot` and `restore` against each other.
    persisting: Mutex<()>,
}

/// In-memory registry of cluster profiles and global preferences.
///
/// All state lives behind an `Arc`, so cloning the registry is cheap and
/// every clone sees the same profiles. The profile map is guarded by an
/// `RwLock`; `put`/`remove`/`get`/`list` may race with `snapshot` from
/// other threads without external locking. Credential-store I/O never
/// happens while the profile map is locked.
///
/// Lock order: `persisting`, then `profiles`, then `purge`.
#[derive(Clone, Default)]
pub struct ConfigurationRegistry {
    inner: Arc<Inner>,
}

impl fmt::Debug for ConfigurationRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let preferences = *self.preferences();
        f.debug_struct("ConfigurationRegistry")
            .field("labels", &self.labels())
            .field("refresh_mode", &preferences.refresh_mode)
            .field("view_mode", &preferences.view_mode)
            .finish()
    }
}

impl ConfigurationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a saved document, pulling secrets from `credentials`.
    pub fn from_document(
        document: Option<&PersistedDocument>,
        credentials: &dyn CredentialStore,
    ) -> (Self, RestoreReport) {
        let registry = Self::new();
        let report = registry.restore(document, credentials);
        (registry, report)
    }

    fn profiles(&self) -> RwLockReadGuard<'_, HashMap<String, Profile>> {
        self.inner
            .profiles
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn profiles_mut(&self) -> RwLockWriteGuard<'_, HashMap<String, Profile>> {
        self.inner
            .profiles
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn preferences(&self) -> RwLockReadGuard<'_, Preferences> {
        self.inner
            .preferences
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn preferences_mut(&self) -> RwLockWriteGuard<'_, Preferences> {
        self.inner
            .preferences
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn purge(&self) -> MutexGuard<'_, HashSet<String>> {
        self.inner
            .purge
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn persisting(&self) -> MutexGuard<'_, ()> {
        self.inner
            .persisting
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert or fully replace the profile stored under `profile.label`.
    pub fn put(&self, profile: Profile) {
        let mut profiles = self.profiles_mut();
        let mut purge = self.purge();
        if profile.credentials.is_some() {
            purge.remove(&profile.label);
        } else {
            purge.insert(profile.label.clone());
        }
        profiles.insert(profile.label.clone(), profile);
    }

    /// Remove the profile under `label`. Absent labels are ignored.
    pub fn remove(&self, label: &str) -> Option<Profile> {
        let mut profiles = self.profiles_mut();
        let removed = profiles.remove(label);
        if removed.is_some() {
            self.purge().insert(label.to_owned());
        }
        removed
    }

    pub fn has(&self, label: &str) -> bool {
        self.profiles().contains_key(label)
    }

    pub fn get(&self, label: &str) -> Option<Profile> {
        self.profiles().get(label).cloned()
    }

    /// Every profile, sorted by label.
    pub fn list(&self) -> Vec<Profile> {
        let mut profiles: Vec<Profile> = self.profiles().values().cloned().collect();
        profiles.sort_by(|a, b| a.label.cmp(&b.label));
        profiles
    }

    /// Every label, sorted.
    pub fn labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = self.profiles().keys().cloned().collect();
        labels.sort();
        labels
    }

    pub fn len(&self) -> usize {
        self.profiles().len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles().is_empty()
    }

    pub fn refresh_mode(&self) -> RefreshMode {
        self.preferences().refresh_mode
    }

    pub fn set_refresh_mode(&self, mode: RefreshMode) {
        self.preferences_mut().refresh_mode = mode;
    }

    pub fn view_mode(&self) -> ViewMode {
        self.preferences().view_mode
    }

    pub fn set_view_mode(&self, mode: ViewMode) {
        self.preferences_mut().view_mode = mode;
    }

    /// Split the registry into a settings document and credential-store writes.
    ///
    /// 1. Every credentialed profile has its credentials written (overwritten)
    ///    under [`credential_key`] of its label.
    /// 2. Every profile contributes a `{label, url}` record to the document.
    /// 3. Labels that were removed, or re-put without credentials, get their
    ///    credential-store entry deleted.
    ///
    /// A failing credential call is recorded in [`Snapshot::failures`] and
    /// does not stop the remaining profiles from being written.
    ///
    /// The profile map and the purge marks are read together. Edits made
    /// while the snapshot is writing are picked up by the next snapshot.
    pub fn snapshot(&self, credentials: &dyn CredentialStore) -> Snapshot {
        let _persisting = self.persisting();
        let (profiles, marked) = {
            let profiles = self.profiles();
            let marked = std::mem::take(&mut *self.purge());
            (profiles.values().cloned().collect::<Vec<_>>(), marked)
        };
        let preferences = *self.preferences();

        let mut document = PersistedDocument {
            profiles: BTreeMap::new(),
            refresh_mode: preferences.refresh_mode,
            view_mode: preferences.view_mode,
        };
        let mut failures = Vec::new();
        let mut credentialed = HashSet::new();

        for profile in profiles {
            if let Some(secret) = &profile.credentials {
                credentialed.insert(profile.label.clone());
                if let Err(error) = credentials.put(&credential_key(&profile.label), secret) {
                    failures.push(CredentialFailure {
                        label: profile.label.clone(),
                        operation: CredentialOperation::Write,
                        error,
                    });
                }
            }
            let record = PersistedProfile {
                label: profile.label,
                url: profile.url,
            };
            document.profiles.insert(record.label.clone(), record.into());
        }

        self.purge_stale(credentials, marked, &mut failures);

        debug!(
            "Snapshot: {} profiles, {} with credentials, {} credential failures",
            document.profiles.len(),
            credentialed.len(),
            failures.len()
        );
        Snapshot { document, failures }
    }

    /// Delete the stored credentials of every label in `marked`. A label
    /// whose delete fails is marked again, unless it has been given
    /// credentials in the meantime.
    fn purge_stale(
        &self,
        credentials: &dyn CredentialStore,
        marked: HashSet<String>,
        failures: &mut Vec<CredentialFailure>,
    ) {
        for label in marked {
            match credentials.delete(&credential_key(&label)) {
                Ok(()) => debug!("Purged stored credentials for '{}'", label),
                Err(error) => {
                    {
                        let profiles = self.profiles();
                        let credentialed = profiles
                            .get(&label)
                            .is_some_and(|p| p.credentials.is_some());
                        if !credentialed {
                            self.purge().insert(label.clone());
                        }
                    }
                    failures.push(CredentialFailure {
                        label,
                        operation: CredentialOperation::Delete,
                        error,
                    });
                }
            }
        }
    }

    /// Replace the registry contents with what `document` describes.
    ///
    /// `None` resets to an empty registry with default preferences.
    /// Credentials are looked up per label; a missing, incomplete or
    /// unreadable entry yields a profile without credentials. Malformed
    /// entries are skipped and reported. The new profile map is built
    /// completely before it replaces the old one.
    ///
    /// Pending purge marks survive for labels the document does not bring
    /// back, so a profile removed before a restore still has its stored
    /// credentials deleted by the next snapshot. Marks for restored labels
    /// are dropped: the restored profile is now the truth for that label.
    pub fn restore(
        &self,
        document: Option<&PersistedDocument>,
        credentials: &dyn CredentialStore,
    ) -> RestoreReport {
        let _persisting = self.persisting();
        let empty = PersistedDocument::default();
        let document = document.unwrap_or(&empty);
        let mut report = RestoreReport::default();
        let mut restored = HashMap::with_capacity(document.profiles.len());

        for (key, entry) in &document.profiles {
            let persisted = match check_entry(key, entry) {
                Ok(persisted) => persisted,
                Err(reason) => {
                    report.malformed.push(MalformedEntry {
                        label: key.clone(),
                        reason,
                    });
                    continue;
                }
            };

            let secret = match credentials.get(&credential_key(key)) {
                Ok(found) => found.filter(Credentials::is_complete),
                Err(error) => {
                    report.unavailable.push(CredentialFailure {
                        label: key.clone(),
                        operation: CredentialOperation::Read,
                        error,
                    });
                    None
                }
            };

            restored.insert(
                key.clone(),
                Profile {
                    label: persisted.label.clone(),
                    url: persisted.url.clone(),
                    credentials: secret,
                },
            );
        }

        *self.preferences_mut() = Preferences {
            refresh_mode: document.refresh_mode,
            view_mode: document.view_mode,
        };
        let count = restored.len();
        {
            let mut profiles = self.profiles_mut();
            *profiles = restored;
            self.purge().retain(|label| !profiles.contains_key(label));
        }

        debug!(
            "Restore: {} profiles, {} malformed, {} unreadable credentials",
            count,
            report.malformed.len(),
            report.unavailable.len()
        );
        report
    }
}

fn check_entry<'a>(key: &str, entry: &'a PersistedEntry) -> Result<&'a PersistedProfile, String> {
    let persisted = entry
        .profile()
        .ok_or_else(|| "expected an object with string fields 'label' and 'url'".to_string())?;
    if persisted.label.is_empty() {
        return Err("label is empty".into());
    }
    if persisted.label != key {
        return Err(format!(
            "label '{}' does not match its key '{}'",
            persisted.label, key
        ));
    }
    Ok(persisted)
}
