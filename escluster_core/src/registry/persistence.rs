//! Host-side glue: move a registry in and out of a settings store and a
//! credential store in one call.

use log::info;

use super::configuration::{ConfigurationRegistry, CredentialFailure, RestoreReport};
use crate::storage::credentials::CredentialStore;
use crate::storage::errors::SettingsError;
use crate::storage::settings::SettingsStore;

/// Read the settings document and rebuild a registry from it.
///
/// Nothing saved yet means an empty registry with default preferences.
/// Only a settings-store failure is an error; per-profile problems end up
/// in the returned [`RestoreReport`].
pub fn load(
    settings: &dyn SettingsStore,
    credentials: &dyn CredentialStore,
) -> Result<(ConfigurationRegistry, RestoreReport), SettingsError> {
    let document = settings.read()?;
    if document.is_none() {
        info!("No saved settings found, starting with an empty registry");
    }
    Ok(ConfigurationRegistry::from_document(
        document.as_ref(),
        credentials,
    ))
}

/// Snapshot `registry` and write the document to `settings`.
///
/// Returns the credential calls that failed; the document is written
/// regardless.
pub fn save(
    registry: &ConfigurationRegistry,
    settings: &dyn SettingsStore,
    credentials: &dyn CredentialStore,
) -> Result<Vec<CredentialFailure>, SettingsError> {
    let snapshot = registry.snapshot(credentials);
    settings.write(&snapshot.document)?;
    info!(
        "Saved {} profiles ({} credential failures)",
        snapshot.document.profiles.len(),
        snapshot.failures.len()
    );
    Ok(snapshot.failures)
}
