use std::io;

/// Errors reported by a [`CredentialStore`](crate::CredentialStore) backend.
#[derive(Debug, thiserror::Error)]
pub enum CredentialStoreError {
    /// The backend could not complete the request (locked vault, no secret
    /// service on the bus, permission denied, ...).
    #[error("credential store unavailable: {0}")]
    Unavailable(String),

    /// An entry exists but its stored value could not be decoded.
    #[error("credential entry is corrupt: {0}")]
    Corrupt(String),
}

/// Errors reported by a [`SettingsStore`](crate::SettingsStore) backend.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("settings I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("settings document is not valid JSON: {0}")]
    Format(#[from] serde_json::Error),

    #[error("unable to locate a configuration directory")]
    NoConfigDir,
}
