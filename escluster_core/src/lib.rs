pub mod registry;
pub mod storage;
pub mod utils;

// re‑export ergonomic entry points
pub use registry::configuration::{
    ConfigurationRegistry, CredentialFailure, CredentialOperation, MalformedEntry, RestoreReport,
    Snapshot,
};
pub use registry::persistence::{load, save};
pub use storage::credentials::{credential_key, CredentialStore, MemoryCredentialStore};
pub use storage::document::{PersistedDocument, PersistedEntry, PersistedProfile};
pub use storage::errors::{CredentialStoreError, SettingsError};
pub use storage::preferences::{RefreshMode, ViewMode};
pub use storage::profile::{Credentials, Profile};
pub use storage::settings::{MemorySettingsStore, SettingsStore};
