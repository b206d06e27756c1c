pub mod keyring_store;
pub mod settings_file;

pub use keyring_store::KeyringCredentialStore;
pub use settings_file::JsonSettingsStore;
