use std::sync::{PoisonError, RwLock};

use super::document::PersistedDocument;
use super::errors::SettingsError;

/// Durable storage for the non-secret settings document.
pub trait SettingsStore: Send + Sync {
    /// `Ok(None)` when nothing has been saved yet.
    fn read(&self) -> Result<Option<PersistedDocument>, SettingsError>;

    fn write(&self, document: &PersistedDocument) -> Result<(), SettingsError>;
}

/// Keeps the serialized JSON text in memory, exactly as a file store would
/// write it, so tests can inspect what would reach disk.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    text: RwLock<Option<String>>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from previously saved text (possibly hand-edited).
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: RwLock::new(Some(text.into())),
        }
    }

    pub fn text(&self) -> Option<String> {
        self.text
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl SettingsStore for MemorySettingsStore {
    fn read(&self) -> Result<Option<PersistedDocument>, SettingsError> {
        match self.text() {
            Some(text) => Ok(Some(PersistedDocument::from_json(&text)?)),
            None => Ok(None),
        }
    }

    fn write(&self, document: &PersistedDocument) -> Result<(), SettingsError> {
        let text = document.to_json_pretty()?;
        *self.text.write().unwrap_or_else(PoisonError::into_inner) = Some(text);
        Ok(())
    }
}
