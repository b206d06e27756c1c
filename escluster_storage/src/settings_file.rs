use std::{
    fs, io,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use escluster_core::{PersistedDocument, SettingsError, SettingsStore};
use log::debug;

const SETTINGS_FILE: &str = "settings.json";

/// The settings document as a pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct JsonSettingsStore {
    path: PathBuf,
}

impl JsonSettingsStore {
    /// `~/.config/escluster/settings.json` on Linux, `%APPDATA%\escluster\config\settings.json`
    /// on Windows, etc. The directory is created on first write.
    pub fn new() -> Result<Self, SettingsError> {
        let proj = ProjectDirs::from("", "", "escluster").ok_or(SettingsError::NoConfigDir)?;
        Ok(Self::at(proj.config_dir().join(SETTINGS_FILE)))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SettingsStore for JsonSettingsStore {
    /// A missing file means nothing was saved yet.
    fn read(&self) -> Result<Option<PersistedDocument>, SettingsError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(PersistedDocument::from_json(&text)?)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No settings file at {:?}", self.path);
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Written to a sibling temp file first, then renamed over the old one.
    fn write(&self, document: &PersistedDocument) -> Result<(), SettingsError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let tmp = self.temp_path();
        fs::write(&tmp, document.to_json_pretty()?)?;
        fs::rename(&tmp, &self.path)?;
        debug!("Wrote settings to {:?}", self.path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use escluster_core::{PersistedProfile, ViewMode};

    #[test]
    fn missing_file_reads_as_nothing_saved() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let store = JsonSettingsStore::at(dir.path().join("settings.json"));
        assert_eq!(store.read()?, None);
        Ok(())
    }

    #[test]
    fn write_creates_parent_dirs_and_reads_back() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let store = JsonSettingsStore::at(dir.path().join("nested/deeper/settings.json"));
        let mut document = PersistedDocument::default();
        document.view_mode = ViewMode::Table;
        document.profiles.insert(
            "dev".into(),
            PersistedProfile {
                label: "dev".into(),
                url: "http://localhost:9200".into(),
            }
            .into(),
        );

        store.write(&document)?;

        assert_eq!(store.read()?, Some(document));
        assert!(!store.temp_path().exists());
        Ok(())
    }

    #[test]
    fn garbage_file_is_a_format_error() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("settings.json");
        fs::write(&path, "<xml>not json</xml>")?;

        let err = JsonSettingsStore::at(&path).read().unwrap_err();
        assert!(matches!(err, SettingsError::Format(_)));
        Ok(())
    }
}
