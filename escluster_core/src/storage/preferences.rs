use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Global auto-refresh preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RefreshMode {
    #[default]
    Disabled,
    #[serde(rename = "EVERY_5_SECONDS")]
    Every5Seconds,
    #[serde(rename = "EVERY_10_SECONDS")]
    Every10Seconds,
    #[serde(rename = "EVERY_30_SECONDS")]
    Every30Seconds,
    #[serde(rename = "EVERY_60_SECONDS")]
    Every60Seconds,
}

impl RefreshMode {
    pub const ALL: [RefreshMode; 5] = [
        RefreshMode::Disabled,
        RefreshMode::Every5Seconds,
        RefreshMode::Every10Seconds,
        RefreshMode::Every30Seconds,
        RefreshMode::Every60Seconds,
    ];

    /// `None` when auto-refresh is off.
    pub fn interval(self) -> Option<Duration> {
        let secs = match self {
            RefreshMode::Disabled => return None,
            RefreshMode::Every5Seconds => 5,
            RefreshMode::Every10Seconds => 10,
            RefreshMode::Every30Seconds => 30,
            RefreshMode::Every60Seconds => 60,
        };
        Some(Duration::from_secs(secs))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RefreshMode::Disabled => "DISABLED",
            RefreshMode::Every5Seconds => "EVERY_5_SECONDS",
            RefreshMode::Every10Seconds => "EVERY_10_SECONDS",
            RefreshMode::Every30Seconds => "EVERY_30_SECONDS",
            RefreshMode::Every60Seconds => "EVERY_60_SECONDS",
        }
    }
}

impl fmt::Display for RefreshMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RefreshMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace('-', "_");
        RefreshMode::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| format!("unknown refresh mode '{s}'"))
    }
}

/// Global display-format preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViewMode {
    #[default]
    Text,
    Table,
}

impl ViewMode {
    pub const ALL: [ViewMode; 2] = [ViewMode::Text, ViewMode::Table];

    pub fn as_str(self) -> &'static str {
        match self {
            ViewMode::Text => "TEXT",
            ViewMode::Table => "TABLE",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ViewMode::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown view mode '{s}'"))
    }
}
