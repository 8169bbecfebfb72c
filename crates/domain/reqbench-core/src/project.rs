use camino::Utf8PathBuf;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectInfo {
    pub name: String,
    pub path: Utf8PathBuf,
    pub last_opened: Option<DateTime<Utc>>,
}

impl ProjectInfo {
    pub fn new(name: impl Into<String>, path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            last_opened: None,
        }
    }
}

/// Reachability of the language-model backend, as last probed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LlmHealth {
    #[default]
    Unknown,
    Ready,
    Degraded(String),
    Offline,
}

impl LlmHealth {
    pub fn is_usable(&self) -> bool {
        matches!(self, LlmHealth::Ready | LlmHealth::Degraded(_))
    }
}
