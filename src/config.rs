use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A saved agenda entry: name and planned minutes only. Elapsed/actual
/// state is runtime-only and never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TopicTemplate {
    pub name: String,
    pub minutes: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Prefill for the minutes input field.
    pub default_minutes: f64,
    /// Agenda template loaded at startup, e.g. for a recurring meeting.
    #[serde(default)]
    pub agenda: Vec<TopicTemplate>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_minutes: 5.0,
            agenda: Vec::new(),
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "agenda-timer") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("agenda_timer_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    /// Missing or unreadable files fall back to defaults.
    fn load(&self) -> Config {
        fs::read_to_string(&self.path)
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default()
    }

    fn save(&self, cfg: &Config) -> io::Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(cfg)?;
        fs::write(&self.path, json)
    }
}
