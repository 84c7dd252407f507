use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, sync::RwLock};

/// How often the scheduler invokes the analysis. The algorithm itself takes
/// no options (window size, threshold and curve shape are fixed constants);
/// this section is the reserved place for parameters if any ever appear.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSettings {
    pub run_interval_secs: u64,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            run_interval_secs: 300,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct UserSettings {
    #[serde(default)]
    analysis: AnalysisSettings,
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<UserSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let existing = path.exists();
        let data = if existing {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_default()
        } else {
            UserSettings::default()
        };

        let store = Self {
            path,
            data: RwLock::new(data),
        };

        if !existing {
            // Materialize the defaults so the interval is discoverable.
            let guard = store.data.read().unwrap();
            store.persist(&guard)?;
        }

        Ok(store)
    }

    pub fn analysis(&self) -> AnalysisSettings {
        self.data.read().unwrap().analysis.clone()
    }

    fn persist(&self, data: &UserSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("failed to write settings to {}", self.path.display()))
    }
}
