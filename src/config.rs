use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::{
    fs::{read_to_string, write},
    path::PathBuf,
};

use crate::{
    broadcast::{UpdatePolicy, WindowGroup},
    cache::RESOURCE_WINDOW_CACHE_SIZE,
    error::LecternError,
    plan::{ContextViewMode, DEFAULT_VERSES_AFTER, DEFAULT_VERSES_BEFORE},
    provider::BackendKind,
};

/// Persisted configuration of one resource window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowSettings {
    pub group: WindowGroup,
    pub policy: UpdatePolicy,
    pub view_mode: ContextViewMode,
    pub verses_before: u16,
    pub verses_after: u16,
    pub backend: BackendKind,
    pub cache_capacity: usize,
}

impl Default for WindowSettings {
    fn default() -> Self {
        WindowSettings {
            group: WindowGroup::default(),
            policy: UpdatePolicy::default(),
            view_mode: ContextViewMode::default(),
            verses_before: DEFAULT_VERSES_BEFORE,
            verses_after: DEFAULT_VERSES_AFTER,
            backend: BackendKind::default(),
            cache_capacity: RESOURCE_WINDOW_CACHE_SIZE,
        }
    }
}

/// All window configurations of a workspace, keyed by window name.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WorkspaceSettings {
    #[serde(default)]
    pub windows: BTreeMap<String, WindowSettings>,
}

pub trait SettingsProvider: Send + Sync {
    fn load(&self) -> Result<WorkspaceSettings, LecternError>;
    fn save(&self, settings: &WorkspaceSettings) -> Result<(), LecternError>;
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TomlSettingsProvider {
    path: PathBuf,
}

impl TomlSettingsProvider {
    pub fn new(path: PathBuf) -> Self {
        TomlSettingsProvider { path }
    }
}

impl SettingsProvider for TomlSettingsProvider {
    fn load(&self) -> Result<WorkspaceSettings, LecternError> {
        tracing::debug!("Attempting to read window settings from: {:?}", &self.path);
        if !self.path.exists() {
            tracing::debug!("Settings file not found, returning empty workspace.");
            return Ok(WorkspaceSettings::default());
        }
        let content = read_to_string(&self.path)?;
        Ok(toml::from_str(&content)?)
    }

    fn save(&self, settings: &WorkspaceSettings) -> Result<(), LecternError> {
        tracing::debug!("Attempting to write window settings to: {:?}", &self.path);
        let toml_string = toml::to_string(settings)?;
        write(&self.path, toml_string)?;
        Ok(())
    }
}
