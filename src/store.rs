//! Application state store: the flat site collection plus settings.
//!
//! The bridge never mutates state directly; it dispatches [`AppAction`]s
//! through the [`SiteStore`] trait. [`AppStore`] is a JSON-file-backed
//! implementation used by the CLI and the tests.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::errors::StoreError;
use crate::settings::Settings;
use crate::sites::Site;

/// Actions the bridge sends to the store.
#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    /// Add (or merge) a batch of site records.
    AddSite(Vec<Site>),
    ChangeSetting { key: String, value: Value },
}

/// Read access to application state plus the single dispatch entry point.
pub trait SiteStore {
    fn sites(&self) -> &[Site];
    fn settings(&self) -> &Settings;
    fn dispatch(&mut self, action: AppAction);
}

/// Persisted application state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppState {
    #[serde(default)]
    pub sites: Vec<Site>,
    #[serde(default)]
    pub settings: Settings,
}

#[derive(Debug, Default)]
pub struct AppStore {
    state: AppState,
    path: Option<PathBuf>,
    dispatched: usize,
}

impl AppStore {
    /// Load state from `path`; a missing file yields an empty store bound to it.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let state = if path.exists() {
            let content = fs::read_to_string(path).map_err(|source| StoreError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            serde_json::from_str(&content).map_err(|source| StoreError::Serialization {
                path: path.to_path_buf(),
                source,
            })?
        } else {
            AppState::default()
        };

        debug!("Loaded {} sites from {:?}", state.sites.len(), path);
        Ok(Self {
            state,
            path: Some(path.to_path_buf()),
            dispatched: 0,
        })
    }

    /// Save state to the file it was loaded from. In-memory stores are a no-op.
    pub fn save(&self) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let content =
            serde_json::to_string_pretty(&self.state).map_err(|source| StoreError::Serialization {
                path: path.clone(),
                source,
            })?;
        fs::write(path, content).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;

        debug!("Saved {} sites to {:?}", self.state.sites.len(), path);
        Ok(())
    }

    /// Number of actions dispatched since the store was created.
    pub fn dispatched(&self) -> usize {
        self.dispatched
    }

    fn add_sites(&mut self, sites: Vec<Site>) {
        let mut index: HashMap<String, usize> = self
            .state
            .sites
            .iter()
            .enumerate()
            .map(|(i, site)| (site.key(), i))
            .collect();

        for site in sites {
            let key = site.key();
            match index.get(&key) {
                Some(&i) => self.state.sites[i].merge_from(&site),
                None => {
                    index.insert(key, self.state.sites.len());
                    self.state.sites.push(site);
                }
            }
        }
    }
}

#[cfg(test)]
impl AppStore {
    /// In-memory store
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            path: None,
            dispatched: 0,
        }
    }
}

impl SiteStore for AppStore {
    fn sites(&self) -> &[Site] {
        &self.state.sites
    }

    fn settings(&self) -> &Settings {
        &self.state.settings
    }

    fn dispatch(&mut self, action: AppAction) {
        self.dispatched += 1;
        match action {
            AppAction::AddSite(sites) => {
                debug!("Adding {} site records", sites.len());
                self.add_sites(sites);
            }
            AppAction::ChangeSetting { key, value } => {
                debug!("Changing setting {} to {}", key, value);
                self.state.settings.set(&key, value);
            }
        }
    }
}
