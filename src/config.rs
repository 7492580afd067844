use anyhow::{Context, Result};
use std::path::PathBuf;

pub const STATE_ENV: &str = "IMPORT_BRIDGE_STATE";
pub const COOKIES_ENV: &str = "IMPORT_BRIDGE_COOKIES";

const DATA_DIR: &str = ".browser-import-bridge";

/// Where the bridge keeps its site/settings state and its cookie jar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    pub state_path: PathBuf,
    pub cookie_db_path: PathBuf,
}

impl BridgeConfig {
    /// Resolve paths from command-line overrides, then the environment,
    /// then `$HOME/.browser-import-bridge/`.
    pub fn from_env(state: Option<PathBuf>, cookies: Option<PathBuf>) -> Result<Self> {
        Self::resolve(
            std::env::var(STATE_ENV).ok(),
            std::env::var(COOKIES_ENV).ok(),
            state,
            cookies,
            || std::env::var("HOME").context("HOME is not set; pass --state and --cookies"),
        )
    }

    fn resolve(
        env_state: Option<String>,
        env_cookies: Option<String>,
        state: Option<PathBuf>,
        cookies: Option<PathBuf>,
        home: impl Fn() -> Result<String>,
    ) -> Result<Self> {
        let state_path = match state.or_else(|| env_state.map(PathBuf::from)) {
            Some(path) => path,
            None => PathBuf::from(home()?).join(DATA_DIR).join("state.json"),
        };
        let cookie_db_path = match cookies.or_else(|| env_cookies.map(PathBuf::from)) {
            Some(path) => path,
            None => PathBuf::from(home()?).join(DATA_DIR).join("cookies.sqlite"),
        };

        Ok(Self {
            state_path,
            cookie_db_path,
        })
    }
}
