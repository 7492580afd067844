//! Browser settings the bridge and the payments panel read and change.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

pub const PAYMENTS_ENABLED: &str = "payments.enabled";
pub const AUTO_SUGGEST_SITES: &str = "payments.auto-suggest-sites";
pub const SHOW_BOOKMARKS_TOOLBAR: &str = "bookmarks.toolbar.show";

/// Built-in default for a known setting key.
pub fn default_setting(key: &str) -> Option<Value> {
    match key {
        PAYMENTS_ENABLED => Some(Value::Bool(false)),
        AUTO_SUGGEST_SITES => Some(Value::Bool(true)),
        SHOW_BOOKMARKS_TOOLBAR => Some(Value::Bool(false)),
        _ => None,
    }
}

/// User-changed settings. Keys that were never changed fall back to
/// [`default_setting`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Settings {
    values: BTreeMap<String, Value>,
}

impl Settings {
    pub fn get(&self, key: &str) -> Option<Value> {
        self.values
            .get(key)
            .cloned()
            .or_else(|| default_setting(key))
    }

    /// Boolean view of a setting; anything that is not a JSON bool reads as `false`.
    pub fn get_bool(&self, key: &str) -> bool {
        self.get(key).and_then(|v| v.as_bool()).unwrap_or(false)
    }

    pub fn set(&mut self, key: &str, value: Value) {
        self.values.insert(key.to_string(), value);
    }

}

#[cfg(test)]
impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: Value) -> Self {
        self.set(key, value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::new();
        assert!(!settings.get_bool(PAYMENTS_ENABLED));
        assert!(settings.get_bool(AUTO_SUGGEST_SITES));
        assert!(!settings.get_bool(SHOW_BOOKMARKS_TOOLBAR));
        assert_eq!(settings.get("unknown.key"), None);
    }

    #[test]
    fn test_override_and_serialize() {
        let settings = Settings::new().with(SHOW_BOOKMARKS_TOOLBAR, Value::Bool(true));
        assert!(settings.get_bool(SHOW_BOOKMARKS_TOOLBAR));

        let json = serde_json::to_string(&settings).unwrap();
        assert_eq!(json, r#"{"bookmarks.toolbar.show":true}"#);
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, settings);
    }
}
