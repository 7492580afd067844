//! Importer capability: the host component that reads a foreign browser's
//! profile and emits structured events.
//!
//! Payload field names follow the importer's wire format (snake_case).

pub mod bookmarks;
pub mod cookies;
pub mod favicons;
pub mod history;
pub mod replay;
pub mod session;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A browser profile the importer can read from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserProfile {
    pub index: u32,
    pub name: String,
    #[serde(rename = "type")]
    pub browser_type: String,
    pub history: bool,
    pub favorites: bool,
    pub passwords: bool,
    pub search: bool,
    pub homepage: bool,
    pub autofilldata: bool,
    pub cookies: bool,
}

/// What the user chose to import from a profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportSelection {
    #[serde(rename = "type")]
    pub browser_type: String,
    pub index: u32,
    pub history: bool,
    pub favorites: bool,
    pub passwords: bool,
    pub search: bool,
    pub homepage: bool,
    pub autofilldata: bool,
    pub cookies: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportedHistoryEntry {
    #[serde(default)]
    pub title: String,
    pub url: String,
    /// Seconds since the epoch.
    #[serde(default)]
    pub last_visit: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportedBookmark {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: Option<String>,
    /// Ancestor folder names, outermost first.
    #[serde(default)]
    pub path: Vec<String>,
    #[serde(default)]
    pub is_folder: bool,
    /// Seconds since the epoch.
    #[serde(default)]
    pub creation_time: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaviconEntry {
    pub favicon_url: String,
    #[serde(default)]
    pub urls: Vec<String>,
    #[serde(default)]
    pub png_data: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportedCookie {
    pub url: String,
    pub name: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub secure: bool,
    #[serde(default)]
    pub httponly: bool,
    #[serde(default)]
    pub expiry_date: Option<f64>,
}

/// Events emitted by the importer, tagged by their event name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum ImporterEvent {
    UpdateSupportedBrowsers {
        browsers: Vec<BrowserProfile>,
    },
    AddHistoryPage {
        history: Vec<ImportedHistoryEntry>,
        #[serde(default)]
        visit_source: i32,
    },
    AddHomepage {
        #[serde(default)]
        detail: serde_json::Value,
    },
    AddBookmarks {
        bookmarks: Vec<ImportedBookmark>,
        top_level_folder: String,
    },
    AddFavicons {
        favicons: Vec<FaviconEntry>,
    },
    AddKeywords {
        #[serde(default)]
        template_urls: serde_json::Value,
        #[serde(default)]
        unique_on_host_and_path: bool,
    },
    AddAutofillFormDataEntries {
        #[serde(default)]
        detail: serde_json::Value,
    },
    AddCookies {
        cookies: Vec<ImportedCookie>,
    },
    ImportSuccess,
    ImportDismiss,
    /// Raised by the application when the source browser must be closed first.
    ShowWarningDialog,
}

impl ImporterEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ImporterEvent::UpdateSupportedBrowsers { .. } => "update-supported-browsers",
            ImporterEvent::AddHistoryPage { .. } => "add-history-page",
            ImporterEvent::AddHomepage { .. } => "add-homepage",
            ImporterEvent::AddBookmarks { .. } => "add-bookmarks",
            ImporterEvent::AddFavicons { .. } => "add-favicons",
            ImporterEvent::AddKeywords { .. } => "add-keywords",
            ImporterEvent::AddAutofillFormDataEntries { .. } => "add-autofill-form-data-entries",
            ImporterEvent::AddCookies { .. } => "add-cookies",
            ImporterEvent::ImportSuccess => "import-success",
            ImporterEvent::ImportDismiss => "import-dismiss",
            ImporterEvent::ShowWarningDialog => "show-warning-dialog",
        }
    }
}

/// Host-provided importer. Results arrive later as [`ImporterEvent`]s.
pub trait ImporterCapability {
    fn initialize(&mut self) -> Result<()>;
    fn import_data(&mut self, selection: &ImportSelection) -> Result<()>;
    fn import_html(&mut self, path: &Path) -> Result<()>;
}
