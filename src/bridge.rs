//! Import bridge: turns importer events into store actions.
//!
//! Events are received on one channel and handled one at a time, each to
//! completion before the next is taken. Cross-event state lives in an
//! explicit [`ImportSession`].

use anyhow::{Context, Result};
use indicatif::ProgressBar;
use serde_json::Value;
use std::path::Path;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, error, info, warn};

use crate::importer::bookmarks::convert_bookmarks;
use crate::importer::cookies::{import_cookies, CookieImportSummary, CookieJar};
use crate::importer::favicons::apply_favicons;
use crate::importer::history::convert_history;
use crate::importer::session::{ImportSession, ImportedBatch};
use crate::importer::{BrowserProfile, ImportSelection, ImporterCapability, ImporterEvent};
use crate::report::ImportReport;
use crate::settings::SHOW_BOOKMARKS_TOOLBAR;
use crate::sites::has_bookmarks;
use crate::store::{AppAction, SiteStore};

pub type TabId = u32;

pub const MESSAGE_BOX_TITLE: &str = "Brave";

/// A modal message shown on a tab. `message` and `buttons` are
/// translation keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageBox {
    pub message: String,
    pub title: String,
    pub buttons: Vec<String>,
}

impl MessageBox {
    pub fn close_firefox_warning() -> Self {
        Self {
            message: "closeFirefoxWarning".to_string(),
            title: MESSAGE_BOX_TITLE.to_string(),
            buttons: vec!["closeFirefoxWarningOk".to_string()],
        }
    }

    pub fn import_success() -> Self {
        Self {
            message: "importSuccess".to_string(),
            title: MESSAGE_BOX_TITLE.to_string(),
            buttons: vec!["importSuccessOk".to_string()],
        }
    }
}

/// Window-side collaborators of the bridge.
pub trait UiHost {
    /// Sends the importable browser list to the focused window. Returns
    /// `false` when no window has focus.
    fn send_importer_list(&mut self, browsers: &[BrowserProfile]) -> bool;
    fn active_tab_id(&self) -> Option<TabId>;
    fn show_message_box(&mut self, tab_id: TabId, message: MessageBox);
}

/// What handling one event did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    BrowsersForwarded { count: usize, delivered: bool },
    HistoryAdded(usize),
    BookmarksAdded { folders: usize, bookmarks: usize },
    /// The batch needed folder ids past `FolderId::MAX`; nothing was stored.
    BookmarksRejected,
    FaviconsPatched(usize),
    /// `add-favicons` arrived with no bookmark batch in the current session.
    FaviconsSkipped,
    CookiesImported(CookieImportSummary),
    ImportFinished { toolbar_enabled: bool, dialog_shown: bool },
    ImportDismissed,
    WarningShown(bool),
    Ignored,
}

pub struct ImportBridge<S, J, U> {
    store: S,
    jar: J,
    ui: U,
    session: Option<ImportSession>,
    /// Last converted bookmark batch, tagged with its session.
    batch: Option<ImportedBatch>,
    clock: fn() -> i64,
}

fn wall_clock_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

impl<S: SiteStore, J: CookieJar, U: UiHost> ImportBridge<S, J, U> {
    pub fn new(store: S, jar: J, ui: U) -> Self {
        Self {
            store,
            jar,
            ui,
            session: None,
            batch: None,
            clock: wall_clock_ms,
        }
    }

    pub fn into_parts(self) -> (S, J, U) {
        (self.store, self.jar, self.ui)
    }

    fn begin_session(&mut self, importing_bookmarks: bool) {
        let had_bookmarks = importing_bookmarks && has_bookmarks(self.store.sites());
        let session = ImportSession::begin(importing_bookmarks, had_bookmarks);
        debug!(
            "Began import session {} (bookmarks: {}, store had bookmarks: {})",
            session.id(),
            importing_bookmarks,
            had_bookmarks
        );
        self.session = Some(session);
    }

    /// The current session; events that arrive before any import request
    /// open an implicit one.
    fn session_mut(&mut self) -> &mut ImportSession {
        self.session
            .get_or_insert_with(|| ImportSession::begin(false, false))
    }

    /// Starts importing `selection` from a foreign browser profile.
    pub fn import_data(
        &mut self,
        importer: &mut dyn ImporterCapability,
        selection: &ImportSelection,
    ) -> Result<()> {
        self.begin_session(selection.favorites);
        importer
            .import_data(selection)
            .context("Importer rejected the import request")
    }

    /// Starts importing bookmarks from an exported HTML file.
    pub fn import_html(&mut self, importer: &mut dyn ImporterCapability, path: &Path) -> Result<()> {
        self.begin_session(true);
        importer
            .import_html(path)
            .with_context(|| format!("Importer rejected bookmark file {:?}", path))
    }

    /// Handles every event until the importer side of the channel closes.
    pub async fn run(
        &mut self,
        events: &mut UnboundedReceiver<ImporterEvent>,
        report: &mut ImportReport,
        progress: &ProgressBar,
    ) {
        while let Some(event) = events.recv().await {
            let name = event.name();
            progress.set_message(name);
            let outcome = self.handle(event);
            report.record(name, &outcome);
            progress.inc(1);
        }
    }

    pub fn handle(&mut self, event: ImporterEvent) -> EventOutcome {
        debug!("Handling importer event {}", event.name());
        match event {
            ImporterEvent::UpdateSupportedBrowsers { browsers } => {
                if let Some(session) = self.session.as_mut() {
                    session.clear_bookmark_import();
                }
                let delivered = self.ui.send_importer_list(&browsers);
                if !delivered {
                    debug!("No focused window; dropped list of {} browsers", browsers.len());
                }
                EventOutcome::BrowsersForwarded {
                    count: browsers.len(),
                    delivered,
                }
            }
            ImporterEvent::AddHistoryPage { history, .. } => {
                let sites = convert_history(&history);
                let count = sites.len();
                self.store.dispatch(AppAction::AddSite(sites));
                info!("📜 Imported {} history entries", count);
                EventOutcome::HistoryAdded(count)
            }
            ImporterEvent::AddBookmarks {
                bookmarks,
                top_level_folder,
            } => {
                let now = (self.clock)();
                let sites = match convert_bookmarks(
                    self.store.sites(),
                    &bookmarks,
                    &top_level_folder,
                    now,
                ) {
                    Ok(sites) => sites,
                    Err(err) => {
                        error!("❌ Could not import bookmarks under {:?}: {}", top_level_folder, err);
                        self.batch = None;
                        return EventOutcome::BookmarksRejected;
                    }
                };
                let folders = sites.iter().filter(|s| s.is_folder()).count();
                let leaves = sites.len() - folders;

                let batch = ImportedBatch::new(self.session_mut(), sites.clone());
                self.batch = Some(batch);
                self.store.dispatch(AppAction::AddSite(sites));
                info!(
                    "📚 Imported {} bookmarks in {} folders under {:?}",
                    leaves, folders, top_level_folder
                );
                EventOutcome::BookmarksAdded {
                    folders,
                    bookmarks: leaves,
                }
            }
            ImporterEvent::AddFavicons { favicons } => {
                let current = self.session.as_ref();
                let batch = self
                    .batch
                    .as_mut()
                    .filter(|batch| current.is_some_and(|session| batch.belongs_to(session)));
                let Some(batch) = batch else {
                    warn!(
                        "⚠️  Received {} favicons with no imported bookmarks to attach them to",
                        favicons.len()
                    );
                    return EventOutcome::FaviconsSkipped;
                };

                let patched = apply_favicons(&mut batch.sites, &favicons);
                let sites = batch.sites.clone();
                self.store.dispatch(AppAction::AddSite(sites));
                info!("🖼️  Attached favicons to {} bookmarks", patched);
                EventOutcome::FaviconsPatched(patched)
            }
            ImporterEvent::AddCookies { cookies } => {
                let summary = import_cookies(&mut self.jar, &cookies);
                info!("🍪 Imported {} cookies ({} failed)", summary.stored, summary.failed);
                EventOutcome::CookiesImported(summary)
            }
            ImporterEvent::ImportSuccess => {
                let toolbar_enabled = self.maybe_show_bookmarks_toolbar();
                let dialog_shown = self.show_on_active_tab(MessageBox::import_success());
                if let Some(session) = self.session.as_mut() {
                    session.finish();
                }
                self.batch = None;
                info!("✅ Import finished");
                EventOutcome::ImportFinished {
                    toolbar_enabled,
                    dialog_shown,
                }
            }
            ImporterEvent::ImportDismiss => {
                if let Some(session) = self.session.as_mut() {
                    session.finish();
                }
                self.batch = None;
                debug!("Import dismissed");
                EventOutcome::ImportDismissed
            }
            ImporterEvent::ShowWarningDialog => {
                EventOutcome::WarningShown(self.show_import_warning())
            }
            ImporterEvent::AddHomepage { .. }
            | ImporterEvent::AddKeywords { .. }
            | ImporterEvent::AddAutofillFormDataEntries { .. } => {
                debug!("Ignoring unsupported importer event");
                EventOutcome::Ignored
            }
        }
    }

    /// Shows the "close the source browser first" warning on the active tab.
    pub fn show_import_warning(&mut self) -> bool {
        self.show_on_active_tab(MessageBox::close_firefox_warning())
    }

    fn show_on_active_tab(&mut self, message: MessageBox) -> bool {
        match self.ui.active_tab_id() {
            Some(tab_id) => {
                self.ui.show_message_box(tab_id, message);
                true
            }
            None => {
                debug!("No active tab for message {}", message.message);
                false
            }
        }
    }

    /// Turns the bookmarks toolbar on after a bookmark import into a store
    /// that had no bookmarks, unless the user already has it on.
    fn maybe_show_bookmarks_toolbar(&mut self) -> bool {
        let Some(session) = self.session.as_ref() else {
            return false;
        };
        if !session.importing_bookmarks() || session.had_bookmarks() {
            return false;
        }
        if self.store.settings().get_bool(SHOW_BOOKMARKS_TOOLBAR) {
            return false;
        }

        self.store.dispatch(AppAction::ChangeSetting {
            key: SHOW_BOOKMARKS_TOOLBAR.to_string(),
            value: Value::Bool(true),
        });
        true
    }
}

#[cfg(test)]
impl<S: SiteStore, J: CookieJar, U: UiHost> ImportBridge<S, J, U> {
    /// Replaces the wall clock used for top-level folder creation times.
    fn with_clock(mut self, clock: fn() -> i64) -> Self {
        self.clock = clock;
        self
    }

    fn store(&self) -> &S {
        &self.store
    }

    fn jar(&self) -> &J {
        &self.jar
    }

    fn ui(&self) -> &U {
        &self.ui
    }

    fn session(&self) -> Option<&ImportSession> {
        self.session.as_ref()
    }
}
