//! Per-import session context shared by the bridge's event handlers.

use uuid::Uuid;

use crate::sites::Site;

/// Bookmark records converted during a session, kept so a later
/// `add-favicons` event can patch them. Tagged with the id of the session
/// that produced them.
#[derive(Debug, Clone)]
pub struct ImportedBatch {
    session_id: Uuid,
    pub sites: Vec<Site>,
}

impl ImportedBatch {
    pub fn new(session: &ImportSession, sites: Vec<Site>) -> Self {
        Self {
            session_id: session.id(),
            sites,
        }
    }

    /// Whether the batch was converted in `session` and that session is
    /// still running.
    pub fn belongs_to(&self, session: &ImportSession) -> bool {
        self.session_id == session.id() && !session.is_finished()
    }
}

#[derive(Debug, Clone)]
pub struct ImportSession {
    id: Uuid,
    importing_bookmarks: bool,
    had_bookmarks: bool,
    finished: bool,
}

impl ImportSession {
    /// Starts a session. `had_bookmarks` records whether the store already
    /// held bookmarks or folders when the import began.
    pub fn begin(importing_bookmarks: bool, had_bookmarks: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            importing_bookmarks,
            had_bookmarks,
            finished: false,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn importing_bookmarks(&self) -> bool {
        self.importing_bookmarks
    }

    pub fn had_bookmarks(&self) -> bool {
        self.had_bookmarks
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// The importer re-announced its browser list; whatever was being
    /// imported is no longer a bookmark import.
    pub fn clear_bookmark_import(&mut self) {
        self.importing_bookmarks = false;
    }

    pub fn finish(&mut self) {
        self.finished = true;
    }
}
