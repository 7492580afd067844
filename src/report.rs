use crate::bridge::EventOutcome;

/// Running tally of what an import did, printed when a replay finishes.
#[derive(Debug, Default)]
pub struct ImportReport {
    events_handled: usize,
    browsers_announced: usize,
    history_added: usize,
    folders_added: usize,
    bookmarks_added: usize,
    bookmark_batches_rejected: usize,
    favicons_patched: usize,
    favicon_batches_skipped: usize,
    cookies_stored: usize,
    cookies_failed: usize,
    ignored: Vec<String>,
    finished: bool,
    dismissed: bool,
    toolbar_enabled: bool,
}

impl ImportReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, event: &str, outcome: &EventOutcome) {
        self.events_handled += 1;
        match outcome {
            EventOutcome::BrowsersForwarded { count, .. } => self.browsers_announced += count,
            EventOutcome::HistoryAdded(count) => self.history_added += count,
            EventOutcome::BookmarksAdded { folders, bookmarks } => {
                self.folders_added += folders;
                self.bookmarks_added += bookmarks;
            }
            EventOutcome::BookmarksRejected => self.bookmark_batches_rejected += 1,
            EventOutcome::FaviconsPatched(count) => self.favicons_patched += count,
            EventOutcome::FaviconsSkipped => self.favicon_batches_skipped += 1,
            EventOutcome::CookiesImported(summary) => {
                self.cookies_stored += summary.stored;
                self.cookies_failed += summary.failed;
            }
            EventOutcome::ImportFinished {
                toolbar_enabled, ..
            } => {
                self.finished = true;
                self.toolbar_enabled |= toolbar_enabled;
            }
            EventOutcome::ImportDismissed => self.dismissed = true,
            EventOutcome::WarningShown(_) => {}
            EventOutcome::Ignored => self.ignored.push(event.to_string()),
        }
    }

    pub fn events_handled(&self) -> usize {
        self.events_handled
    }

    /// Whether the importer reported success.
    pub fn completed(&self) -> bool {
        self.finished
    }

    pub fn format(&self, detailed: bool) -> String {
        let mut output = String::new();

        output.push_str("\n📥 Import Report\n");
        output.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");

        output.push_str(&format!("  • Events handled: {}\n", self.events_handled));
        if detailed {
            output.push_str(&format!("  • Browsers announced: {}\n", self.browsers_announced));
        }
        output.push_str(&format!("  • History entries: {}\n", self.history_added));
        output.push_str(&format!(
            "  • Bookmarks: {} in {} folders\n",
            self.bookmarks_added, self.folders_added
        ));
        output.push_str(&format!("  • Favicons attached: {}\n", self.favicons_patched));
        output.push_str(&format!(
            "  • Cookies: {} stored, {} failed\n",
            self.cookies_stored, self.cookies_failed
        ));
        output.push('\n');

        if self.bookmark_batches_rejected > 0 {
            output.push_str(&format!(
                "❌ {} bookmark batches were rejected: no folder ids left\n\n",
                self.bookmark_batches_rejected
            ));
        }

        if self.favicon_batches_skipped > 0 {
            output.push_str(&format!(
                "⚠️  {} favicon batches arrived before any bookmarks and were skipped\n\n",
                self.favicon_batches_skipped
            ));
        }

        if detailed && !self.ignored.is_empty() {
            output.push_str("ℹ️  Ignored events:\n");
            for event in &self.ignored {
                output.push_str(&format!("  • {}\n", event));
            }
            output.push('\n');
        }

        output.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");

        let status = if self.finished {
            "✅ Import finished"
        } else if self.dismissed {
            "❌ Import dismissed"
        } else {
            "⚠️  Import did not report completion"
        };
        output.push_str(&format!("\n📊 Summary: {}", status));
        if self.toolbar_enabled {
            output.push_str(" (bookmarks toolbar turned on)");
        }
        output.push_str("\n\n");

        output
    }
}

#[cfg(test)]
impl ImportReport {
    pub fn bookmarks(&self) -> usize {
        self.bookmarks_added
    }

    pub fn toolbar_enabled(&self) -> bool {
        self.toolbar_enabled
    }
}
