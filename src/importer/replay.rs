//! Importer capability that replays a recorded event stream.
//!
//! A recording is a JSON-lines file with one [`ImporterEvent`] per line.
//! Blank lines and lines starting with `#` are ignored. `initialize`
//! announces the recorded browser list; `import_data` emits the remaining
//! events that the selection asks for.

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info};

use super::{ImportSelection, ImporterCapability, ImporterEvent};
use crate::errors::ReplayError;

/// Parses a JSON-lines recording.
pub fn read_recording(path: &Path) -> Result<Vec<ImporterEvent>, ReplayError> {
    let content = fs::read_to_string(path).map_err(|source| ReplayError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut events = Vec::new();
    for (i, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let event = serde_json::from_str(line).map_err(|source| ReplayError::Parse {
            path: path.to_path_buf(),
            line: i + 1,
            source,
        })?;
        events.push(event);
    }

    debug!("Read {} events from {:?}", events.len(), path);
    Ok(events)
}

/// Whether `event` carries data the user selected for import.
pub fn selected(selection: &ImportSelection, event: &ImporterEvent) -> bool {
    match event {
        ImporterEvent::AddHistoryPage { .. } => selection.history,
        ImporterEvent::AddBookmarks { .. } | ImporterEvent::AddFavicons { .. } => {
            selection.favorites
        }
        ImporterEvent::AddCookies { .. } => selection.cookies,
        ImporterEvent::AddHomepage { .. } => selection.homepage,
        ImporterEvent::AddKeywords { .. } => selection.search,
        ImporterEvent::AddAutofillFormDataEntries { .. } => selection.autofilldata,
        ImporterEvent::UpdateSupportedBrowsers { .. } => false,
        ImporterEvent::ImportSuccess
        | ImporterEvent::ImportDismiss
        | ImporterEvent::ShowWarningDialog => true,
    }
}

pub struct ReplayImporter {
    recording: PathBuf,
    events: UnboundedSender<ImporterEvent>,
    sent: usize,
}

impl ReplayImporter {
    pub fn new(recording: PathBuf, events: UnboundedSender<ImporterEvent>) -> Self {
        Self {
            recording,
            events,
            sent: 0,
        }
    }

    /// Number of events pushed onto the channel so far.
    pub fn sent(&self) -> usize {
        self.sent
    }

    fn emit(&self, event: ImporterEvent) -> Result<(), ReplayError> {
        self.events.send(event).map_err(|_| ReplayError::ChannelClosed)
    }

    fn emit_matching<F>(&self, path: &Path, keep: F) -> Result<usize>
    where
        F: Fn(&ImporterEvent) -> bool,
    {
        let mut sent = 0;
        for event in read_recording(path)? {
            if keep(&event) {
                self.emit(event)?;
                sent += 1;
            }
        }
        Ok(sent)
    }
}

impl ImporterCapability for ReplayImporter {
    fn initialize(&mut self) -> Result<()> {
        let sent = self.emit_matching(&self.recording, |event| {
            matches!(event, ImporterEvent::UpdateSupportedBrowsers { .. })
        })?;
        self.sent += sent;
        debug!("Announced {} browser lists", sent);
        Ok(())
    }

    fn import_data(&mut self, selection: &ImportSelection) -> Result<()> {
        let sent = self.emit_matching(&self.recording, |event| selected(selection, event))?;
        self.sent += sent;
        info!("📥 Replaying {} importer events from {:?}", sent, self.recording);
        Ok(())
    }

    fn import_html(&mut self, path: &Path) -> Result<()> {
        let sent = self.emit_matching(path, |event| {
            matches!(
                event,
                ImporterEvent::AddBookmarks { .. }
                    | ImporterEvent::AddFavicons { .. }
                    | ImporterEvent::ImportSuccess
                    | ImporterEvent::ImportDismiss
            )
        })?;
        self.sent += sent;
        info!("📥 Replaying {} bookmark events from {:?}", sent, path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    const RECORDING: &str = r#"
# recorded from a Chrome profile
{"event":"update-supported-browsers","browsers":[{"index":0,"name":"Chrome","type":"Chrome","favorites":true,"history":true}]}
{"event":"add-history-page","history":[{"title":"A","url":"https://a.example/","last_visit":1}]}
{"event":"add-bookmarks","top_level_folder":"Imported from Chrome","bookmarks":[]}
{"event":"add-cookies","cookies":[]}
{"event":"import-success"}
"#;

    fn write_recording(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("events.jsonl");
        fs::write(&path, RECORDING).unwrap();
        path
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<ImporterEvent>) -> Vec<&'static str> {
        let mut names = Vec::new();
        while let Ok(event) = rx.try_recv() {
            names.push(event.name());
        }
        names
    }

    #[test]
    fn test_read_recording_skips_comments() {
        let dir = tempfile::tempdir().unwrap();
        let events = read_recording(&write_recording(&dir)).unwrap();
        assert_eq!(events.len(), 5);
    }

    #[test]
    fn test_read_recording_reports_bad_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.jsonl");
        fs::write(&path, "{\"event\":\"import-success\"}\n{\"event\":\"nope\"}\n").unwrap();
        match read_recording(&path) {
            Err(ReplayError::Parse { line, .. }) => assert_eq!(line, 2),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_initialize_then_import_selected() {
        let dir = tempfile::tempdir().unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut importer = ReplayImporter::new(write_recording(&dir), tx);

        importer.initialize().unwrap();
        assert_eq!(drain(&mut rx), vec!["update-supported-browsers"]);

        let selection = ImportSelection {
            favorites: true,
            ..Default::default()
        };
        importer.import_data(&selection).unwrap();
        assert_eq!(drain(&mut rx), vec!["add-bookmarks", "import-success"]);
        assert_eq!(importer.sent(), 3);
    }

    #[test]
    fn test_closed_channel_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let mut importer = ReplayImporter::new(write_recording(&dir), tx);
        assert!(importer.initialize().is_err());
    }
}
