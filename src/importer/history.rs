use super::ImportedHistoryEntry;
use crate::sites::Site;

/// Converts imported history pages into history site records.
///
/// `last_visit` is in seconds; the store keeps milliseconds.
pub fn convert_history(history: &[ImportedHistoryEntry]) -> Vec<Site> {
    history
        .iter()
        .map(|entry| {
            Site::history(
                &entry.title,
                &entry.url,
                entry.last_visit.saturating_mul(1000),
            )
        })
        .collect()
}
