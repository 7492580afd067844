//! Flattening of imported bookmark trees into folder/leaf site records.
//!
//! The importer hands over a flat list where every entry carries the names
//! of its ancestor folders. The store wants a flat list where every entry
//! points at its parent by id, so folders are materialized on demand while
//! walking the list.

use std::collections::HashMap;
use tracing::debug;

use super::ImportedBookmark;
use crate::errors::FolderIdsExhausted;
use crate::sites::{next_folder_id, next_folder_name, FolderId, Site, ROOT_FOLDER_ID};

/// Folder allocation state for one bookmark batch.
#[derive(Debug)]
pub struct FolderAllocator {
    top_level_folder_id: FolderId,
    /// `None` once `FolderId::MAX` has been handed out.
    next_id: Option<FolderId>,
    by_name: HashMap<String, FolderId>,
}

impl FolderAllocator {
    pub fn new(top_level_folder_id: FolderId) -> Self {
        Self {
            top_level_folder_id,
            next_id: top_level_folder_id.checked_add(1),
            by_name: HashMap::new(),
        }
    }

    pub fn top_level_folder_id(&self) -> FolderId {
        self.top_level_folder_id
    }

    fn allocate(&mut self) -> Result<FolderId, FolderIdsExhausted> {
        let id = self.next_id.ok_or(FolderIdsExhausted {
            last: FolderId::MAX,
        })?;
        self.next_id = id.checked_add(1);
        Ok(id)
    }

    /// Allocates an id for a folder named `name` and makes it the target
    /// for later entries whose path mentions that name.
    pub fn register(&mut self, name: &str) -> Result<FolderId, FolderIdsExhausted> {
        let id = self.allocate()?;
        self.by_name.insert(name.to_string(), id);
        Ok(id)
    }

    /// Id of the immediate parent folder for an entry whose ancestors are
    /// `path` (outermost first).
    ///
    /// Ancestors that have not been seen yet are created, deepest first,
    /// and appended to `sites` after their own parents. A new folder's name
    /// is only registered once its record is emitted, so a path that repeats
    /// a name never yields a folder that is its own parent.
    pub fn resolve_parent(
        &mut self,
        path: &[String],
        sites: &mut Vec<Site>,
    ) -> Result<FolderId, FolderIdsExhausted> {
        let Some((name, ancestors)) = path.split_last() else {
            return Ok(self.top_level_folder_id);
        };

        if let Some(&id) = self.by_name.get(name) {
            return Ok(id);
        }

        let id = self.allocate()?;
        let parent_id = self.resolve_parent(ancestors, sites)?;
        sites.push(Site::folder(name, id, parent_id, 0));
        // Registering before the recursive call would let an ancestor with
        // the same name resolve to this folder.
        self.by_name.insert(name.clone(), id);
        Ok(id)
    }
}

/// Converts one `add-bookmarks` payload into site records.
///
/// The first record is always the top-level import folder; its id is the
/// store's next free folder id and its title is made unique among existing
/// folders. `now_ms` becomes that folder's creation time.
///
/// Fails without producing any records when the batch needs a folder id
/// past `FolderId::MAX`.
pub fn convert_bookmarks(
    existing: &[Site],
    bookmarks: &[ImportedBookmark],
    top_level_folder: &str,
    now_ms: i64,
) -> Result<Vec<Site>, FolderIdsExhausted> {
    let mut allocator = FolderAllocator::new(next_folder_id(existing)?);
    let mut sites = Vec::with_capacity(bookmarks.len() + 1);

    sites.push(Site::folder(
        &next_folder_name(existing, top_level_folder),
        allocator.top_level_folder_id(),
        ROOT_FOLDER_ID,
        now_ms,
    ));

    for bookmark in bookmarks {
        let parent_id = allocator.resolve_parent(&bookmark.path, &mut sites)?;
        let creation_time = bookmark.creation_time.saturating_mul(1000);

        if bookmark.is_folder {
            let folder_id = allocator.register(&bookmark.title)?;
            sites.push(Site::folder(&bookmark.title, folder_id, parent_id, creation_time));
        } else {
            sites.push(Site::bookmark(
                &bookmark.title,
                bookmark.url.as_deref().unwrap_or_default(),
                parent_id,
                creation_time,
            ));
        }
    }

    debug!(
        "Converted {} imported bookmarks into {} site records",
        bookmarks.len(),
        sites.len()
    );
    Ok(sites)
}
