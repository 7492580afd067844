//! Site records as the application store models them.
//!
//! Bookmarks, bookmark folders and history entries all live in one flat
//! collection. Folders are linked through `parent_folder_id` references
//! rather than nesting, with folder id `0` standing for the root.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::OnceLock;

use crate::errors::FolderIdsExhausted;

/// Folder identifier in the site collection. `0` is the root.
pub type FolderId = i64;

pub const ROOT_FOLDER_ID: FolderId = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SiteTag {
    Bookmark,
    BookmarkFolder,
}

/// Favicon attached to a site record.
///
/// The importer synthesizes placeholder icons for sites it has no real icon
/// for; those may later be superseded by a real one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "kebab-case")]
pub enum Favicon {
    Remote(String),
    Placeholder(String),
}

impl Favicon {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Favicon::Placeholder(_))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<FolderId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_folder_id: Option<FolderId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_accessed_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<SiteTag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favicon: Option<Favicon>,
}

impl Site {
    /// Folder record.
    pub fn folder(
        title: &str,
        folder_id: FolderId,
        parent_folder_id: FolderId,
        creation_time: i64,
    ) -> Self {
        Self {
            custom_title: Some(title.to_string()),
            folder_id: Some(folder_id),
            parent_folder_id: Some(parent_folder_id),
            last_accessed_time: Some(0),
            creation_time: Some(creation_time),
            tags: vec![SiteTag::BookmarkFolder],
            ..Default::default()
        }
    }

    /// Leaf bookmark record.
    pub fn bookmark(
        title: &str,
        location: &str,
        parent_folder_id: FolderId,
        creation_time: i64,
    ) -> Self {
        Self {
            title: Some(title.to_string()),
            custom_title: Some(title.to_string()),
            location: Some(location.to_string()),
            parent_folder_id: Some(parent_folder_id),
            last_accessed_time: Some(0),
            creation_time: Some(creation_time),
            tags: vec![SiteTag::Bookmark],
            ..Default::default()
        }
    }

    /// Untagged history record.
    pub fn history(title: &str, location: &str, last_accessed_time: i64) -> Self {
        Self {
            title: Some(title.to_string()),
            location: Some(location.to_string()),
            last_accessed_time: Some(last_accessed_time),
            ..Default::default()
        }
    }

    pub fn is_bookmark(&self) -> bool {
        self.tags.contains(&SiteTag::Bookmark)
    }

    pub fn is_folder(&self) -> bool {
        self.tags.contains(&SiteTag::BookmarkFolder)
    }

    /// Display title of a folder, falling back to the page title.
    pub fn folder_title(&self) -> Option<&str> {
        self.custom_title.as_deref().or(self.title.as_deref())
    }

    /// Identity used when merging records into the collection.
    ///
    /// Folders are identified by their id; everything else by location and
    /// the folder it sits in.
    pub fn key(&self) -> String {
        match self.folder_id {
            Some(id) if self.is_folder() => format!("folder|{}", id),
            _ => format!(
                "{}|{}",
                self.location.as_deref().unwrap_or(""),
                self.parent_folder_id.unwrap_or(ROOT_FOLDER_ID)
            ),
        }
    }

    /// Overwrites fields present in `other`; tags are unioned.
    pub fn merge_from(&mut self, other: &Site) {
        if other.title.is_some() {
            self.title = other.title.clone();
        }
        if other.custom_title.is_some() {
            self.custom_title = other.custom_title.clone();
        }
        if other.location.is_some() {
            self.location = other.location.clone();
        }
        if other.folder_id.is_some() {
            self.folder_id = other.folder_id;
        }
        if other.parent_folder_id.is_some() {
            self.parent_folder_id = other.parent_folder_id;
        }
        if other.last_accessed_time.is_some() {
            self.last_accessed_time = other.last_accessed_time;
        }
        if other.creation_time.is_some() {
            self.creation_time = other.creation_time;
        }
        if other.favicon.is_some() {
            self.favicon = other.favicon.clone();
        }
        for tag in &other.tags {
            if !self.tags.contains(tag) {
                self.tags.push(*tag);
            }
        }
    }
}

/// Whether the collection holds any bookmark or bookmark folder.
pub fn has_bookmarks(sites: &[Site]) -> bool {
    sites.iter().any(|site| site.is_bookmark() || site.is_folder())
}

/// The next unused folder id: one past the largest folder id in `sites`.
pub fn next_folder_id(sites: &[Site]) -> Result<FolderId, FolderIdsExhausted> {
    let last = sites
        .iter()
        .filter(|site| site.is_folder())
        .filter_map(|site| site.folder_id)
        .max()
        .unwrap_or(ROOT_FOLDER_ID);
    last.checked_add(1).ok_or(FolderIdsExhausted { last })
}

fn numbered_title() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(.*) \((\d+)\)$").expect("static regex"))
}

/// Returns `name`, or the first of `name (1)`, `name (2)`, ... that no
/// existing folder uses.
pub fn next_folder_name(sites: &[Site], name: &str) -> String {
    let taken: HashSet<&str> = sites
        .iter()
        .filter(|site| site.is_folder())
        .filter_map(|site| site.folder_title())
        .collect();

    let mut candidate = name.to_string();
    while taken.contains(candidate.as_str()) {
        candidate = match numbered_title().captures(&candidate) {
            Some(caps) => {
                let base = caps.get(1).map_or("", |m| m.as_str());
                let n: u64 = caps[2].parse().unwrap_or(0);
                format!("{} ({})", base, n + 1)
            }
            None => format!("{} (1)", candidate),
        };
    }
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_folder_id_empty_store() {
        assert_eq!(next_folder_id(&[]), Ok(1));
    }

    #[test]
    fn test_next_folder_id_at_max() {
        let sites = vec![Site::folder("Last", FolderId::MAX, 0, 0)];
        assert_eq!(
            next_folder_id(&sites),
            Err(FolderIdsExhausted {
                last: FolderId::MAX
            })
        );
    }

    #[test]
    fn test_next_folder_id_ignores_non_folders() {
        let sites = vec![
            Site::folder("Work", 4, 0, 0),
            Site::folder("Home", 9, 0, 0),
            Site::bookmark("Example", "https://example.com", 9, 0),
        ];
        assert_eq!(next_folder_id(&sites), Ok(10));
    }

    #[test]
    fn test_next_folder_name_unused() {
        let sites = vec![Site::folder("Work", 1, 0, 0)];
        assert_eq!(next_folder_name(&sites, "Imported from Chrome"), "Imported from Chrome");
    }

    #[test]
    fn test_next_folder_name_increments() {
        let sites = vec![
            Site::folder("Imported", 1, 0, 0),
            Site::folder("Imported (1)", 2, 0, 0),
            Site::folder("Imported (2)", 3, 0, 0),
        ];
        assert_eq!(next_folder_name(&sites, "Imported"), "Imported (3)");
    }

    #[test]
    fn test_next_folder_name_ignores_bookmark_titles() {
        let sites = vec![Site::bookmark("Imported", "https://example.com", 0, 0)];
        assert_eq!(next_folder_name(&sites, "Imported"), "Imported");
    }

    #[test]
    fn test_key_and_merge() {
        let mut site = Site::bookmark("Example", "https://example.com", 3, 1000);
        let mut patch = site.clone();
        patch.favicon = Some(Favicon::Remote("https://example.com/favicon.ico".to_string()));
        assert_eq!(site.key(), patch.key());

        site.merge_from(&patch);
        assert_eq!(
            site.favicon,
            Some(Favicon::Remote("https://example.com/favicon.ico".to_string()))
        );
        assert_eq!(site.tags, vec![SiteTag::Bookmark]);
    }

    #[test]
    fn test_serialized_shape() {
        let site = Site::folder("Work", 2, 1, 0);
        let json = serde_json::to_value(&site).unwrap();
        assert_eq!(json["customTitle"], "Work");
        assert_eq!(json["folderId"], 2);
        assert_eq!(json["parentFolderId"], 1);
        assert_eq!(json["tags"][0], "bookmark-folder");
        assert!(json.get("location").is_none());
    }

    #[test]
    fn test_has_bookmarks() {
        assert!(!has_bookmarks(&[Site::history("a", "https://a", 1)]));
        assert!(has_bookmarks(&[Site::folder("a", 1, 0, 0)]));
    }
}
