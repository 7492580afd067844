//! Favicon patching for previously imported bookmark records.

use std::collections::HashMap;

use super::FaviconEntry;
use crate::sites::{Favicon, Site};

/// Substring the importer puts in the id of icons it synthesized itself.
pub const PLACEHOLDER_MARKER: &str = "made-up-favicon";

/// Maps each covered page URL to the favicon the batch supplies for it.
///
/// Later entries win when two entries cover the same URL.
pub fn build_favicon_map(entries: &[FaviconEntry]) -> HashMap<String, Favicon> {
    let mut map = HashMap::new();
    for entry in entries {
        let favicon = if entry.favicon_url.contains(PLACEHOLDER_MARKER) {
            Favicon::Placeholder(
                entry
                    .png_data
                    .clone()
                    .unwrap_or_else(|| entry.favicon_url.clone()),
            )
        } else {
            Favicon::Remote(entry.favicon_url.clone())
        };

        for url in &entry.urls {
            map.insert(url.clone(), favicon.clone());
        }
    }
    map
}

/// Applies a favicon batch to `sites`, returning how many records changed.
///
/// A record takes the batch's favicon for its location when it has none
/// yet or only holds a placeholder.
pub fn apply_favicons(sites: &mut [Site], entries: &[FaviconEntry]) -> usize {
    let map = build_favicon_map(entries);
    let mut patched = 0;

    for site in sites.iter_mut() {
        let Some(location) = site.location.as_deref() else {
            continue;
        };
        let Some(favicon) = map.get(location) else {
            continue;
        };

        let replaceable = site.favicon.as_ref().map_or(true, Favicon::is_placeholder);
        if replaceable && site.favicon.as_ref() != Some(favicon) {
            site.favicon = Some(favicon.clone());
            patched += 1;
        }
    }

    patched
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn favicon_entry() -> impl Strategy<Value = FaviconEntry> {
        (
            any::<bool>(),
            "[a-z]{1,6}",
            prop::collection::vec(0usize..5, 1..4),
        )
            .prop_map(|(made_up, name, hosts)| FaviconEntry {
                favicon_url: if made_up {
                    format!("{}-{}", PLACEHOLDER_MARKER, name)
                } else {
                    format!("https://{}.example/favicon.ico", name)
                },
                urls: hosts
                    .into_iter()
                    .map(|h| format!("https://site{}.example/", h))
                    .collect(),
                png_data: if made_up { Some(name) } else { None },
            })
    }

    fn sites() -> Vec<Site> {
        (0..5)
            .map(|h| Site::bookmark("t", &format!("https://site{}.example/", h), 1, 0))
            .collect()
    }

    proptest! {
        #[test]
        fn prop_reapplying_batch_is_idempotent(
            batch in prop::collection::vec(favicon_entry(), 0..6),
        ) {
            let mut once = sites();
            apply_favicons(&mut once, &batch);
            let mut twice = once.clone();
            let patched = apply_favicons(&mut twice, &batch);

            prop_assert_eq!(patched, 0);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_real_icons_survive_any_later_batch(
            first in prop::collection::vec(favicon_entry(), 0..6),
            second in prop::collection::vec(favicon_entry(), 0..6),
        ) {
            let mut sites = sites();
            apply_favicons(&mut sites, &first);
            let before = sites.clone();
            apply_favicons(&mut sites, &second);

            for (old, new) in before.iter().zip(&sites) {
                if let Some(Favicon::Remote(_)) = &old.favicon {
                    prop_assert_eq!(&old.favicon, &new.favicon);
                }
            }
        }
    }
}
