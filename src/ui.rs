//! Terminal stand-in for the browser window used by the CLI.

use tracing::info;

use crate::bridge::{MessageBox, TabId, UiHost};
use crate::importer::BrowserProfile;

pub struct ConsoleUi {
    active_tab: Option<TabId>,
    quiet: bool,
}

impl ConsoleUi {
    pub fn new(active_tab: Option<TabId>, quiet: bool) -> Self {
        Self { active_tab, quiet }
    }
}

impl UiHost for ConsoleUi {
    fn send_importer_list(&mut self, browsers: &[BrowserProfile]) -> bool {
        info!("🌐 Importable browsers:");
        for browser in browsers {
            let mut kinds = Vec::new();
            if browser.favorites {
                kinds.push("bookmarks");
            }
            if browser.history {
                kinds.push("history");
            }
            if browser.cookies {
                kinds.push("cookies");
            }
            info!("  • [{}] {} ({})", browser.index, browser.name, kinds.join(", "));
        }
        true
    }

    fn active_tab_id(&self) -> Option<TabId> {
        self.active_tab
    }

    fn show_message_box(&mut self, tab_id: TabId, message: MessageBox) {
        if self.quiet {
            return;
        }
        println!(
            "[tab {}] {}: {} [{}]",
            tab_id,
            message.title,
            message.message,
            message.buttons.join(" | ")
        );
    }
}
