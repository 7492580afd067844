use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::ledger::LedgerData;
use super::{Overlay, PanelActions, SettingSwitch};
use crate::settings::{Settings, AUTO_SUGGEST_SITES, PAYMENTS_ENABLED};
use crate::store::{AppAction, SiteStore};

/// Visibility of every overlay the payments page can open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OverlayFlags {
    pub add_funds: bool,
    pub bitcoin: bool,
    pub qrcode: bool,
    pub payment_history: bool,
    pub advanced_settings: bool,
    pub ledger_backup: bool,
    pub ledger_recovery: bool,
}

impl OverlayFlags {
    pub fn is_visible(&self, overlay: Overlay) -> bool {
        match overlay {
            Overlay::AddFunds => self.add_funds,
            Overlay::Bitcoin => self.bitcoin,
            Overlay::Qrcode => self.qrcode,
            Overlay::PaymentHistory => self.payment_history,
            Overlay::AdvancedSettings => self.advanced_settings,
            Overlay::LedgerBackup => self.ledger_backup,
            Overlay::LedgerRecovery => self.ledger_recovery,
        }
    }

    pub fn set(&mut self, overlay: Overlay, visible: bool) {
        let flag = match overlay {
            Overlay::AddFunds => &mut self.add_funds,
            Overlay::Bitcoin => &mut self.bitcoin,
            Overlay::Qrcode => &mut self.qrcode,
            Overlay::PaymentHistory => &mut self.payment_history,
            Overlay::AdvancedSettings => &mut self.advanced_settings,
            Overlay::LedgerBackup => &mut self.ledger_backup,
            Overlay::LedgerRecovery => &mut self.ledger_recovery,
        };
        *flag = visible;
    }
}

/// Modal overlays in the order the page stacks them.
const MODAL_ORDER: [Overlay; 5] = [
    Overlay::AddFunds,
    Overlay::PaymentHistory,
    Overlay::AdvancedSettings,
    Overlay::LedgerBackup,
    Overlay::LedgerRecovery,
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum OverlayContent {
    #[serde(rename_all = "camelCase")]
    BitcoinDashboard {
        bitcoin_visible: bool,
        qrcode_visible: bool,
    },
    History,
    AdvancedSettings,
    LedgerBackup,
    LedgerRecovery,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum OverlayFooter {
    BitcoinDashboard,
    History,
    AdvancedSettings,
    LedgerBackup,
    #[serde(rename_all = "camelCase")]
    LedgerRecovery {
        first_recovery_key: String,
        second_recovery_key: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayView {
    pub overlay: Overlay,
    pub title: &'static str,
    pub content: OverlayContent,
    pub footer: OverlayFooter,
    /// Overlay closed by the dialog's hide control.
    pub hides: Overlay,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IconView {
    pub test_id: &'static str,
    pub l10n_id: &'static str,
    pub disabled: bool,
    pub clickable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ContentPane {
    Enabled,
    Disabled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentsView {
    pub overlays: Vec<OverlayView>,
    pub payments_switch: SettingSwitch,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_suggest_switch: Option<SettingSwitch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history_icon: Option<IconView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advanced_settings_icon: Option<IconView>,
    pub content: ContentPane,
}

/// Read-only inputs of the payments tab.
#[derive(Debug, Clone, Copy)]
pub struct PaymentsProps<'a> {
    pub settings: &'a Settings,
    pub ledger: &'a LedgerData,
    pub overlays: OverlayFlags,
}

impl PaymentsProps<'_> {
    pub fn enabled(&self) -> bool {
        self.settings.get_bool(PAYMENTS_ENABLED)
    }

    pub fn wallet_created(&self) -> bool {
        self.ledger.created
    }

    pub fn has_wallet_transaction(&self) -> bool {
        self.ledger.has_wallet_transaction()
    }

    pub fn overlay_title(&self) -> &'static str {
        if self.ledger.in_coinbase_country() {
            "addFunds"
        } else {
            "addFundsAlternate"
        }
    }

    fn history_clickable(&self) -> bool {
        self.wallet_created() && self.has_wallet_transaction()
    }
}

/// Payments preferences tab. Holds only the recovery keys being typed;
/// everything else comes in through [`PaymentsProps`].
#[derive(Debug, Clone, Default)]
pub struct PaymentsTab {
    first_recovery_key: String,
    second_recovery_key: String,
}

impl PaymentsTab {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle_first_recovery_key_change(&mut self, key: impl Into<String>) {
        self.first_recovery_key = key.into();
    }

    pub fn handle_second_recovery_key_change(&mut self, key: impl Into<String>) {
        self.second_recovery_key = key.into();
    }

    pub fn render(&self, props: &PaymentsProps<'_>) -> PaymentsView {
        let enabled = props.enabled();
        let created = props.wallet_created();

        let overlays = if enabled {
            MODAL_ORDER
                .iter()
                .copied()
                .filter(|overlay| props.overlays.is_visible(*overlay))
                .map(|overlay| self.overlay_view(overlay, props))
                .collect()
        } else {
            Vec::new()
        };

        let payments_switch = SettingSwitch::new(props.settings, PAYMENTS_ENABLED, "on");

        let (auto_suggest_switch, history_icon, advanced_settings_icon) = if enabled {
            let transacting = props.has_wallet_transaction();
            (
                Some(
                    SettingSwitch::new(props.settings, AUTO_SUGGEST_SITES, "autoSuggestSites")
                        .disabled(!created),
                ),
                Some(IconView {
                    test_id: if transacting {
                        "paymentHistoryButton"
                    } else {
                        "disabledPaymentHistoryButton"
                    },
                    l10n_id: "paymentHistoryIcon",
                    disabled: !transacting,
                    clickable: props.history_clickable(),
                }),
                Some(IconView {
                    test_id: if created {
                        "advancedSettingsButton"
                    } else {
                        "advancedSettingsButtonLoading"
                    },
                    l10n_id: "advancedSettingsIcon",
                    disabled: !created,
                    clickable: created,
                }),
            )
        } else {
            (None, None, None)
        };

        PaymentsView {
            overlays,
            payments_switch,
            auto_suggest_switch,
            history_icon,
            advanced_settings_icon,
            content: if enabled {
                ContentPane::Enabled
            } else {
                ContentPane::Disabled
            },
        }
    }

    fn overlay_view(&self, overlay: Overlay, props: &PaymentsProps<'_>) -> OverlayView {
        let (title, content, footer) = match overlay {
            Overlay::AddFunds => (
                props.overlay_title(),
                OverlayContent::BitcoinDashboard {
                    bitcoin_visible: props.overlays.bitcoin,
                    qrcode_visible: props.overlays.qrcode,
                },
                OverlayFooter::BitcoinDashboard,
            ),
            Overlay::PaymentHistory => (
                "paymentHistoryTitle",
                OverlayContent::History,
                OverlayFooter::History,
            ),
            Overlay::AdvancedSettings => (
                "advancedSettingsTitle",
                OverlayContent::AdvancedSettings,
                OverlayFooter::AdvancedSettings,
            ),
            Overlay::LedgerBackup => (
                "ledgerBackupTitle",
                OverlayContent::LedgerBackup,
                OverlayFooter::LedgerBackup,
            ),
            // bitcoin and qrcode live inside the add-funds dashboard
            Overlay::LedgerRecovery | Overlay::Bitcoin | Overlay::Qrcode => (
                "ledgerRecoveryTitle",
                OverlayContent::LedgerRecovery,
                OverlayFooter::LedgerRecovery {
                    first_recovery_key: self.first_recovery_key.clone(),
                    second_recovery_key: self.second_recovery_key.clone(),
                },
            ),
        };

        OverlayView {
            overlay,
            title,
            content,
            footer,
            hides: overlay,
        }
    }

    /// Returns whether the history overlay was requested.
    pub fn click_history_icon(
        &self,
        props: &PaymentsProps<'_>,
        actions: &mut dyn PanelActions,
    ) -> bool {
        if !(props.enabled() && props.history_clickable()) {
            debug!("Payment history icon is not clickable");
            return false;
        }
        actions.show_overlay(Overlay::PaymentHistory);
        true
    }

    /// Returns whether the advanced-settings overlay was requested.
    pub fn click_advanced_settings_icon(
        &self,
        props: &PaymentsProps<'_>,
        actions: &mut dyn PanelActions,
    ) -> bool {
        if !(props.enabled() && props.wallet_created()) {
            debug!("Advanced settings icon is not clickable");
            return false;
        }
        actions.show_overlay(Overlay::AdvancedSettings);
        true
    }

    pub fn toggle_payments(&self, props: &PaymentsProps<'_>, actions: &mut dyn PanelActions) {
        SettingSwitch::new(props.settings, PAYMENTS_ENABLED, "on").toggle(actions);
    }

    pub fn toggle_auto_suggest(
        &self,
        props: &PaymentsProps<'_>,
        actions: &mut dyn PanelActions,
    ) -> bool {
        match self.render(props).auto_suggest_switch {
            Some(switch) => switch.toggle(actions),
            None => false,
        }
    }

    /// Called by the recovery content once a recovery has been submitted.
    pub fn finish_recovery(&self, actions: &mut dyn PanelActions) {
        actions.hide_advanced_overlays();
    }
}

/// The preferences page around the payments tab. Overlay flags are page
/// state; setting changes go to the store as `ChangeSetting` actions.
#[derive(Debug)]
pub struct PaymentsPage<S> {
    store: S,
    pub overlays: OverlayFlags,
}

impl<S: SiteStore> PaymentsPage<S> {
    pub fn new(store: S, overlays: OverlayFlags) -> Self {
        Self { store, overlays }
    }

    pub fn settings(&self) -> &Settings {
        self.store.settings()
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

impl<S: SiteStore> PanelActions for PaymentsPage<S> {
    fn show_overlay(&mut self, overlay: Overlay) {
        self.overlays.set(overlay, true);
    }

    fn hide_overlay(&mut self, overlay: Overlay) {
        self.overlays.set(overlay, false);
    }

    fn hide_advanced_overlays(&mut self) {
        self.overlays.advanced_settings = false;
        self.overlays.ledger_backup = false;
        self.overlays.ledger_recovery = false;
    }

    fn change_setting(&mut self, key: &str, value: Value) {
        self.store.dispatch(AppAction::ChangeSetting {
            key: key.to_string(),
            value,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preferences::ledger::LedgerTransaction;
    use crate::store::{AppState, AppStore};

    fn enabled_settings() -> Settings {
        Settings::new().with(PAYMENTS_ENABLED, Value::Bool(true))
    }

    fn transacting_ledger() -> LedgerData {
        LedgerData {
            created: true,
            creating: false,
            transactions: vec![LedgerTransaction::default()],
            reconcile_stamp: Some(1_500_000_000_000),
            country_code: Some("US".to_string()),
        }
    }

    fn all_overlays() -> OverlayFlags {
        OverlayFlags {
            add_funds: true,
            bitcoin: true,
            qrcode: false,
            payment_history: true,
            advanced_settings: true,
            ledger_backup: true,
            ledger_recovery: true,
        }
    }

    #[derive(Default)]
    struct RecordingActions {
        calls: Vec<String>,
    }

    impl PanelActions for RecordingActions {
        fn show_overlay(&mut self, overlay: Overlay) {
            self.calls.push(format!("show:{}", overlay.name()));
        }
        fn hide_overlay(&mut self, overlay: Overlay) {
            self.calls.push(format!("hide:{}", overlay.name()));
        }
        fn hide_advanced_overlays(&mut self) {
            self.calls.push("hideAdvanced".to_string());
        }
        fn change_setting(&mut self, key: &str, value: Value) {
            self.calls.push(format!("set:{}={}", key, value));
        }
    }

    #[test]
    fn test_disabled_panel_shows_only_switch() {
        let settings = Settings::new();
        let ledger = transacting_ledger();
        let props = PaymentsProps {
            settings: &settings,
            ledger: &ledger,
            overlays: all_overlays(),
        };

        let view = PaymentsTab::new().render(&props);
        assert!(view.overlays.is_empty());
        assert!(!view.payments_switch.checked);
        assert!(view.auto_suggest_switch.is_none());
        assert!(view.history_icon.is_none());
        assert!(view.advanced_settings_icon.is_none());
        assert_eq!(view.content, ContentPane::Disabled);
    }

    #[test]
    fn test_overlay_order_and_titles() {
        let settings = enabled_settings();
        let ledger = transacting_ledger();
        let props = PaymentsProps {
            settings: &settings,
            ledger: &ledger,
            overlays: all_overlays(),
        };

        let mut tab = PaymentsTab::new();
        tab.handle_first_recovery_key_change("alpha");
        tab.handle_second_recovery_key_change("beta");
        let view = tab.render(&props);

        let names: Vec<&str> = view.overlays.iter().map(|o| o.overlay.name()).collect();
        assert_eq!(
            names,
            vec![
                "addFunds",
                "paymentHistory",
                "advancedSettings",
                "ledgerBackup",
                "ledgerRecovery"
            ]
        );
        assert_eq!(view.overlays[0].title, "addFunds");
        assert_eq!(
            view.overlays[0].content,
            OverlayContent::BitcoinDashboard {
                bitcoin_visible: true,
                qrcode_visible: false
            }
        );
        assert_eq!(
            view.overlays[4].footer,
            OverlayFooter::LedgerRecovery {
                first_recovery_key: "alpha".to_string(),
                second_recovery_key: "beta".to_string()
            }
        );
        assert_eq!(view.content, ContentPane::Enabled);
    }

    #[test]
    fn test_alternate_add_funds_title() {
        let settings = enabled_settings();
        let ledger = LedgerData {
            country_code: Some("BR".to_string()),
            ..transacting_ledger()
        };
        let props = PaymentsProps {
            settings: &settings,
            ledger: &ledger,
            overlays: OverlayFlags {
                add_funds: true,
                ..Default::default()
            },
        };

        let view = PaymentsTab::new().render(&props);
        assert_eq!(view.overlays.len(), 1);
        assert_eq!(view.overlays[0].title, "addFundsAlternate");
    }

    #[test]
    fn test_icons_without_wallet() {
        let settings = enabled_settings();
        let ledger = LedgerData::default();
        let props = PaymentsProps {
            settings: &settings,
            ledger: &ledger,
            overlays: OverlayFlags::default(),
        };
        let tab = PaymentsTab::new();

        let view = tab.render(&props);
        let history = view.history_icon.unwrap();
        assert_eq!(history.test_id, "disabledPaymentHistoryButton");
        assert!(!history.clickable);
        let advanced = view.advanced_settings_icon.unwrap();
        assert_eq!(advanced.test_id, "advancedSettingsButtonLoading");
        assert!(!advanced.clickable);
        assert!(view.auto_suggest_switch.unwrap().disabled);

        let mut actions = RecordingActions::default();
        assert!(!tab.click_history_icon(&props, &mut actions));
        assert!(!tab.click_advanced_settings_icon(&props, &mut actions));
        assert!(!tab.toggle_auto_suggest(&props, &mut actions));
        assert!(actions.calls.is_empty());
    }

    #[test]
    fn test_icons_with_transacting_wallet() {
        let settings = enabled_settings();
        let ledger = transacting_ledger();
        let props = PaymentsProps {
            settings: &settings,
            ledger: &ledger,
            overlays: OverlayFlags::default(),
        };
        let tab = PaymentsTab::new();

        let view = tab.render(&props);
        assert_eq!(view.history_icon.unwrap().test_id, "paymentHistoryButton");
        assert_eq!(
            view.advanced_settings_icon.unwrap().test_id,
            "advancedSettingsButton"
        );

        let mut actions = RecordingActions::default();
        assert!(tab.click_history_icon(&props, &mut actions));
        assert!(tab.click_advanced_settings_icon(&props, &mut actions));
        assert!(tab.toggle_auto_suggest(&props, &mut actions));
        tab.toggle_payments(&props, &mut actions);
        tab.finish_recovery(&mut actions);
        assert_eq!(
            actions.calls,
            vec![
                "show:paymentHistory",
                "show:advancedSettings",
                "set:payments.auto-suggest-sites=false",
                "set:payments.enabled=false",
                "hideAdvanced",
            ]
        );
    }

    #[test]
    fn test_page_applies_actions() {
        let ledger = transacting_ledger();
        let mut page = PaymentsPage::new(AppStore::new(AppState::default()), OverlayFlags::default());
        let tab = PaymentsTab::new();

        let settings = page.settings().clone();
        let props = PaymentsProps {
            settings: &settings,
            ledger: &ledger,
            overlays: page.overlays,
        };
        tab.toggle_payments(&props, &mut page);
        assert!(page.settings().get_bool(PAYMENTS_ENABLED));

        let settings = page.settings().clone();
        let props = PaymentsProps {
            settings: &settings,
            ledger: &ledger,
            overlays: page.overlays,
        };
        assert!(tab.click_advanced_settings_icon(&props, &mut page));
        page.show_overlay(Overlay::LedgerBackup);
        assert!(page.overlays.advanced_settings);

        page.hide_advanced_overlays();
        assert!(!page.overlays.advanced_settings);
        assert!(!page.overlays.ledger_backup);

        let store = page.into_store();
        assert_eq!(store.dispatched(), 1);
    }
}
