//! Preferences panels as view models.
//!
//! A panel turns its inputs into a serializable view description and routes
//! user interaction to [`PanelActions`]; drawing is left to the host.

pub mod ledger;
pub mod payments;

use serde::Serialize;
use serde_json::Value;

use crate::settings::Settings;

/// Overlay dialogs the preferences page can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Overlay {
    AddFunds,
    Bitcoin,
    Qrcode,
    PaymentHistory,
    AdvancedSettings,
    LedgerBackup,
    LedgerRecovery,
}

impl Overlay {
    pub fn name(&self) -> &'static str {
        match self {
            Overlay::AddFunds => "addFunds",
            Overlay::Bitcoin => "bitcoin",
            Overlay::Qrcode => "qrcode",
            Overlay::PaymentHistory => "paymentHistory",
            Overlay::AdvancedSettings => "advancedSettings",
            Overlay::LedgerBackup => "ledgerBackup",
            Overlay::LedgerRecovery => "ledgerRecovery",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "addFunds" => Some(Overlay::AddFunds),
            "bitcoin" => Some(Overlay::Bitcoin),
            "qrcode" => Some(Overlay::Qrcode),
            "paymentHistory" => Some(Overlay::PaymentHistory),
            "advancedSettings" => Some(Overlay::AdvancedSettings),
            "ledgerBackup" => Some(Overlay::LedgerBackup),
            "ledgerRecovery" => Some(Overlay::LedgerRecovery),
            _ => None,
        }
    }
}

/// Callbacks a panel delegates to. The page owning the overlay flags and
/// the settings store implements these.
pub trait PanelActions {
    fn show_overlay(&mut self, overlay: Overlay);
    fn hide_overlay(&mut self, overlay: Overlay);
    fn hide_advanced_overlays(&mut self);
    fn change_setting(&mut self, key: &str, value: Value);
}

/// A checkbox-style switch bound to a boolean setting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingSwitch {
    pub pref_key: &'static str,
    pub l10n_id: &'static str,
    pub checked: bool,
    pub disabled: bool,
}

impl SettingSwitch {
    pub fn new(settings: &Settings, pref_key: &'static str, l10n_id: &'static str) -> Self {
        Self {
            pref_key,
            l10n_id,
            checked: settings.get_bool(pref_key),
            disabled: false,
        }
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Flips the bound setting unless the switch is disabled.
    pub fn toggle(&self, actions: &mut dyn PanelActions) -> bool {
        if self.disabled {
            return false;
        }
        actions.change_setting(self.pref_key, Value::Bool(!self.checked));
        true
    }
}
