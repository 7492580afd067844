use serde::{Deserialize, Serialize};

/// Countries where funds can be added through Coinbase.
pub const COINBASE_COUNTRIES: &[&str] = &[
    "AT", "AU", "BE", "BG", "CA", "CH", "CY", "CZ", "DE", "DK", "EE", "ES", "FI", "FR", "GB", "GR",
    "HR", "HU", "IE", "IT", "LT", "LU", "LV", "MT", "NL", "NO", "PL", "PT", "RO", "SE", "SG", "SI",
    "SK", "US",
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerTransaction {
    #[serde(default)]
    pub viewing_id: String,
    #[serde(default)]
    pub submission_stamp: i64,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub currency: String,
}

/// Wallet state as the ledger reports it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LedgerData {
    pub created: bool,
    pub creating: bool,
    pub transactions: Vec<LedgerTransaction>,
    pub reconcile_stamp: Option<i64>,
    pub country_code: Option<String>,
}

impl LedgerData {
    /// A created wallet that has reconciled at least one transaction.
    pub fn has_wallet_transaction(&self) -> bool {
        self.created
            && !self.creating
            && !self.transactions.is_empty()
            && self.reconcile_stamp.is_some()
    }

    pub fn in_coinbase_country(&self) -> bool {
        self.country_code
            .as_deref()
            .is_some_and(|code| COINBASE_COUNTRIES.contains(&code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transacting() -> LedgerData {
        LedgerData {
            created: true,
            creating: false,
            transactions: vec![LedgerTransaction::default()],
            reconcile_stamp: Some(1),
            country_code: Some("US".to_string()),
        }
    }

    #[test]
    fn test_has_wallet_transaction() {
        assert!(transacting().has_wallet_transaction());

        let mut ledger = transacting();
        ledger.creating = true;
        assert!(!ledger.has_wallet_transaction());

        let mut ledger = transacting();
        ledger.transactions.clear();
        assert!(!ledger.has_wallet_transaction());

        let mut ledger = transacting();
        ledger.reconcile_stamp = None;
        assert!(!ledger.has_wallet_transaction());

        assert!(!LedgerData::default().has_wallet_transaction());
    }

    #[test]
    fn test_coinbase_country() {
        assert!(transacting().in_coinbase_country());
        let ledger = LedgerData {
            country_code: Some("BR".to_string()),
            ..Default::default()
        };
        assert!(!ledger.in_coinbase_country());
        assert!(!LedgerData::default().in_coinbase_country());
    }

    #[test]
    fn test_parse_camel_case() {
        let ledger: LedgerData =
            serde_json::from_str(r#"{"created":true,"reconcileStamp":5,"countryCode":"GB"}"#)
                .unwrap();
        assert!(ledger.created);
        assert_eq!(ledger.reconcile_stamp, Some(5));
        assert!(ledger.transactions.is_empty());
    }
}
