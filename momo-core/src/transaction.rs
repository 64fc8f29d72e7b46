//! Transaction record types extracted from MoMo notifications

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::UnknownKind;

/// Kind of mobile-money movement a notification describes
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TxnKind {
    #[serde(rename = "received")]
    Received,
    #[serde(rename = "sent")]
    Sent,
    #[serde(rename = "airtime")]
    Airtime,
    #[serde(rename = "bundles")]
    Bundles,
}

impl TxnKind {
    pub const ALL: [TxnKind; 4] = [
        TxnKind::Received,
        TxnKind::Sent,
        TxnKind::Airtime,
        TxnKind::Bundles,
    ];

    /// Lower-case identifier, as used in filters and serialized output
    pub fn as_str(&self) -> &'static str {
        match self {
            TxnKind::Received => "received",
            TxnKind::Sent => "sent",
            TxnKind::Airtime => "airtime",
            TxnKind::Bundles => "bundles",
        }
    }

    /// Human-readable name for tables
    pub fn label(&self) -> &'static str {
        match self {
            TxnKind::Received => "Money Received",
            TxnKind::Sent => "Money Sent",
            TxnKind::Airtime => "Airtime Purchase",
            TxnKind::Bundles => "Data Bundle",
        }
    }

    /// Money coming into the wallet. Everything else counts as spending.
    pub fn is_inflow(&self) -> bool {
        matches!(self, TxnKind::Received)
    }
}

impl fmt::Display for TxnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TxnKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        TxnKind::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}

/// A single transaction recovered from a notification message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Transaction {
    /// Calendar date of the message carrying the notification
    pub date: NaiveDate,
    /// Clock time of the message, when the export included one
    pub time: Option<NaiveTime>,
    pub kind: TxnKind,
    /// Whole RWF, fee included for transfers
    pub amount: u64,
    /// Counterparty or purchase description
    pub details: String,
    /// Wallet balance reported by the notification; `None` when it was not stated
    pub balance: Option<u64>,
}

impl Transaction {
    pub fn new(
        date: NaiveDate,
        time: Option<NaiveTime>,
        kind: TxnKind,
        amount: u64,
        details: impl Into<String>,
        balance: Option<u64>,
    ) -> Self {
        Self {
            date,
            time,
            kind,
            amount,
            details: details.into(),
            balance,
        }
    }

    /// Point in time used for ordering. A missing time sorts at midnight.
    pub fn timestamp(&self) -> NaiveDateTime {
        self.date.and_time(self.time.unwrap_or(NaiveTime::MIN))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trips_through_str() {
        for kind in TxnKind::ALL {
            assert_eq!(kind.as_str().parse::<TxnKind>().unwrap(), kind);
        }
        assert_eq!("AIRTIME".parse::<TxnKind>().unwrap(), TxnKind::Airtime);
        assert!("other".parse::<TxnKind>().is_err());
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        let json = serde_json::to_string(&TxnKind::Bundles).unwrap();
        assert_eq!(json, "\"bundles\"");
    }

    #[test]
    fn test_only_received_is_inflow() {
        assert!(TxnKind::Received.is_inflow());
        assert!(!TxnKind::Sent.is_inflow());
        assert!(!TxnKind::Airtime.is_inflow());
        assert!(!TxnKind::Bundles.is_inflow());
    }

    #[test]
    fn test_timestamp_defaults_to_midnight() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let t = Transaction::new(date, None, TxnKind::Sent, 100, "To X", None);
        assert_eq!(t.timestamp(), date.and_hms_opt(0, 0, 0).unwrap());

        let at = NaiveTime::from_hms_opt(10, 30, 0).unwrap();
        let t = Transaction::new(date, Some(at), TxnKind::Sent, 100, "To X", None);
        assert_eq!(t.timestamp(), date.and_time(at));
    }
}
