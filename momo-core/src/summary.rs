//! Aggregate statistics over a batch of transactions.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::transaction::{Transaction, TxnKind};

/// Totals and latest balance for a parsed batch
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Summary {
    pub total_received: u64,
    /// Transfers plus airtime and bundle purchases
    pub total_sent: u64,
    pub received_count: usize,
    /// Transfers only; purchases add to `total_sent` but are not counted here
    pub sent_count: usize,
    pub transaction_count: usize,
    /// Balance reported by the chronologically latest transaction that stated one
    pub current_balance: Option<u64>,
    /// Timestamp of the transaction that set `current_balance`
    pub last_update: Option<NaiveDateTime>,
}

impl Summary {
    /// Fold transactions given in input order.
    ///
    /// On equal timestamps the first transaction in input order keeps the balance.
    pub fn from_transactions<'a>(txns: impl IntoIterator<Item = &'a Transaction>) -> Self {
        let mut summary = Summary::default();
        for txn in txns {
            summary.record(txn);
        }
        summary
    }

    fn record(&mut self, txn: &Transaction) {
        self.transaction_count += 1;

        match txn.kind {
            TxnKind::Received => {
                self.total_received = self.total_received.saturating_add(txn.amount);
                self.received_count += 1;
            }
            TxnKind::Sent => {
                self.total_sent = self.total_sent.saturating_add(txn.amount);
                self.sent_count += 1;
            }
            TxnKind::Airtime | TxnKind::Bundles => {
                self.total_sent = self.total_sent.saturating_add(txn.amount);
            }
        }

        let Some(balance) = txn.balance else {
            return;
        };
        let at = txn.timestamp();
        if self.last_update.is_none_or(|last| at > last) {
            tracing::trace!(%at, balance, "current balance updated");
            self.current_balance = Some(balance);
            self.last_update = Some(at);
        }
    }

    /// Received minus spent over the batch (can be negative)
    pub fn net_flow(&self) -> i128 {
        i128::from(self.total_received) - i128::from(self.total_sent)
    }
}

/// Stable sort, newest first. Equal timestamps keep their input order.
pub fn sort_newest_first(txns: &mut [Transaction]) {
    txns.sort_by(|a, b| b.timestamp().cmp(&a.timestamp()));
}
