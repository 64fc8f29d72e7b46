//! momo-core: transaction model, aggregation and filtering for MoMo notification logs

pub mod filter;
pub mod money;
pub mod summary;
pub mod transaction;

pub use filter::TypeFilter;
pub use money::{format_amount, format_signed, group_thousands};
pub use summary::{sort_newest_first, Summary};
pub use transaction::{Transaction, TxnKind};

/// The single currency unit used by MoMo notifications
pub const CURRENCY: &str = "RWF";

/// A transaction type name that is not one of the known kinds
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown transaction type '{0}' (expected all, received, sent, airtime or bundles)")]
pub struct UnknownKind(pub String);
