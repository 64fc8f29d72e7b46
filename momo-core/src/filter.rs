//! Type filter applied by presentation layers to the transaction list

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::transaction::{Transaction, TxnKind};
use crate::UnknownKind;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TypeFilter {
    #[default]
    All,
    Only(TxnKind),
}

impl TypeFilter {
    pub fn matches(&self, txn: &Transaction) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Only(kind) => txn.kind == *kind,
        }
    }

    /// Matching transactions, in their original relative order
    pub fn apply<'a>(&self, txns: &'a [Transaction]) -> Vec<&'a Transaction> {
        txns.iter().filter(|t| self.matches(t)).collect()
    }
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeFilter::All => f.write_str("all"),
            TypeFilter::Only(kind) => fmt::Display::fmt(kind, f),
        }
    }
}

impl FromStr for TypeFilter {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(TypeFilter::All);
        }
        s.parse().map(TypeFilter::Only)
    }
}

impl TryFrom<String> for TypeFilter {
    type Error = UnknownKind;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<TypeFilter> for String {
    fn from(f: TypeFilter) -> Self {
        f.to_string()
    }
}
