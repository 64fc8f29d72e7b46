//! momo-ingest: turn an exported chat log into MoMo transactions and a summary.
//!
//! The pipeline is a pure function of its input: tokenize by dialect, classify
//! each message body, then aggregate.

pub mod dialect;
pub mod error;
pub mod rules;

pub use dialect::{Dialect, Message};
pub use error::ParseError;
pub use rules::{Classification, Extracted, Rules};

use chrono::{Datelike, Local};
use momo_core::{sort_newest_first, Summary, Transaction};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Fixed dialect, or `None` to probe the input
    pub dialect: Option<Dialect>,
    /// Year given to messages whose markers carry none
    pub reference_year: i32,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            dialect: None,
            reference_year: Local::now().year(),
        }
    }
}

/// Per-message bookkeeping for one parse
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseStats {
    pub messages: usize,
    pub transactions: usize,
    pub duplicates: usize,
    pub malformed: usize,
    pub unrecognized: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseOutput {
    /// Dialect used to split the input; `None` when no marker was found
    pub dialect: Option<Dialect>,
    pub stats: ParseStats,
    /// Newest first
    pub transactions: Vec<Transaction>,
    pub summary: Summary,
}

/// Parse with default options (auto-detected dialect, current year).
pub fn parse(text: &str) -> Result<ParseOutput, ParseError> {
    parse_with(text, &ParseOptions::default())
}

pub fn parse_with(text: &str, opts: &ParseOptions) -> Result<ParseOutput, ParseError> {
    if text.trim().is_empty() {
        return Err(ParseError::EmptyInput);
    }

    let dialect = match opts.dialect {
        Some(d) => Some(d),
        None => Dialect::detect(text)?,
    };
    let Some(dialect) = dialect else {
        tracing::warn!("no message timestamps found in input");
        return Ok(ParseOutput {
            dialect: None,
            stats: ParseStats::default(),
            transactions: Vec::new(),
            summary: Summary::default(),
        });
    };

    let messages = dialect.split(text, opts.reference_year)?;
    let rules = Rules::new()?;

    let mut stats = ParseStats {
        messages: messages.len(),
        ..ParseStats::default()
    };
    let mut transactions = Vec::new();

    for msg in &messages {
        match rules.classify(msg.body) {
            Classification::Transaction(found) => {
                transactions.push(Transaction::new(
                    msg.date,
                    Some(msg.time),
                    found.kind,
                    found.amount,
                    found.details,
                    found.balance,
                ));
            }
            Classification::Duplicate => {
                tracing::debug!(date = %msg.date, "skipping bundle confirmation");
                stats.duplicates += 1;
            }
            Classification::Malformed(kind) => {
                tracing::debug!(date = %msg.date, %kind, sender = ?msg.sender, "could not extract fields");
                stats.malformed += 1;
            }
            Classification::Unrecognized => {
                tracing::trace!(date = %msg.date, "not a transaction");
                stats.unrecognized += 1;
            }
        }
    }
    stats.transactions = transactions.len();

    // Summary folds in input order so balance ties go to the earlier message
    let summary = Summary::from_transactions(&transactions);
    sort_newest_first(&mut transactions);

    tracing::info!(
        %dialect,
        messages = stats.messages,
        transactions = stats.transactions,
        "parsed chat export"
    );

    Ok(ParseOutput {
        dialect: Some(dialect),
        stats,
        transactions,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use momo_core::TxnKind;

    fn opts(year: i32) -> ParseOptions {
        ParseOptions {
            dialect: None,
            reference_year: year,
        }
    }

    #[test]
    fn test_blank_input_is_rejected() {
        assert!(matches!(parse_with("   \n\t ", &opts(2024)), Err(ParseError::EmptyInput)));
        assert!(matches!(parse(""), Err(ParseError::EmptyInput)));
    }

    #[test]
    fn test_text_without_markers_yields_nothing() {
        let out = parse_with("just some chat", &opts(2024)).unwrap();
        assert_eq!(out.dialect, None);
        assert!(out.transactions.is_empty());
        assert_eq!(out.summary.current_balance, None);
    }

    #[test]
    fn test_stats_count_every_outcome() {
        let text = concat!(
            "[01/05, 10:00] You have received 5,000 RWF from John Doe (*12345) balance:15,000 RWF\n",
            "[01/05, 10:01] Umaze kugura 1,000Frw = 1GB igura iminsi 30\n",
            "[01/05, 10:02] something was transferred to nobody\n",
            "[01/05, 10:03] lunch?\n",
        );
        let out = parse_with(text, &opts(2024)).unwrap();
        assert_eq!(
            out.stats,
            ParseStats {
                messages: 4,
                transactions: 1,
                duplicates: 1,
                malformed: 1,
                unrecognized: 1,
            }
        );
        assert_eq!(out.transactions[0].kind, TxnKind::Received);
    }

    #[test]
    fn test_forced_dialect_is_respected() {
        let text = "[01/05, 10:00] You have received 5 RWF from A (*1) balance: 5 RWF";
        let out = parse_with(
            text,
            &ParseOptions {
                dialect: Some(Dialect::Full),
                reference_year: 2024,
            },
        )
        .unwrap();
        assert_eq!(out.dialect, Some(Dialect::Full));
        assert_eq!(out.stats.messages, 0);
    }
}
