//! Ordered classification rules for MoMo notification bodies.
//!
//! Rules are tried top to bottom and the first full match wins:
//!   1. received   "You have received 5,000 RWF from John Doe (*12345) ... balance:15,000 RWF"
//!   2. sent       "2,000 RWF transferred to Jane Roe (54321).Fee was: 100 RWF ... balance: 12,900 RWF"
//!   3. airtime    "payment of 500 RWF to Airtime ... balance: 12,400 RWF"
//!   4. bundles    "payment of 1,000 RWF to Bundles ... balance: 11,400 RWF"
//!   5. Kinyarwanda bundle confirmation "Umaze kugura 1,000Frw = 1GB igura ...", which
//!      repeats rule 4 and is discarded.

use momo_core::TxnKind;
use regex::{Captures, Regex};

use crate::error::ParseError;

/// Whole RWF with optional `,` thousands separators
const AMOUNT: &str = r"\d+(?:,\d{3})*";

/// Fields pulled out of one notification, before a timestamp is attached
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    pub kind: TxnKind,
    pub amount: u64,
    pub details: String,
    pub balance: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Transaction(Extracted),
    /// Recognised confirmation that repeats an earlier purchase
    Duplicate,
    /// A rule keyword was present but the fields could not be extracted
    Malformed(TxnKind),
    /// Ordinary chat text
    Unrecognized,
}

#[derive(Debug, Clone, Copy)]
enum Action {
    Emit(TxnKind),
    Discard,
}

#[derive(Debug)]
struct Rule {
    action: Action,
    /// Lower-case indicator used to tell malformed notifications from chat noise
    keyword: &'static str,
    re: Regex,
}

/// Compiled rule set, in precedence order
#[derive(Debug)]
pub struct Rules {
    rules: Vec<Rule>,
}

fn balance_tail() -> String {
    format!(r"(?:.*?balance\s*:?\s*(?P<balance>{AMOUNT})\s*RWF)?")
}

impl Rules {
    pub fn new() -> Result<Self, ParseError> {
        let tail = balance_tail();
        let rule = |action, keyword, pattern: String| -> Result<Rule, ParseError> {
            Ok(Rule {
                action,
                keyword,
                re: Regex::new(&format!("(?is){pattern}"))?,
            })
        };

        let rules = vec![
            rule(
                Action::Emit(TxnKind::Received),
                "you have received",
                format!(
                    r"you have received\s+(?P<amount>{AMOUNT})\s*RWF\s+from\s+(?P<party>[^(]+?)\s*\(\*+\d+\){tail}"
                ),
            )?,
            rule(
                Action::Emit(TxnKind::Sent),
                "transferred to",
                format!(
                    concat!(
                        r"(?P<amount>{amt})\s*RWF\s+transferred to\s+(?P<party>[^(]+?)\s*\((?P<reference>\d+)\)",
                        r"(?:.*?fee was\s*:?\s*(?P<fee>{amt})\s*RWF)?{tail}"
                    ),
                    amt = AMOUNT,
                    tail = tail,
                ),
            )?,
            rule(
                Action::Emit(TxnKind::Airtime),
                "to airtime",
                format!(r"payment of\s+(?P<amount>{AMOUNT})\s*RWF\s+to\s+airtime{tail}"),
            )?,
            rule(
                Action::Emit(TxnKind::Bundles),
                "to bundles",
                format!(r"payment of\s+(?P<amount>{AMOUNT})\s*RWF\s+to\s+bundles{tail}"),
            )?,
            rule(
                Action::Discard,
                "umaze kugura",
                format!(r"umaze kugura\s*(?P<amount>{AMOUNT})\s*frw\s*=\s*(?P<bundle>.+?)\s+igura"),
            )?,
        ];

        Ok(Self { rules })
    }

    pub fn classify(&self, body: &str) -> Classification {
        let lowered = body.to_lowercase();
        let mut near_miss = None;

        for rule in &self.rules {
            let Some(caps) = rule.re.captures(body) else {
                if near_miss.is_none() && lowered.contains(rule.keyword) {
                    near_miss = Some(rule.action);
                }
                continue;
            };

            return match rule.action {
                Action::Discard => Classification::Duplicate,
                Action::Emit(kind) => match extract(kind, &caps) {
                    Some(found) => Classification::Transaction(found),
                    None => Classification::Malformed(kind),
                },
            };
        }

        match near_miss {
            Some(Action::Emit(kind)) => Classification::Malformed(kind),
            // A garbled confirmation still carries nothing worth keeping
            Some(Action::Discard) => Classification::Duplicate,
            None => Classification::Unrecognized,
        }
    }
}

/// Strip thousands separators and read whole RWF. `None` on overflow.
pub fn parse_amount(raw: &str) -> Option<u64> {
    raw.replace(',', "").parse().ok()
}

fn extract(kind: TxnKind, caps: &Captures<'_>) -> Option<Extracted> {
    let amount = parse_amount(caps.name("amount")?.as_str())?;
    let balance = match caps.name("balance") {
        Some(m) => Some(parse_amount(m.as_str())?),
        None => None,
    };

    let (amount, details) = match kind {
        TxnKind::Received => (amount, format!("From {}", party(caps)?)),
        TxnKind::Sent => {
            let fee = match caps.name("fee") {
                Some(m) => parse_amount(m.as_str())?,
                None => 0,
            };
            let reference = caps.name("reference")?.as_str();
            (amount.checked_add(fee)?, format!("To {} ({reference})", party(caps)?))
        }
        TxnKind::Airtime => (amount, "Airtime Purchase".to_string()),
        TxnKind::Bundles => (amount, "Data Bundle Purchase".to_string()),
    };

    Some(Extracted {
        kind,
        amount,
        details,
        balance,
    })
}

/// Counterparty name with line breaks and runs of spaces collapsed
fn party(caps: &Captures<'_>) -> Option<String> {
    let name = caps
        .name("party")?
        .as_str()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    (!name.is_empty()).then_some(name)
}
