//! Chat-export timestamp dialects and the tokenizer built on them.
//!
//! Two export styles are recognised:
//!   Short:  [01/05, 10:00] You have received ...
//!   Full:   [10:00, 01/05/2024] M-Money: You have received ...
//!
//! Short markers carry no year, so callers supply a reference year. The Full
//! sender prefix is optional; it is at most 40 characters and has no `.`.

use chrono::{NaiveDate, NaiveTime};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

const SHORT_MARKER: &str =
    r"\[(?P<day>\d{1,2})/(?P<month>\d{1,2}),\s*(?P<hour>\d{1,2}):(?P<minute>\d{2})\]";

const FULL_MARKER: &str = concat!(
    r"\[(?P<hour>\d{1,2}):(?P<minute>\d{2}),\s*",
    r"(?P<day>\d{1,2})/(?P<month>\d{1,2})/(?P<year>\d{4})\]",
    r"(?:[ \t]*(?P<sender>[^:.\n\[\]]{1,40}?):[ \t]+)?[ \t]*"
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// `[DD/MM, HH:MM]`
    Short,
    /// `[HH:MM, DD/MM/YYYY] sender: `
    Full,
}

/// One timestamped message cut out of a chat export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message<'a> {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub sender: Option<&'a str>,
    pub body: &'a str,
}

impl Dialect {
    pub const ALL: [Dialect; 2] = [Dialect::Short, Dialect::Full];

    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::Short => "short",
            Dialect::Full => "full",
        }
    }

    pub fn marker(&self) -> Result<Regex, ParseError> {
        let pattern = match self {
            Dialect::Short => SHORT_MARKER,
            Dialect::Full => FULL_MARKER,
        };
        Ok(Regex::new(pattern)?)
    }

    /// Probe `text` for both marker styles and pick the one seen more often.
    ///
    /// Ties go to `Full` since it carries the year. `None` when neither occurs.
    pub fn detect(text: &str) -> Result<Option<Dialect>, ParseError> {
        let short = Dialect::Short.marker()?.find_iter(text).count();
        let full = Dialect::Full.marker()?.find_iter(text).count();
        tracing::debug!(short, full, "dialect probe");

        Ok(match (short, full) {
            (0, 0) => None,
            (s, f) if s > f => Some(Dialect::Short),
            _ => Some(Dialect::Full),
        })
    }

    /// Split `text` at marker boundaries.
    ///
    /// Text before the first marker, empty bodies and markers naming an
    /// impossible date are dropped.
    pub fn split<'a>(&self, text: &'a str, reference_year: i32) -> Result<Vec<Message<'a>>, ParseError> {
        let marker = self.marker()?;
        let found: Vec<Captures<'a>> = marker.captures_iter(text).collect();

        let mut out = Vec::with_capacity(found.len());
        for (i, caps) in found.iter().enumerate() {
            let Some(whole) = caps.get(0) else { continue };
            let end = found
                .get(i + 1)
                .and_then(|next| next.get(0))
                .map_or(text.len(), |m| m.start());

            let body = text[whole.end()..end].trim();
            if body.is_empty() {
                continue;
            }

            let Some((date, time)) = self.decode(caps, reference_year) else {
                tracing::debug!(marker = whole.as_str(), "skipping message with invalid timestamp");
                continue;
            };

            out.push(Message {
                date,
                time,
                sender: caps.name("sender").map(|m| m.as_str().trim()),
                body,
            });
        }

        Ok(out)
    }

    fn decode(&self, caps: &Captures<'_>, reference_year: i32) -> Option<(NaiveDate, NaiveTime)> {
        let num = |name: &str| -> Option<u32> { caps.name(name)?.as_str().parse().ok() };

        let year = match self {
            Dialect::Short => reference_year,
            Dialect::Full => caps.name("year")?.as_str().parse().ok()?,
        };
        let date = NaiveDate::from_ymd_opt(year, num("month")?, num("day")?)?;
        let time = NaiveTime::from_hms_opt(num("hour")?, num("minute")?, 0)?;
        Some((date, time))
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A dialect name that is not `short` or `full`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown dialect '{0}' (expected short or full)")]
pub struct UnknownDialect(pub String);

impl FromStr for Dialect {
    type Err = UnknownDialect;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Dialect::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownDialect(s.to_string()))
    }
}
