//! Terminal, JSON and CSV presentation of a parse result.

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use momo_core::{format_amount, format_signed, group_thousands, Summary, Transaction, TypeFilter};
use momo_ingest::{Dialect, ParseOutput, ParseStats};
use serde::Serialize;
use std::io::Write;

const DATE_FMT: &str = "%d/%m/%Y %H:%M";

fn fmt_when(t: &Transaction) -> String {
    match t.time {
        Some(_) => t.timestamp().format(DATE_FMT).to_string(),
        None => t.date.format("%d/%m/%Y").to_string(),
    }
}

fn fmt_balance(balance: Option<u64>, currency: &str) -> String {
    balance.map_or_else(|| "unknown".to_string(), |b| format_amount(b, currency))
}

fn fmt_net(net: i128, currency: &str) -> String {
    let sign = if net < 0 { "-" } else { "+" };
    let abs = u64::try_from(net.unsigned_abs()).unwrap_or(u64::MAX);
    format!("{sign}{} {currency}", group_thousands(abs))
}

fn fmt_last_update(at: Option<NaiveDateTime>) -> String {
    at.map_or_else(
        || "Not available".to_string(),
        |at| format!("Last updated: {}", at.format(DATE_FMT)),
    )
}

/// Labelled summary followed by the filtered transaction table.
pub fn write_report<W: Write>(
    w: &mut W,
    out: &ParseOutput,
    filter: TypeFilter,
    currency: &str,
) -> Result<()> {
    write_summary(w, &out.summary, currency)?;
    writeln!(w)?;

    let rows = filter.apply(&out.transactions);
    if rows.is_empty() {
        writeln!(w, "No {filter} transactions found.")?;
        return Ok(());
    }
    write_table(w, &rows, currency)
}

fn write_summary<W: Write>(w: &mut W, s: &Summary, currency: &str) -> Result<()> {
    writeln!(w, "Transactions:    {}", s.transaction_count)?;
    writeln!(
        w,
        "Money received:  {} ({} transactions)",
        format_amount(s.total_received, currency),
        s.received_count
    )?;
    writeln!(
        w,
        "Money sent:      {} ({} transactions)",
        format_amount(s.total_sent, currency),
        s.sent_count
    )?;
    writeln!(w, "Net flow:        {}", fmt_net(s.net_flow(), currency))?;
    writeln!(w, "Current balance: {}", fmt_balance(s.current_balance, currency))?;
    writeln!(w, "                 {}", fmt_last_update(s.last_update))?;
    Ok(())
}

fn write_table<W: Write>(w: &mut W, rows: &[&Transaction], currency: &str) -> Result<()> {
    let header = ["Date", "Type", "Amount", "Details", "Balance"];
    let cells: Vec<[String; 5]> = rows
        .iter()
        .map(|t| {
            [
                fmt_when(t),
                t.kind.label().to_string(),
                format_signed(t.kind, t.amount, currency),
                t.details.clone(),
                fmt_balance(t.balance, currency),
            ]
        })
        .collect();

    let mut widths = header.map(str::len);
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |w: &mut W, cols: [&str; 5]| -> Result<()> {
        let padded: Vec<String> = cols
            .iter()
            .zip(widths)
            .map(|(c, width)| format!("{c:<width$}"))
            .collect();
        writeln!(w, "{}", padded.join("  ").trim_end())?;
        Ok(())
    };

    line(&mut *w, header)?;
    let rule = widths.map(|n| "-".repeat(n));
    line(&mut *w, rule.each_ref().map(String::as_str))?;
    for row in &cells {
        line(&mut *w, row.each_ref().map(String::as_str))?;
    }
    Ok(())
}

#[derive(Serialize)]
struct JsonReport<'a> {
    dialect: Option<Dialect>,
    filter: TypeFilter,
    stats: &'a ParseStats,
    summary: &'a Summary,
    transactions: Vec<&'a Transaction>,
}

pub fn write_json<W: Write>(w: &mut W, out: &ParseOutput, filter: TypeFilter) -> Result<()> {
    let report = JsonReport {
        dialect: out.dialect,
        filter,
        stats: &out.stats,
        summary: &out.summary,
        transactions: filter.apply(&out.transactions),
    };
    serde_json::to_writer_pretty(&mut *w, &report).context("serialize report")?;
    writeln!(w)?;
    Ok(())
}

#[derive(Serialize)]
struct CsvRow<'a> {
    date: String,
    time: String,
    #[serde(rename = "type")]
    kind: &'static str,
    amount: u64,
    details: &'a str,
    balance: Option<u64>,
}

/// One row per filtered transaction. Unknown balances are left empty.
pub fn write_csv<W: Write>(w: &mut W, out: &ParseOutput, filter: TypeFilter) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(w);
    for t in filter.apply(&out.transactions) {
        wtr.serialize(CsvRow {
            date: t.date.format("%Y-%m-%d").to_string(),
            time: t.time.map(|at| at.format("%H:%M").to_string()).unwrap_or_default(),
            kind: t.kind.as_str(),
            amount: t.amount,
            details: &t.details,
            balance: t.balance,
        })?;
    }
    wtr.flush()?;
    Ok(())
}
