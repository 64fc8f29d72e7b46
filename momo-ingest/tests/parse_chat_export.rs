use chrono::{NaiveDate, NaiveTime};
use momo_core::{Transaction, TxnKind, TypeFilter};
use momo_ingest::{parse_with, Dialect, ParseOptions};
use serde_json::json;
use similar_asserts::assert_eq;

fn opts(year: i32) -> ParseOptions {
    ParseOptions {
        dialect: None,
        reference_year: year,
    }
}

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> (NaiveDate, Option<NaiveTime>) {
    (
        NaiveDate::from_ymd_opt(y, m, d).unwrap(),
        NaiveTime::from_hms_opt(h, min, 0),
    )
}

const SHORT_EXPORT: &str = "\
[01/05, 10:00] You have received 5,000 RWF from John Doe (*12345) on your mobile money account. Your new balance:15,000 RWF
[01/05, 18:42] are you coming tonight?
[02/05, 11:00] 2,000 RWF transferred to Jane Roe (54321).Fee was: 100 RWF. Your new balance: 12,900 RWF
[03/05, 08:15] *162*TxId:9981*S*Your payment of 500 RWF to Airtime with token  has been completed at 2024-05-03 08:15:02. Fee was 0 RWF. Your new balance: 12,400 RWF.
[03/05, 09:30] *162*TxId:9982*S*Your payment of 1,000 RWF to Bundles and Packs has been completed at 2024-05-03 09:30:11. Your new balance: 11,400 RWF.
[03/05, 09:31] Umaze kugura 1,000Frw = 1GB igura iminsi 30. Murakoze gukoresha MTN!
";

/// The two-message example from the product brief.
#[test]
fn test_received_then_sent_end_to_end() {
    let text = "[01/05, 10:00] You have received 5,000 RWF from John Doe (*12345) ... balance:15,000 RWF\n\
                [02/05, 11:00] 2,000 RWF transferred to Jane Roe (54321).Fee was: 100 RWF...balance: 12,900 RWF";
    let out = parse_with(text, &opts(2024)).unwrap();

    assert_eq!(out.dialect, Some(Dialect::Short));
    assert_eq!(out.transactions.len(), 2);

    // newest first
    let sent = &out.transactions[0];
    assert_eq!(sent.kind, TxnKind::Sent);
    assert_eq!(sent.amount, 2100);
    assert_eq!(sent.balance, Some(12900));

    let received = &out.transactions[1];
    assert_eq!(received.kind, TxnKind::Received);
    assert_eq!(received.amount, 5000);
    assert_eq!(received.balance, Some(15000));

    assert_eq!(out.summary.current_balance, Some(12900));
    assert_eq!(out.summary.total_received, 5000);
    assert_eq!(out.summary.total_sent, 2100);
    assert_eq!(out.summary.last_update, Some(sent.timestamp()));
}

#[test]
fn test_short_export_full_listing() {
    let out = parse_with(SHORT_EXPORT, &opts(2024)).unwrap();

    let (d, t) = at(2024, 5, 3, 9, 30);
    let bundles = Transaction::new(d, t, TxnKind::Bundles, 1000, "Data Bundle Purchase", Some(11400));
    let (d, t) = at(2024, 5, 3, 8, 15);
    let airtime = Transaction::new(d, t, TxnKind::Airtime, 500, "Airtime Purchase", Some(12400));
    let (d, t) = at(2024, 5, 2, 11, 0);
    let sent = Transaction::new(d, t, TxnKind::Sent, 2100, "To Jane Roe (54321)", Some(12900));
    let (d, t) = at(2024, 5, 1, 10, 0);
    let received = Transaction::new(d, t, TxnKind::Received, 5000, "From John Doe", Some(15000));

    assert_eq!(out.transactions, vec![bundles.clone(), airtime, sent, received]);

    assert_eq!(out.summary.total_received, 5000);
    assert_eq!(out.summary.received_count, 1);
    assert_eq!(out.summary.total_sent, 3600);
    assert_eq!(out.summary.sent_count, 1);
    assert_eq!(out.summary.transaction_count, 4);
    assert_eq!(out.summary.current_balance, Some(11400));
    assert_eq!(out.summary.last_update, Some(bundles.timestamp()));

    assert_eq!(out.stats.messages, 6);
    assert_eq!(out.stats.duplicates, 1);
    assert_eq!(out.stats.unrecognized, 1);
}

#[test]
fn test_full_dialect_export() {
    let text = "\
[14:02, 28/12/2023] M-Money: You have received 20,000 RWF from Claudine U (*********789) on your mobile money account. Your new balance:20,000 RWF
[09:10, 02/01/2024] M-Money: 4,000 RWF transferred to Patrick M (250781112233) at 2024-01-02 09:10:00. Fee was: 100 RWF. Your new balance: 15,900 RWF
[09:11, 02/01/2024] Eric: did it arrive?
";
    // Reference year must not matter for dated markers
    let out = parse_with(text, &opts(1999)).unwrap();

    assert_eq!(out.dialect, Some(Dialect::Full));
    assert_eq!(out.transactions.len(), 2);
    assert_eq!(out.transactions[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
    assert_eq!(out.transactions[0].details.as_str(), "To Patrick M (250781112233)");
    assert_eq!(out.transactions[1].details.as_str(), "From Claudine U");
    // Across the year boundary the January transfer is still the latest
    assert_eq!(out.summary.current_balance, Some(15900));
}

#[test]
fn test_balance_follows_chronology_not_input_order() {
    let text = "\
[05/05, 09:00] 1,000 RWF transferred to Jane Roe (54321).Fee was: 20 RWF. balance: 8,980 RWF
[04/05, 09:00] You have received 10,000 RWF from John Doe (*1) balance: 10,000 RWF
";
    let out = parse_with(text, &opts(2024)).unwrap();
    assert_eq!(out.summary.current_balance, Some(8980));
    assert_eq!(out.transactions[0].kind, TxnKind::Sent);
}

#[test]
fn test_unknown_balances_do_not_set_current_balance() {
    let text = "[01/05, 10:00] You have received 300 RWF from Ann (*7) thanks";
    let out = parse_with(text, &opts(2024)).unwrap();
    assert_eq!(out.transactions.len(), 1);
    assert_eq!(out.transactions[0].balance, None);
    assert_eq!(out.summary.current_balance, None);
    assert_eq!(out.summary.last_update, None);
}

#[test]
fn test_bundle_confirmations_never_produce_records() {
    let text = "\
[03/05, 09:31] Umaze kugura 1,000Frw = 1GB igura iminsi 30.
[04/05, 07:00] Umaze kugura 500Frw = 300MB igura umunsi 1.
";
    let out = parse_with(text, &opts(2024)).unwrap();
    assert!(out.transactions.is_empty());
    assert_eq!(out.stats.duplicates, 2);
}

#[test]
fn test_filter_over_parsed_output() {
    let out = parse_with(SHORT_EXPORT, &opts(2024)).unwrap();

    let all = TypeFilter::All.apply(&out.transactions);
    assert_eq!(all.len(), out.transactions.len());

    let spent: Vec<TxnKind> = out
        .transactions
        .iter()
        .filter(|t| !t.kind.is_inflow())
        .map(|t| t.kind)
        .collect();
    assert_eq!(spent, vec![TxnKind::Bundles, TxnKind::Airtime, TxnKind::Sent]);

    let airtime = TypeFilter::Only(TxnKind::Airtime).apply(&out.transactions);
    assert_eq!(airtime.len(), 1);
    assert_eq!(airtime[0].amount, 500);
}

#[test]
fn test_parsing_is_idempotent() {
    let first = parse_with(SHORT_EXPORT, &opts(2024)).unwrap();
    let second = parse_with(SHORT_EXPORT, &opts(2024)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_output_serializes_to_json() {
    let out = parse_with(SHORT_EXPORT, &opts(2024)).unwrap();
    let json = serde_json::to_value(&out).unwrap();
    assert_eq!(json["dialect"], json!("short"));
    assert_eq!(json["transactions"][0]["kind"], json!("bundles"));
    assert_eq!(json["summary"]["current_balance"], json!(11400));
}

#[test]
fn test_same_minute_keeps_first_reported_balance() {
    let text = "\
[01/05, 10:00] You have received 5,000 RWF from John Doe (*12345) ... balance:15,000 RWF
[01/05, 10:00] *162*TxId:77*S*Your payment of 500 RWF to Airtime has been completed. Your new balance: 14,500 RWF
";
    let out = parse_with(text, &opts(2024)).unwrap();
    assert_eq!(out.transactions.len(), 2);
    assert_eq!(out.summary.current_balance, Some(15000));
}

#[test]
fn test_full_dialect_line_without_sender_is_kept() {
    let text = "\
[10:00, 01/05/2024] M-Money: You have received 5,000 RWF from John Doe (*12345) ... balance:15,000 RWF
[10:05, 01/05/2024] Your payment of 500 RWF to Airtime done. balance: 14,500 RWF
";
    let out = parse_with(text, &opts(1999)).unwrap();
    assert_eq!(out.dialect, Some(Dialect::Full));
    assert_eq!(out.transactions.len(), 2);
    assert_eq!(out.transactions[0].kind, TxnKind::Airtime);
    assert_eq!(out.transactions[0].amount, 500);
    assert_eq!(out.summary.current_balance, Some(14500));
}
