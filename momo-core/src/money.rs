//! Amount formatting for display.

use crate::transaction::TxnKind;

/// Group digits by thousands: `12900` -> `"12,900"`.
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// `"15,000 RWF"` style label
pub fn format_amount(n: u64, currency: &str) -> String {
    format!("{} {}", group_thousands(n), currency)
}

/// Amount prefixed with `+` for inflows and `-` for everything else
pub fn format_signed(kind: TxnKind, n: u64, currency: &str) -> String {
    let sign = if kind.is_inflow() { '+' } else { '-' };
    format!("{sign}{}", format_amount(n, currency))
}
