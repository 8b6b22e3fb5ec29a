//! Number formatting for display.

/// Fraction digits kept when rendering money.
const MAX_FRACTION_DIGITS: usize = 3;

/// Render `amount` as dollars with thousands separators.
///
/// Up to three fraction digits are kept and trailing zeros dropped, so
/// `400.0` renders as `$400` and `1234.5` as `$1,234.5`.
#[must_use]
pub fn usd(amount: f64) -> String {
    if !amount.is_finite() {
        return format!("${amount}");
    }

    let fixed = format!("{:.*}", MAX_FRACTION_DIGITS, amount.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut out = String::with_capacity(fixed.len() + 4);
    // Rounding can turn a tiny negative into zero; don't print "-$0".
    if amount < 0.0 && (int_part != "0" || !frac_part.is_empty()) {
        out.push('-');
    }
    out.push('$');
    out.push_str(&group_thousands(int_part));
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
