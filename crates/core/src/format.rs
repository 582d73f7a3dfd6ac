//! Display formatting for calculator values and money amounts.

/// Format a computed number for the calculator display, with thousands
/// separators (`1234567.5` → `"1,234,567.5"`).
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        // Covers -0.0
        return "0".to_string();
    }
    if !value.is_finite() {
        return "Error".to_string();
    }
    format_entry(&value.to_string())
}

/// Format a partially typed operand, preserving a trailing decimal point
/// and trailing zeros (`"1200."` → `"1,200."`).
pub fn format_entry(entry: &str) -> String {
    if entry.is_empty() {
        return String::new();
    }
    let (sign, unsigned) = match entry.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", entry),
    };
    match unsigned.split_once('.') {
        Some((int, frac)) => format!("{sign}{}.{frac}", group_thousands(int)),
        None => format!("{sign}{}", group_thousands(unsigned)),
    }
}

/// Insert a comma every three digits from the right.
pub fn group_thousands(digits: &str) -> String {
    group(digits, |_| 3)
}

/// Format an amount as whole currency units with Indian digit grouping
/// (`1234567.0` with `"₹"` → `"₹12,34,567"`).
pub fn format_currency(amount: f64, symbol: &str) -> String {
    if !amount.is_finite() {
        return format!("{symbol}0");
    }
    let rounded = amount.round();
    let digits = format!("{:.0}", rounded.abs());
    // Last group is three digits, then groups of two.
    let grouped = group(&digits, |i| if i == 0 { 3 } else { 2 });
    if rounded < 0.0 {
        format!("-{symbol}{grouped}")
    } else {
        format!("{symbol}{grouped}")
    }
}

/// Format a percentage with two decimals (`7.123` → `"7.12%"`).
pub fn format_percent(value: f64) -> String {
    format!("{value:.2}%")
}

/// Group `digits` from the right; `width(i)` gives the size of the i-th group.
fn group(digits: &str, width: impl Fn(usize) -> usize) -> String {
    let chars: Vec<char> = digits.chars().collect();
    let mut groups: Vec<String> = Vec::new();
    let mut end = chars.len();
    while end > 0 {
        let start = end.saturating_sub(width(groups.len()));
        groups.push(chars[start..end].iter().collect());
        end = start;
    }
    groups.reverse();
    groups.join(",")
}
