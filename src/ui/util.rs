use rust_decimal::Decimal;

/// Signed display form of a balance contribution, with thousand separators
/// and 2 decimal places. e.g. `-2500` → `"-$2,500.00"`, `750` → `"+$750.00"`.
pub(crate) fn format_signed(val: Decimal) -> String {
    let abs = val.abs();
    let formatted = format!("{abs:.2}");
    let mut parts = formatted.split('.');
    let int_part = parts.next().unwrap_or("0");
    let dec_part = parts.next().unwrap_or("00");

    let with_commas: String = int_part
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or(""))
        .collect::<Vec<_>>()
        .join(",");

    let sign = if val > Decimal::ZERO {
        "+"
    } else if val < Decimal::ZERO {
        "-"
    } else {
        ""
    };
    format!("{sign}${with_commas}.{dec_part}")
}

/// Truncate a string to `max` visible characters, appending "…" if truncated.
/// Safe for multi-byte UTF-8 characters.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let char_count = s.chars().count();
    if char_count <= max {
        return s.to_string();
    }
    let truncated: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{truncated}…")
}
