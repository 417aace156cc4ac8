//! Number formatting for saved files.

/// Normalises a numeric field for writing.
///
/// Whole numbers lose their decimal part (`"123.00"` → `"123"`), fractions
/// lose trailing zeros (`"123.50"` → `"123.5"`), a decimal comma is accepted
/// and empty input becomes `"0"`. Text that is not a plain number, such as a
/// formula, is returned trimmed but otherwise unchanged.
pub fn format_num(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        return "0".to_string();
    }

    value
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .and_then(format_float)
        .unwrap_or_else(|| value.to_string())
}

/// Shortest decimal text for a finite value; `None` for NaN and infinities.
///
/// Negative zero is written as `0`.
pub fn format_float(value: f64) -> Option<String> {
    if !value.is_finite() {
        return None;
    }
    if value == 0.0 {
        return Some("0".to_string());
    }
    Some(value.to_string())
}
