/// Tokens the export uses for "no value". Matched against the raw field.
const MISSING_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// True when a raw field counts as missing.
pub fn is_missing(raw: &str) -> bool {
    MISSING_TOKENS.contains(&raw)
}

/// Trim whitespace, mapping missing-value tokens to an empty string.
pub fn clean_str(raw: &str) -> String {
    if is_missing(raw) {
        String::new()
    } else {
        raw.trim().to_string()
    }
}

/// Parse a cleaned string as a number and round half-to-even.
/// Integer text is taken exactly; everything else goes through `f64`.
/// Returns None for anything that is not a finite number.
pub fn round_numeric(s: &str) -> Option<i64> {
    let s = s.trim();
    if let Ok(v) = s.parse::<i64>() {
        return Some(v);
    }
    let v: f64 = s.parse().ok()?;
    if !v.is_finite() {
        return None;
    }
    let r = v.round_ties_even();
    if r < i64::MIN as f64 || r > i64::MAX as f64 {
        return None;
    }
    Some(r as i64)
}
