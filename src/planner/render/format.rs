//! Formatting helpers shared by the plan renderers.

/// Longest predicate shown in a DOT label before it is cut.
pub const MAX_CONDITION_CHARS: usize = 50;

/// Columns listed in a DOT projection label before eliding the rest.
pub const MAX_PROJECTION_COLUMNS: usize = 3;

/// Scientific notation with two decimals and a signed, two-digit exponent,
/// e.g. `1.10e+03` or `5.00e-01`.
#[must_use]
pub fn format_cost(value: f64) -> String {
    let formatted = format!("{:.2e}", value);
    let Some((mantissa, exponent)) = formatted.split_once('e') else {
        // inf and NaN have no exponent
        return formatted;
    };
    match exponent.parse::<i32>() {
        Ok(exp) => {
            let sign = if exp < 0 { '-' } else { '+' };
            format!("{}e{}{:02}", mantissa, sign, exp.unsigned_abs())
        }
        Err(_) => formatted,
    }
}

/// Cut `s` to at most `max` characters, appending `...` when shortened.
#[must_use]
pub fn truncate(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((byte_idx, _)) => format!("{}...", &s[..byte_idx]),
        None => s.to_string(),
    }
}

/// Escape a string for use inside a double-quoted DOT attribute.
///
/// Newlines become the DOT line break `\n`.
#[must_use]
pub fn escape_dot(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            '"' => result.push_str("\\\""),
            '\n' => result.push_str("\\n"),
            '\r' => {}
            c => result.push(c),
        }
    }
    result
}
