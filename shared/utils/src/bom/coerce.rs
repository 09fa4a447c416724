//! Cell access and numeric coercion for loosely typed spreadsheet rows.

/// Quantity used when a cell holds no usable number.
pub const DEFAULT_QTY: f64 = 1.0;

/// Trimmed text of cell `idx`, or `""` when the row is shorter.
pub fn cell_text<S: AsRef<str>>(cells: &[S], idx: usize) -> &str {
    cells.get(idx).map(|c| c.as_ref().trim()).unwrap_or("")
}

pub fn is_blank(cell: &str) -> bool {
    cell.trim().is_empty()
}

pub fn non_blank_count<S: AsRef<str>>(cells: &[S]) -> usize {
    cells.iter().filter(|c| !is_blank(c.as_ref())).count()
}

/// First non-blank cell, trimmed.
pub fn first_non_blank<S: AsRef<str>>(cells: &[S]) -> Option<&str> {
    cells.iter().map(|c| c.as_ref().trim()).find(|c| !c.is_empty())
}

/// Outcome of reading a quantity cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsedQty {
    pub value: f64,
    /// The cell had content but no usable number, so [`DEFAULT_QTY`] was used.
    pub fell_back: bool,
}

/// Read a quantity the way spreadsheet users expect: an empty cell means
/// one unit, a leading number is taken even when followed by a unit
/// ("3 pcs"), and anything evaluating to zero or not a number becomes one.
/// Negative numbers are kept as-is.
pub fn parse_quantity(raw: Option<&str>) -> ParsedQty {
    let raw = match raw {
        Some(raw) if !raw.is_empty() => raw,
        _ => return ParsedQty { value: DEFAULT_QTY, fell_back: false },
    };

    match leading_float(raw) {
        Some(value) if value != 0.0 => ParsedQty { value, fell_back: false },
        _ => ParsedQty {
            value: DEFAULT_QTY,
            fell_back: !is_blank(raw),
        },
    }
}

/// Longest decimal prefix of `s` after leading whitespace, as a float.
///
/// Accepts an optional sign, digits with an optional fraction, and an
/// optional exponent, or the literal `Infinity`. Returns `None` when no
/// digits are found.
pub fn leading_float(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }

    if s[end..].starts_with("Infinity") {
        let inf = f64::INFINITY;
        return Some(if bytes[0] == b'-' { -inf } else { inf });
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }

    if digits == 0 {
        return None;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_helpers() {
        let row = vec!["  Widget ", "", " \t"];
        assert_eq!(cell_text(&row, 0), "Widget");
        assert_eq!(cell_text(&row, 1), "");
        assert_eq!(cell_text(&row, 7), "");
        assert_eq!(non_blank_count(&row), 1);
        assert_eq!(first_non_blank(&["", " x "]), Some("x"));
        assert_eq!(first_non_blank::<&str>(&[]), None);
    }

    #[test]
    fn test_leading_float() {
        assert_eq!(leading_float("3"), Some(3.0));
        assert_eq!(leading_float("  2.5kg"), Some(2.5));
        assert_eq!(leading_float("-4"), Some(-4.0));
        assert_eq!(leading_float(".5"), Some(0.5));
        assert_eq!(leading_float("7."), Some(7.0));
        assert_eq!(leading_float("1e3 units"), Some(1000.0));
        assert_eq!(leading_float("2e"), Some(2.0));
        assert_eq!(leading_float("3\r"), Some(3.0));
        assert_eq!(leading_float("-Infinity"), Some(f64::NEG_INFINITY));
        assert_eq!(leading_float("abc"), None);
        assert_eq!(leading_float("."), None);
        assert_eq!(leading_float("-"), None);
        assert_eq!(leading_float(""), None);
    }

    #[test]
    fn test_parse_quantity_defaults() {
        assert_eq!(parse_quantity(None), ParsedQty { value: 1.0, fell_back: false });
        assert_eq!(parse_quantity(Some("")), ParsedQty { value: 1.0, fell_back: false });
        assert_eq!(parse_quantity(Some("   ")), ParsedQty { value: 1.0, fell_back: false });
        assert_eq!(parse_quantity(Some("lots")), ParsedQty { value: 1.0, fell_back: true });
        assert_eq!(parse_quantity(Some("12 pcs")).value, 12.0);
    }

    #[test]
    fn test_zero_quantity_becomes_one() {
        let parsed = parse_quantity(Some("0"));
        assert_eq!(parsed.value, 1.0);
        assert!(parsed.fell_back);
        assert_eq!(parse_quantity(Some("0.0")).value, 1.0);
    }

    #[test]
    fn test_negative_quantity_is_kept() {
        assert_eq!(parse_quantity(Some("-2")).value, -2.0);
    }
}
