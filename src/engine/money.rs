// ==========================================
// Seguimiento - monetary value parsing
// ==========================================
// Asset valuations arrive as raw strings whose decimal separator
// is inconsistently `.` or `,`. The separator appearing later in
// the string is treated as decimal; the other, if present, is a
// thousands separator and stripped.
// ==========================================

/// Parse a locale-ambiguous monetary string.
///
/// `"1.234,56"`, `"1,234.56"` and `"1234.56"` all parse to
/// `1234.56`. Malformed input parses to `0.0` rather than failing;
/// a missing valuation must not sink the whole ledger.
///
/// Known failure mode, inherited from the source data: a value
/// with a single separator and three trailing digits is ambiguous
/// (`"1.234"` parses as 1.234, not 1234).
pub fn parse_flexible_decimal(raw: &str) -> f64 {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '$')
        .collect();
    if cleaned.is_empty() {
        return 0.0;
    }

    let last_dot = cleaned.rfind('.');
    let last_comma = cleaned.rfind(',');

    let normalized = match (last_dot, last_comma) {
        (Some(dot), Some(comma)) => {
            if comma > dot {
                // comma is decimal, dots are thousands
                cleaned.replace('.', "").replace(',', ".")
            } else {
                // dot is decimal, commas are thousands
                cleaned.replace(',', "")
            }
        }
        (None, Some(_)) => cleaned.replace(',', "."),
        _ => cleaned,
    };

    normalized.parse::<f64>().unwrap_or(0.0)
}
