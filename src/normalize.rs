/// Normalization primitives shared by every higher-level component.
///
/// Two single-responsibility normalizers live here:
/// 1. Numeric normalization — heterogeneous numeric-like strings
///    ("1.2K", "€3,400", "n/a") into a typed number or an explicit
///    [`Numeric::Unknown`] sentinel.
/// 2. Identifier normalization — VAT-like identifiers into a fixed
///    country-prefixed canonical shape.
///
/// Both are total: they never panic and never silently return 0, since 0 is
/// a legitimate value distinct from "no data".
use crate::models::{FieldValue, Numeric};
use regex::Regex;

/// Strings treated as an explicit "no data" marker.
const NA_MARKERS: [&str; 8] = ["n/a", "na", "n.a.", "none", "null", "unknown", "-", "--"];

/// Normalizes any field value into a typed number or `Unknown`.
///
/// Already-numeric input passes through unchanged (non-finite values are
/// rejected as `Unknown`); text goes through [`parse_numeric`]; nested maps
/// have no numeric reading.
pub fn normalize_numeric(value: &FieldValue) -> Numeric {
    match value {
        FieldValue::Number(n) if n.is_finite() => Numeric::Value(*n),
        FieldValue::Number(_) => Numeric::Unknown,
        FieldValue::Text(s) => parse_numeric(s),
        FieldValue::Map(_) => Numeric::Unknown,
    }
}

/// Parses a numeric-like string into a number or `Unknown`.
///
/// Handles:
/// - currency symbols and surrounding junk (stripped);
/// - a trailing magnitude suffix `K`/`M`/`B`, case-insensitive,
///   applying x1e3 / x1e6 / x1e9;
/// - `.` and `,` as either grouping or decimal separators. With a magnitude
///   suffix a single separator is decimal ("3,4M" -> 3_400_000); without one,
///   a single separator followed by exactly three digits is grouping
///   ("€3,400" -> 3400). When both separators appear, the last one is the
///   decimal point.
///
/// Empty, `N/A`-like and unparseable input return `Unknown`.
pub fn parse_numeric(raw: &str) -> Numeric {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Numeric::Unknown;
    }
    let lowered = trimmed.to_lowercase();
    if NA_MARKERS.contains(&lowered.as_str()) {
        return Numeric::Unknown;
    }

    // Keep digits, separators and magnitude letters; drops currency symbols
    // and free text around the number.
    let junk = Regex::new(r"[^0-9.,KMB]").unwrap();
    let upper = trimmed.to_uppercase();
    let cleaned = junk.replace_all(&upper, "").into_owned();
    if cleaned.is_empty() || !cleaned.chars().any(|c| c.is_ascii_digit()) {
        tracing::debug!("Unparseable numeric value: {:?}", raw);
        return Numeric::Unknown;
    }

    let (mantissa, multiplier) = match cleaned.chars().last() {
        Some('K') => (&cleaned[..cleaned.len() - 1], 1e3),
        Some('M') => (&cleaned[..cleaned.len() - 1], 1e6),
        Some('B') => (&cleaned[..cleaned.len() - 1], 1e9),
        _ => (cleaned.as_str(), 1.0),
    };

    // A magnitude letter anywhere but the end means the input was not a
    // number ("K2M", "back2back").
    if mantissa.chars().any(|c| matches!(c, 'K' | 'M' | 'B')) {
        tracing::debug!("Unparseable numeric value: {:?}", raw);
        return Numeric::Unknown;
    }

    match parse_mantissa(mantissa, multiplier != 1.0) {
        Some(v) => Numeric::Value(v * multiplier),
        None => {
            tracing::debug!("Unparseable numeric value: {:?}", raw);
            Numeric::Unknown
        }
    }
}

/// Resolves separator ambiguity and parses the numeric mantissa.
fn parse_mantissa(mantissa: &str, has_suffix: bool) -> Option<f64> {
    if mantissa.is_empty() {
        return None;
    }

    let dots = mantissa.matches('.').count();
    let commas = mantissa.matches(',').count();

    let normalized = if dots > 0 && commas > 0 {
        // Mixed separators: the last one is decimal, the rest are grouping.
        let decimal_pos = mantissa.rfind(['.', ','])?;
        let mut out = String::with_capacity(mantissa.len());
        for (i, c) in mantissa.char_indices() {
            match c {
                '.' | ',' if i == decimal_pos => out.push('.'),
                '.' | ',' => {}
                other => out.push(other),
            }
        }
        out
    } else if dots + commas > 1 {
        // Repeated separator is always grouping: "1,234,567".
        mantissa.replace(['.', ','], "")
    } else if dots + commas == 1 {
        let pos = mantissa.find(['.', ','])?;
        let digits_after = mantissa.len() - pos - 1;
        if !has_suffix && digits_after == 3 {
            // "3,400" / "3.400" without a suffix reads as grouping.
            mantissa.replace(['.', ','], "")
        } else {
            mantissa.replace(',', ".")
        }
    } else {
        mantissa.to_string()
    };

    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Normalizes an Italian VAT identifier to the canonical `IT` + 11 digits shape.
///
/// Strips the country prefix and every non-digit, restores a single lost
/// leading zero (10 digits are left-padded to 11), and requires exactly 11
/// digits. Malformed identifiers return `None` and are dropped from
/// canonical output by the consolidator, never fatal to the whole record.
///
/// VAT numbers are never routed through [`parse_numeric`]: "11" is a plain
/// integer there and an invalid identifier here.
pub fn normalize_vat(raw: &str) -> Option<String> {
    let mut digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() == 10 {
        digits.insert(0, '0');
    }
    if digits.len() != 11 {
        tracing::warn!("❌ Invalid VAT identifier (expected 11 digits): {:?}", raw);
        return None;
    }
    Some(format!("IT{}", digits))
}

/// Validates the control digit of an 11-digit Italian VAT number.
///
/// Odd positions (1st, 3rd, ...) are summed as-is; even positions are
/// doubled with 9 subtracted above 9; the control digit is
/// `(10 - total mod 10) mod 10`. Callers wanting registry-grade identifiers
/// apply this on top of [`normalize_vat`]; shape normalization alone does
/// not reject typos.
pub fn vat_checksum_ok(vat: &str) -> bool {
    let digits: Vec<u32> = vat
        .chars()
        .filter(|c| c.is_ascii_digit())
        .filter_map(|c| c.to_digit(10))
        .collect();
    if digits.len() != 11 {
        return false;
    }

    let odd_sum: u32 = (0..10).step_by(2).map(|i| digits[i]).sum();
    let even_sum: u32 = (1..10)
        .step_by(2)
        .map(|i| {
            let doubled = digits[i] * 2;
            if doubled < 10 {
                doubled
            } else {
                doubled - 9
            }
        })
        .sum();

    let check = (10 - (odd_sum + even_sum) % 10) % 10;
    digits[10] == check
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(n: Numeric) -> f64 {
        n.value().expect("expected a numeric value")
    }

    #[test]
    fn test_magnitude_suffixes() {
        assert_eq!(value(parse_numeric("1.2K")), 1200.0);
        assert_eq!(value(parse_numeric("3,4M")), 3_400_000.0);
        assert_eq!(value(parse_numeric("2B")), 2_000_000_000.0);
        assert_eq!(value(parse_numeric("15k")), 15_000.0);
    }

    #[test]
    fn test_currency_and_grouping() {
        assert_eq!(value(parse_numeric("€3,400")), 3400.0);
        assert_eq!(value(parse_numeric("€3.400")), 3400.0);
        assert_eq!(value(parse_numeric("$1,234,567")), 1_234_567.0);
        assert_eq!(value(parse_numeric("1.234.567,89")), 1_234_567.89);
    }

    #[test]
    fn test_plain_numbers() {
        assert_eq!(value(parse_numeric("11")), 11.0);
        assert_eq!(value(parse_numeric("0")), 0.0);
        assert_eq!(value(parse_numeric("3.4")), 3.4);
        assert_eq!(value(parse_numeric("  50 dipendenti ")), 50.0);
    }

    #[test]
    fn test_unknown_markers() {
        assert!(parse_numeric("").is_unknown());
        assert!(parse_numeric("   ").is_unknown());
        assert!(parse_numeric("N/A").is_unknown());
        assert!(parse_numeric("n.a.").is_unknown());
        assert!(parse_numeric("unknown").is_unknown());
        assert!(parse_numeric("-").is_unknown());
        assert!(parse_numeric("no figure available").is_unknown());
    }

    #[test]
    fn test_zero_is_not_unknown() {
        // 0 is a legitimate value, distinct from missing data.
        assert_eq!(parse_numeric("0"), Numeric::Value(0.0));
    }

    #[test]
    fn test_normalize_numeric_passthrough() {
        assert_eq!(normalize_numeric(&FieldValue::Number(50.0)), Numeric::Value(50.0));
        assert_eq!(normalize_numeric(&FieldValue::Text("50".into())), Numeric::Value(50.0));
        assert!(normalize_numeric(&FieldValue::Number(f64::NAN)).is_unknown());
        assert!(normalize_numeric(&FieldValue::Map(Default::default())).is_unknown());
    }

    #[test]
    fn test_vat_normalization() {
        assert_eq!(normalize_vat("IT01234567890"), Some("IT01234567890".to_string()));
        assert_eq!(normalize_vat("01234567890"), Some("IT01234567890".to_string()));
        assert_eq!(normalize_vat("IT 012.3456.789-0"), Some("IT01234567890".to_string()));
        // Lost leading zero restored
        assert_eq!(normalize_vat("1234567890"), Some("IT01234567890".to_string()));
    }

    #[test]
    fn test_vat_rejects_malformed() {
        assert_eq!(normalize_vat(""), None);
        assert_eq!(normalize_vat("11"), None);
        assert_eq!(normalize_vat("123456789012"), None);
        assert_eq!(normalize_vat("no digits here"), None);
    }

    #[test]
    fn test_vat_checksum() {
        // 0123456789 -> odd sum 20, even sum 23, control (10 - 43 % 10) % 10 = 7
        assert!(vat_checksum_ok("IT01234567897"));
        assert!(!vat_checksum_ok("IT01234567890"));
        assert!(!vat_checksum_ok("IT0123456789"));
    }
}
