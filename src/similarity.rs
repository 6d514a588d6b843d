/// Deterministic tiered similarity between two normalized field values.
///
/// This is not a general edit-distance metric: scores come from a fixed set
/// of tiers so that every agreement decision is reproducible and auditable.

/// Lowercases and collapses runs of whitespace: the form in which two values
/// count as "the same normalized value".
pub fn normalized_key(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Lowercases and strips everything that is not alphanumeric.
fn cleaned_key(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect::<String>()
        .to_lowercase()
}

/// Scores the agreement of two field values in [0, 1].
///
/// Tiers:
/// - 1.0 — exact match, case- and whitespace-insensitive;
/// - 0.9 — equal after removing all non-alphanumeric characters
///   ("Acme Srl" vs "Acme S.r.l.");
/// - 0.8 — one cleaned value is a substring of the other, both non-empty;
/// - 0.0 — otherwise.
///
/// Empty vs empty scores 0.0: missing data carries no information and must
/// not count as agreement.
pub fn similarity(a: &str, b: &str) -> f64 {
    let key_a = normalized_key(a);
    let key_b = normalized_key(b);
    if !key_a.is_empty() && key_a == key_b {
        return 1.0;
    }

    let clean_a = cleaned_key(a);
    let clean_b = cleaned_key(b);
    if !clean_a.is_empty() && clean_a == clean_b {
        return 0.9;
    }

    if !clean_a.is_empty()
        && !clean_b.is_empty()
        && (clean_a.contains(&clean_b) || clean_b.contains(&clean_a))
    {
        return 0.8;
    }

    0.0
}
