//! Normalization of the comma-list request strings that drive a resolution.

/// The application-agnostic base identifier considered by every resolution.
pub(crate) const BASE_APPLICATION: &str = "application";

/// Split a comma list into trimmed, non-empty entries, preserving order.
///
/// Unlike [`parse_comma_list`], duplicates are kept. This is the form used
/// for the `profiles` field of an assembled environment, which reports the
/// request as the caller phrased it.
pub fn split_comma_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a comma list into a deduplicated, order-preserving sequence.
///
/// The first occurrence of each entry is kept; later duplicates are dropped.
pub fn parse_comma_list(value: &str) -> Vec<String> {
    let mut entries = Vec::new();
    for entry in split_comma_list(value) {
        if !entries.contains(&entry) {
            entries.push(entry);
        }
    }
    entries
}

/// Substitute the literal `"default"` profile for a blank profile request.
pub fn normalize_profiles(profile: &str) -> String {
    if profile.trim().is_empty() {
        "default".to_string()
    } else {
        profile.to_string()
    }
}

/// Guarantee the base `"application"` entry is considered by every
/// resolution: if no comma-separated entry equals it, prepend it.
pub fn normalize_applications(application: &str) -> String {
    let has_base = split_comma_list(application)
        .iter()
        .any(|entry| entry == BASE_APPLICATION);
    if has_base {
        application.to_string()
    } else {
        format!("{BASE_APPLICATION},{application}")
    }
}
