//! Owner-name helpers relative to a zone apex.

/// Make `name` fully-qualified within `zone`.
///
/// A dot-terminated name is taken as an explicit override and returned unchanged, which also
/// makes the function idempotent. Labels are not validated.
pub fn normalize(name: &str, zone: &str) -> String {
    if name.ends_with('.') {
        name.to_string()
    } else {
        format!("{name}.{zone}")
    }
}

/// Inverse of [`normalize`] for names under `zone`: drops a trailing `.<zone>`.
///
/// Names outside the zone come back unchanged.
pub fn strip_zone_suffix(name: &str, zone: &str) -> String {
    let suffix = format!(".{zone}");
    match name.strip_suffix(&suffix) {
        Some(relative) if !relative.is_empty() => relative.to_string(),
        _ => name.to_string(),
    }
}

#[cfg(test)]
#[path = "names_tests.rs"]
mod tests;
