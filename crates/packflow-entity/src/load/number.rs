//! Load number generation.
//!
//! A load number is `{siteCode}{YY}{MM}{DD}`, with a numeric `-N` suffix
//! when the bare prefix is already taken for that site and day. The next
//! number is derived from the lexicographically-highest existing number
//! with the prefix.

use chrono::NaiveDate;

/// Build the load-number prefix for a site code and dispatch date.
pub fn load_number_prefix(site_code: &str, dispatch_date: NaiveDate) -> String {
    format!("{}{}", site_code, dispatch_date.format("%y%m%d"))
}

/// Compute the next load number for a prefix.
///
/// `highest_existing` is the lexicographically-highest load number already
/// stored that starts with `prefix` (or `None` if the prefix is unused).
pub fn next_load_number(prefix: &str, highest_existing: Option<&str>) -> String {
    let Some(highest) = highest_existing else {
        return prefix.to_string();
    };

    let suffix = highest.strip_prefix(prefix).unwrap_or("");
    let next = suffix
        .strip_prefix('-')
        .and_then(|n| n.parse::<u32>().ok())
        .map(|n| n + 1)
        .unwrap_or(2);

    format!("{prefix}-{next}")
}
