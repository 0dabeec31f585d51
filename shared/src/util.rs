use std::cmp::Ordering;

/// Name ordering used for canteens and menu items.
///
/// Case-insensitive first so "apple" sits next to "Apple", then raw string
/// order to keep the result total and deterministic.
pub fn collate(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// First whitespace-separated word of a display name.
///
/// Returns the whole (trimmed) string when it has no spaces.
pub fn first_name(display_name: &str) -> &str {
    let trimmed = display_name.trim();
    trimmed.split_whitespace().next().unwrap_or(trimmed)
}
