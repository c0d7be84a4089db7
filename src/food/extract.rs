use super::catalog::{capitalize_first, lookup, title_case, FoodItem, CATALOG};

/// Shown when nothing on the menu could be matched, so a scan never comes back empty.
pub const FALLBACK_ITEMS: [&str; 5] = [
    "dal tadka",
    "paneer tikka",
    "biryani",
    "butter chicken",
    "roti",
];

const MIN_LINE_CHARS: usize = 3;

/// Maps free-form menu text (OCR or vision output) onto catalog entries.
///
/// Each line yields at most one item: the first catalog entry, in declaration
/// order, whose name contains the line or is contained in it. The same entry
/// may come back for several lines.
pub fn extract_food_items(text: &str) -> Vec<FoodItem> {
    let lowered = text.to_lowercase();

    let found: Vec<FoodItem> = lowered
        .split('\n')
        .map(str::trim)
        .filter(|line| line.chars().count() >= MIN_LINE_CHARS)
        .filter_map(|line| {
            CATALOG
                .iter()
                .find(|entry| line.contains(entry.key) || entry.key.contains(line))
                .map(|entry| entry.to_item(capitalize_first(entry.key)))
        })
        .collect();

    if found.is_empty() {
        log::debug!("No catalog match in menu text, using fallback items");
        return fallback_items();
    }

    found
}

pub fn fallback_items() -> Vec<FoodItem> {
    FALLBACK_ITEMS
        .iter()
        .filter_map(|key| lookup(key))
        .map(|entry| entry.to_item(title_case(entry.key)))
        .collect()
}
