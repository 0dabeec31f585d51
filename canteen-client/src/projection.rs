//! Filter/sort projection of a canteen's menu
//!
//! [`project`] is a pure function of the raw items and the current
//! [`Selection`]. Rules, in order:
//!
//! 1. search: case-insensitive substring of the item name
//! 2. categories: item category is one of the selected ones (none selected = all)
//! 3. diet: veg only / non-veg only; both toggles on or both off = no filter
//! 4. sort: stable; `None` keeps arrival order
//!
//! [`group_by_category`] then buckets the result for display.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use shared::models::MenuItem;
use shared::util::collate;

/// Shown when the filters leave nothing to display
pub const EMPTY_STATE_MESSAGE: &str = "No menu items found with the selected filters.";

/// Sort key for the displayed items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortKey {
    #[default]
    #[serde(rename = "none")]
    None,
    #[serde(rename = "a-z")]
    NameAsc,
    #[serde(rename = "z-a")]
    NameDesc,
    #[serde(rename = "price")]
    PriceAsc,
    /// Most votes first
    #[serde(rename = "votes")]
    Popularity,
}

impl SortKey {
    pub const ALL: [SortKey; 5] = [
        SortKey::None,
        SortKey::NameAsc,
        SortKey::NameDesc,
        SortKey::PriceAsc,
        SortKey::Popularity,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            SortKey::None => "none",
            SortKey::NameAsc => "a-z",
            SortKey::NameDesc => "z-a",
            SortKey::PriceAsc => "price",
            SortKey::Popularity => "votes",
        }
    }

    /// Label for a sort picker
    pub const fn label(&self) -> &'static str {
        match self {
            SortKey::None => "No sorting",
            SortKey::NameAsc => "Sort A-Z",
            SortKey::NameDesc => "Sort Z-A",
            SortKey::PriceAsc => "Sort by Price",
            SortKey::Popularity => "Sort by Popularity",
        }
    }

    fn sort(&self, items: &mut [MenuItem]) {
        match self {
            SortKey::None => {}
            SortKey::NameAsc => items.sort_by(|a, b| collate(&a.name, &b.name)),
            SortKey::NameDesc => items.sort_by(|a, b| collate(&b.name, &a.name)),
            SortKey::PriceAsc => items.sort_by(|a, b| a.price.cmp(&b.price)),
            SortKey::Popularity => items.sort_by(|a, b| b.vote_count().cmp(&a.vote_count())),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| format!("unknown sort key: {s}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DietFilter {
    Any,
    VegOnly,
    NonVegOnly,
}

impl DietFilter {
    fn keeps(&self, item: &MenuItem) -> bool {
        match self {
            DietFilter::Any => true,
            DietFilter::VegOnly => item.is_veg(),
            DietFilter::NonVegOnly => item.is_nonveg,
        }
    }
}

/// Filter and sort inputs, reset whenever another canteen is selected
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub search: String,
    pub categories: Vec<String>,
    pub veg: bool,
    pub non_veg: bool,
    pub sort: SortKey,
}

impl Selection {
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Add the category, or remove it when already selected
    pub fn toggle_category(&mut self, category: &str) {
        match self.categories.iter().position(|c| c == category) {
            Some(index) => {
                self.categories.remove(index);
            }
            None => self.categories.push(category.to_string()),
        }
    }

    /// Text for the category picker button
    pub fn category_summary(&self) -> String {
        match self.categories.as_slice() {
            [] => "Select categories...".to_string(),
            [only] => only.clone(),
            many => format!("{} categories selected", many.len()),
        }
    }

    fn diet(&self) -> DietFilter {
        match (self.veg, self.non_veg) {
            (true, false) => DietFilter::VegOnly,
            (false, true) => DietFilter::NonVegOnly,
            _ => DietFilter::Any,
        }
    }
}

/// Items to display, filtered and ordered by `selection`
pub fn project(items: &[MenuItem], selection: &Selection) -> Vec<MenuItem> {
    let query = selection.search.to_lowercase();
    let diet = selection.diet();

    let mut result: Vec<MenuItem> = items
        .iter()
        .filter(|item| query.is_empty() || item.name.to_lowercase().contains(&query))
        .filter(|item| {
            selection.categories.is_empty() || selection.categories.contains(&item.category)
        })
        .filter(|item| diet.keeps(item))
        .cloned()
        .collect();

    selection.sort.sort(&mut result);
    result
}

/// Items sharing a category label
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryGroup {
    pub category: String,
    pub items: Vec<MenuItem>,
}

/// Bucket items by category; categories sorted, items keep their order
pub fn group_by_category(items: &[MenuItem]) -> Vec<CategoryGroup> {
    let mut groups: BTreeMap<&str, Vec<MenuItem>> = BTreeMap::new();
    for item in items {
        groups.entry(item.category.as_str()).or_default().push(item.clone());
    }
    groups
        .into_iter()
        .map(|(category, items)| CategoryGroup {
            category: category.to_string(),
            items,
        })
        .collect()
}
