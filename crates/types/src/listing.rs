//! Listings ("drops") and the browse filter.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category filter value that matches every listing.
pub const ALL_CATEGORIES: &str = "all";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    New,
    #[serde(rename = "Like New")]
    LikeNew,
    Good,
    Fair,
}

impl Condition {
    pub fn as_str(self) -> &'static str {
        match self {
            Condition::New => "New",
            Condition::LikeNew => "Like New",
            Condition::Good => "Good",
            Condition::Fair => "Fair",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: String,
    pub title: String,
    /// Free-form category; not limited to the registration tags.
    pub category: String,
    pub condition: Condition,
    #[serde(rename = "distance")]
    pub distance_miles: f64,
    #[serde(default)]
    pub image_url: Option<String>,
    pub posted_at: DateTime<Utc>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_hot: bool,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Grid,
    Map,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Grid => ViewMode::Map,
            ViewMode::Map => ViewMode::Grid,
        }
    }
}

/// Search text plus category filter applied to the loaded listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingQuery {
    pub search: String,
    pub category: String,
}

impl Default for ListingQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            category: ALL_CATEGORIES.to_string(),
        }
    }
}

impl ListingQuery {
    /// Category matches (unless "all") and the search text is contained in the
    /// title, the category or any tag. Both comparisons ignore case.
    pub fn matches(&self, listing: &Listing) -> bool {
        let category_ok =
            self.category.eq_ignore_ascii_case(ALL_CATEGORIES) || listing.category.eq_ignore_ascii_case(&self.category);
        if !category_ok {
            return false;
        }
        let needle = self.search.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        listing.title.to_lowercase().contains(&needle)
            || listing.category.to_lowercase().contains(&needle)
            || listing.tags.iter().any(|tag| tag.to_lowercase().contains(&needle))
    }

    pub fn apply<'a>(&self, listings: &'a [Listing]) -> Vec<&'a Listing> {
        listings.iter().filter(|listing| self.matches(listing)).collect()
    }
}

/// Distinct categories in first-seen order, preceded by "all".
pub fn category_options(listings: &[Listing]) -> Vec<String> {
    let mut options = vec![ALL_CATEGORIES.to_string()];
    for listing in listings {
        if !options.iter().any(|o| o.eq_ignore_ascii_case(&listing.category)) {
            options.push(listing.category.clone());
        }
    }
    options
}

/// Listings ordered by distance, nearest first.
pub fn by_distance<'a>(listings: &[&'a Listing]) -> Vec<&'a Listing> {
    let mut sorted = listings.to_vec();
    sorted.sort_by(|a, b| a.distance_miles.total_cmp(&b.distance_miles));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(title: &str, category: &str, tags: &[&str], distance: f64) -> Listing {
        Listing {
            id: title.to_lowercase(),
            title: title.into(),
            category: category.into(),
            condition: Condition::Good,
            distance_miles: distance,
            image_url: None,
            posted_at: Utc::now(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            is_hot: false,
            latitude: 0.0,
            longitude: 0.0,
        }
    }

    fn sample() -> Vec<Listing> {
        vec![
            listing("Vintage Denim Jacket", "Clothing", &["Denim", "Vintage"], 1.2),
            listing("Unused Blender", "Household", &["Kitchen"], 3.5),
            listing("Leather Boots", "Shoes", &["Leather"], 0.5),
        ]
    }

    #[test]
    fn default_query_matches_everything() {
        let items = sample();
        assert_eq!(ListingQuery::default().apply(&items).len(), 3);
    }

    #[test]
    fn search_covers_title_category_and_tags() {
        let items = sample();
        let mut query = ListingQuery {
            search: "kitchen".into(),
            ..Default::default()
        };
        assert_eq!(query.apply(&items)[0].title, "Unused Blender");

        query.search = "SHOES".into();
        assert_eq!(query.apply(&items)[0].title, "Leather Boots");

        query.search = "jacket".into();
        assert_eq!(query.apply(&items).len(), 1);
    }

    #[test]
    fn category_filter_is_case_insensitive() {
        let items = sample();
        let query = ListingQuery {
            search: String::new(),
            category: "clothing".into(),
        };
        let hits = query.apply(&items);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].category, "Clothing");
    }

    #[test]
    fn map_order_is_nearest_first() {
        let items = sample();
        let all: Vec<&Listing> = items.iter().collect();
        let titles: Vec<&str> = by_distance(&all).iter().map(|l| l.title.as_str()).collect();
        assert_eq!(titles, ["Leather Boots", "Vintage Denim Jacket", "Unused Blender"]);
    }

    #[test]
    fn category_options_start_with_all() {
        let options = category_options(&sample());
        assert_eq!(options, ["all", "Clothing", "Household", "Shoes"]);
    }

    #[test]
    fn condition_uses_display_names_on_the_wire() {
        let json = serde_json::to_string(&Condition::LikeNew).expect("serialize condition");
        assert_eq!(json, "\"Like New\"");
    }
}
