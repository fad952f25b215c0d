//! Navigation model shared by the sidebar and the navigation provider.
//!
//! Items come from a [`NavigationProvider`] and are decorated locally: the
//! label is substituted from a fixed table and `checked` mirrors the current
//! selection. Groups are a static table and never change at runtime.

use serde::{Deserialize, Serialize};

/// Group that absorbs any item name missing from [`group_for_item`].
pub const FALLBACK_GROUP: &str = "discover";

/// Groups expanded when the sidebar is first mounted.
pub const DEFAULT_EXPANDED_GROUPS: &[&str] = &["discover", "my-stuffs"];

/// A single navigation destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavItem {
    /// Stable identity of the item.
    pub key: String,
    /// Symbolic category used for icon, label and group lookups.
    pub name: String,
    /// Display string.
    #[serde(default)]
    pub label: String,
    /// Link target, when the item is routable.
    #[serde(default)]
    pub route: Option<String>,
    /// `true` when `key` equals the selected key.
    #[serde(default)]
    pub checked: bool,
}

impl NavItem {
    pub fn new(key: impl Into<String>, name: impl Into<String>, route: Option<&str>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            label: String::new(),
            route: route.map(str::to_string),
            checked: false,
        }
    }
}

/// Static description of a navigation group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupConfig {
    pub id: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
    /// Ordered `NavItem::name` values belonging to this group.
    pub items: &'static [&'static str],
}

pub const MENU_GROUPS: &[GroupConfig] = &[
    GroupConfig {
        id: "discover",
        label: "Discover",
        icon: "✦",
        items: &["feed", "map", "saved"],
    },
    GroupConfig {
        id: "my-stuffs",
        label: "My Stuffs",
        icon: "▣",
        items: &["listings", "requests", "messages"],
    },
    GroupConfig {
        id: "community",
        label: "Community",
        icon: "☺",
        items: &["impact"],
    },
];

/// Looks up a group configuration by id.
pub fn group_config(id: &str) -> Option<&'static GroupConfig> {
    MENU_GROUPS.iter().find(|group| group.id == id)
}

/// Maps an item name to the group that should open when it becomes active.
///
/// Unmapped names land in [`FALLBACK_GROUP`].
pub fn group_for_item(name: &str) -> &'static str {
    match name {
        "feed" | "map" | "saved" => "discover",
        "listings" | "requests" | "messages" => "my-stuffs",
        "impact" | "leaderboard" => "community",
        _ => FALLBACK_GROUP,
    }
}

/// Resolves the glyph shown next to a navigation entry.
pub fn menu_icon(name: &str) -> &'static str {
    match name {
        "feed" => "▦",
        "map" => "⌖",
        "listings" => "⊕",
        "requests" => "⇩",
        "saved" => "♥",
        "messages" => "✉",
        "impact" => "★",
        "clothes" => "⌂",
        "accessories" => "◷",
        "settings" => "⚙",
        _ => "▤",
    }
}

/// Readable label for a resource name, if the marketplace renames it.
pub fn display_label(name: &str) -> Option<&'static str> {
    match name {
        "feed" => Some("Live Drops"),
        "map" => Some("Nearby Gems"),
        "listings" => Some("Give Away"),
        "requests" => Some("My Requests"),
        "saved" => Some("Watchlist"),
        "messages" => Some("Chats"),
        "impact" => Some("My Impact"),
        _ => None,
    }
}

/// Applies label substitution and the `checked` flag to provider items.
pub fn decorate_items(items: &[NavItem], selected_key: &str) -> Vec<NavItem> {
    items
        .iter()
        .map(|item| {
            let label = match display_label(&item.name) {
                Some(label) => label.to_string(),
                None if !item.label.is_empty() => item.label.clone(),
                None => item.name.clone(),
            };
            NavItem {
                label,
                checked: item.key == selected_key,
                ..item.clone()
            }
        })
        .collect()
}

/// Partitions decorated items into the static groups, in group order.
///
/// Items keep their provider order inside a group. Groups without any item
/// are left out.
pub fn partition_by_group(items: &[NavItem]) -> Vec<(&'static GroupConfig, Vec<NavItem>)> {
    MENU_GROUPS
        .iter()
        .filter_map(|group| {
            let members: Vec<NavItem> = items
                .iter()
                .filter(|item| group.items.contains(&item.name.as_str()))
                .cloned()
                .collect();
            (!members.is_empty()).then_some((group, members))
        })
        .collect()
}

/// Supplies the navigation destinations and the selection for a route.
pub trait NavigationProvider: Send + Sync {
    /// Ordered list of navigation items.
    fn menu_items(&self) -> Vec<NavItem>;
    /// Key of the item whose route is active, if any.
    fn selected_key(&self, route: &str) -> Option<String>;
}

/// A declared marketplace resource (name plus list route).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resource {
    pub name: &'static str,
    pub route: &'static str,
}

pub const RESOURCES: &[Resource] = &[
    Resource { name: "feed", route: "/feed" },
    Resource { name: "map", route: "/map" },
    Resource { name: "saved", route: "/saved" },
    Resource { name: "listings", route: "/listings" },
    Resource { name: "requests", route: "/requests" },
    Resource { name: "messages", route: "/messages" },
    Resource { name: "impact", route: "/impact" },
];

/// Navigation provider backed by [`RESOURCES`].
#[derive(Debug, Default, Clone, Copy)]
pub struct StaticResources;

impl NavigationProvider for StaticResources {
    fn menu_items(&self) -> Vec<NavItem> {
        RESOURCES
            .iter()
            .map(|resource| NavItem::new(resource.name, resource.name, Some(resource.route)))
            .collect()
    }

    fn selected_key(&self, route: &str) -> Option<String> {
        RESOURCES
            .iter()
            .find(|resource| route == resource.route || route.starts_with(&format!("{}/", resource.route)))
            .map(|resource| resource.name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str) -> NavItem {
        NavItem::new(name, name, Some(format!("/{name}").as_str()))
    }

    #[test]
    fn unmapped_names_fall_back_to_discover() {
        assert_eq!(group_for_item("messages"), "my-stuffs");
        assert_eq!(group_for_item("leaderboard"), "community");
        assert_eq!(group_for_item("settings"), FALLBACK_GROUP);
    }

    #[test]
    fn icon_lookup_defaults_to_folder() {
        assert_eq!(menu_icon("saved"), "♥");
        assert_eq!(menu_icon("nope"), menu_icon("default"));
    }

    #[test]
    fn decorate_substitutes_labels_and_marks_selection() {
        let mut custom = item("settings");
        custom.label = "Preferences".into();
        let decorated = decorate_items(&[item("feed"), custom, item("orphan")], "feed");

        assert_eq!(decorated[0].label, "Live Drops");
        assert!(decorated[0].checked);
        assert_eq!(decorated[1].label, "Preferences");
        assert!(!decorated[1].checked);
        assert_eq!(decorated[2].label, "orphan");
    }

    #[test]
    fn partition_drops_empty_groups_and_keeps_provider_order() {
        let items = decorate_items(&[item("saved"), item("feed"), item("listings")], "");
        let groups = partition_by_group(&items);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0.id, "discover");
        let names: Vec<&str> = groups[0].1.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["saved", "feed"]);
        assert_eq!(groups[1].0.id, "my-stuffs");
    }

    #[test]
    fn static_resources_resolve_nested_routes() {
        let resources = StaticResources;
        assert_eq!(resources.menu_items().len(), RESOURCES.len());
        assert_eq!(resources.selected_key("/requests/42").as_deref(), Some("requests"));
        assert_eq!(resources.selected_key("/login"), None);
    }
}
