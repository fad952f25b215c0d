use indexmap::IndexSet;
use rat_focus::{FocusBuilder, FocusFlag, HasFocus};
use ratatui::layout::{Position, Rect};
use stuffsdrop_types::{
    NavItem,
    nav::{DEFAULT_EXPANDED_GROUPS, GroupConfig, MENU_GROUPS, decorate_items, group_for_item, partition_by_group},
};

use crate::providers::SidebarContext;

/// Something in the sidebar that can be focused, clicked or hovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarTarget {
    ThemeToggle,
    CollapseToggle,
    Group(&'static str),
    /// Index into [`SidebarState::items`].
    Item(usize),
    Settings,
    Logout,
}

/// State for the grouped navigation sidebar.
///
/// Holds the expansion set, the auto-expand latch and the logout dialog flag.
/// The collapse flag is not stored here: it lives in the sidebar context and
/// is passed in by callers.
#[derive(Debug, Clone)]
pub struct SidebarState {
    /// Group ids shown expanded in inline mode, in insertion order.
    expanded: IndexSet<String>,
    /// Set by the first manual group toggle; never cleared.
    user_has_manually_toggled: bool,
    logout_dialog_open: bool,

    /// Items as delivered by the navigation provider.
    provider_items: Vec<NavItem>,
    /// Provider items after label substitution and selection marking.
    items: Vec<NavItem>,
    selected_key: String,

    /// Group whose flyout is revealed while collapsed (pointer hover).
    pub hovered_group: Option<&'static str>,

    pub container_focus: FocusFlag,
    pub theme_toggle_focus: FocusFlag,
    pub collapse_toggle_focus: FocusFlag,
    pub group_focus: Vec<(&'static str, FocusFlag)>,
    /// Kept in sync with `items`.
    pub item_focus: Vec<FocusFlag>,
    pub settings_focus: FocusFlag,
    pub logout_focus: FocusFlag,

    /// Last rendered area; used for mouse focus integration.
    pub last_area: Rect,
    /// Hit-test areas from the last render.
    pub hit_areas: Vec<(Rect, SidebarTarget)>,
}

impl Default for SidebarState {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl SidebarState {
    pub fn new(provider_items: Vec<NavItem>) -> Self {
        let mut state = Self {
            expanded: DEFAULT_EXPANDED_GROUPS.iter().map(|id| id.to_string()).collect(),
            user_has_manually_toggled: false,
            logout_dialog_open: false,
            provider_items,
            items: Vec::new(),
            selected_key: String::new(),
            hovered_group: None,
            container_focus: FocusFlag::named("sidebar"),
            theme_toggle_focus: FocusFlag::named("sidebar.theme"),
            collapse_toggle_focus: FocusFlag::named("sidebar.collapse"),
            group_focus: MENU_GROUPS
                .iter()
                .map(|group| (group.id, FocusFlag::named(&format!("sidebar.group.{}", group.id))))
                .collect(),
            item_focus: Vec::new(),
            settings_focus: FocusFlag::named("sidebar.settings"),
            logout_focus: FocusFlag::named("sidebar.logout"),
            last_area: Rect::default(),
            hit_areas: Vec::new(),
        };
        state.redecorate();
        state.rebuild_item_focus();
        state
    }

    pub fn is_expanded(&self, group_id: &str) -> bool {
        self.expanded.contains(group_id)
    }

    pub fn items(&self) -> &[NavItem] {
        &self.items
    }

    pub fn selected_key(&self) -> &str {
        &self.selected_key
    }

    /// Decorated items partitioned into the static groups.
    pub fn groups(&self) -> Vec<(&'static GroupConfig, Vec<NavItem>)> {
        partition_by_group(&self.items)
    }

    /// Flips the shared collapse flag. Expansion is left as is.
    pub fn toggle_collapsed(&mut self, context: &mut SidebarContext) -> bool {
        self.hovered_group = None;
        context.toggle()
    }

    /// Manual header toggle. Ignored while collapsed; otherwise latches
    /// and flips membership of `group_id`.
    pub fn toggle_group(&mut self, group_id: &str, collapsed: bool) -> bool {
        if collapsed {
            return false;
        }
        self.user_has_manually_toggled = true;
        if !self.expanded.shift_remove(group_id) {
            self.expanded.insert(group_id.to_string());
        }
        true
    }

    /// Applies a new selection. Until the latch is set, the group holding the
    /// selected item is added to the expansion set.
    pub fn on_route_change(&mut self, selected_key: Option<&str>) {
        let key = selected_key.unwrap_or_default();
        if key != self.selected_key {
            self.selected_key = key.to_string();
            self.redecorate();
        }
        let Some(key) = selected_key else {
            return;
        };
        let name = self
            .provider_items
            .iter()
            .find(|item| item.key == key)
            .map(|item| item.name.as_str())
            .unwrap_or(key);
        let target_group = group_for_item(name);
        if !self.user_has_manually_toggled && !self.expanded.contains(target_group) {
            tracing::debug!(group = target_group, "auto-expanding sidebar group");
            self.expanded.insert(target_group.to_string());
        }
    }

    pub fn request_logout(&mut self) {
        self.logout_dialog_open = true;
    }

    /// Closes the dialog. Returns `true` when it was open, i.e. when the
    /// caller should perform the logout.
    pub fn confirm_logout(&mut self) -> bool {
        std::mem::replace(&mut self.logout_dialog_open, false)
    }

    pub fn cancel_logout(&mut self) {
        self.logout_dialog_open = false;
    }

    pub fn target_at(&self, position: Position) -> Option<SidebarTarget> {
        self.hit_areas
            .iter()
            .find(|(area, _)| area.contains(position))
            .map(|(_, target)| *target)
    }

    /// Target whose focus flag is set.
    pub fn focused_target(&self) -> Option<SidebarTarget> {
        if self.theme_toggle_focus.get() {
            return Some(SidebarTarget::ThemeToggle);
        }
        if self.collapse_toggle_focus.get() {
            return Some(SidebarTarget::CollapseToggle);
        }
        if let Some((id, _)) = self.group_focus.iter().find(|(_, flag)| flag.get()) {
            return Some(SidebarTarget::Group(id));
        }
        if let Some(index) = self.item_focus.iter().position(FocusFlag::get) {
            return Some(SidebarTarget::Item(index));
        }
        if self.settings_focus.get() {
            return Some(SidebarTarget::Settings);
        }
        self.logout_focus.get().then_some(SidebarTarget::Logout)
    }

    pub fn group_flag(&self, group_id: &str) -> Option<&FocusFlag> {
        self.group_focus.iter().find(|(id, _)| *id == group_id).map(|(_, flag)| flag)
    }

    /// Group whose flyout should show while collapsed: the hovered header,
    /// else the header or item holding keyboard focus.
    pub fn flyout_group(&self) -> Option<&'static str> {
        if self.hovered_group.is_some() {
            return self.hovered_group;
        }
        match self.focused_target()? {
            SidebarTarget::Group(id) => Some(id),
            SidebarTarget::Item(index) => self.items.get(index).map(|item| group_for_item(&item.name)),
            _ => None,
        }
    }

    fn redecorate(&mut self) {
        self.items = decorate_items(&self.provider_items, &self.selected_key);
    }

    fn rebuild_item_focus(&mut self) {
        self.item_focus = self
            .items
            .iter()
            .map(|item| FocusFlag::named(&format!("sidebar.item.{}", item.key)))
            .collect();
    }

    /// Focusable targets in display order. Items appear inline for expanded
    /// groups, or only for the flyout group while collapsed.
    pub fn visible_targets(&self, collapsed: bool) -> Vec<SidebarTarget> {
        let flyout = if collapsed { self.flyout_group() } else { None };
        let mut targets = vec![SidebarTarget::ThemeToggle, SidebarTarget::CollapseToggle];
        for (group, members) in self.groups() {
            targets.push(SidebarTarget::Group(group.id));
            let show_items = if collapsed { flyout == Some(group.id) } else { self.is_expanded(group.id) };
            if show_items {
                targets.extend(members.iter().filter_map(|item| self.item_index(&item.key)).map(SidebarTarget::Item));
            }
        }
        targets.extend([SidebarTarget::Settings, SidebarTarget::Logout]);
        targets
    }

    pub fn flag_for(&self, target: SidebarTarget) -> Option<&FocusFlag> {
        match target {
            SidebarTarget::ThemeToggle => Some(&self.theme_toggle_focus),
            SidebarTarget::CollapseToggle => Some(&self.collapse_toggle_focus),
            SidebarTarget::Group(id) => self.group_flag(id),
            SidebarTarget::Item(index) => self.item_focus.get(index),
            SidebarTarget::Settings => Some(&self.settings_focus),
            SidebarTarget::Logout => Some(&self.logout_focus),
        }
    }

    /// Target after (or before) the focused one, wrapping within the sidebar.
    pub fn cycle_target(&self, collapsed: bool, forward: bool) -> Option<SidebarTarget> {
        let targets = self.visible_targets(collapsed);
        let len = targets.len();
        let current = self.focused_target().and_then(|focused| targets.iter().position(|t| *t == focused));
        let next = match current {
            Some(index) if forward => (index + 1) % len,
            Some(index) => (index + len - 1) % len,
            None => 0,
        };
        targets.get(next).copied()
    }

    pub fn item_index(&self, key: &str) -> Option<usize> {
        self.items.iter().position(|item| item.key == key)
    }
}

/// Focus subtree for the sidebar under a given collapse flag.
pub struct SidebarFocus<'a> {
    pub state: &'a SidebarState,
    pub collapsed: bool,
}

impl HasFocus for SidebarFocus<'_> {
    fn build(&self, builder: &mut FocusBuilder) {
        let tag = builder.start(self);
        for target in self.state.visible_targets(self.collapsed) {
            if let Some(flag) = self.state.flag_for(target) {
                builder.leaf_widget(flag);
            }
        }
        builder.end(tag);
    }

    fn focus(&self) -> FocusFlag {
        self.state.container_focus.clone()
    }

    fn area(&self) -> Rect {
        self.state.last_area
    }
}

#[cfg(test)]
mod tests {
    use stuffsdrop_types::{NavigationProvider, StaticResources};

    use super::*;

    fn sidebar() -> SidebarState {
        SidebarState::new(StaticResources.menu_items())
    }

    #[test]
    fn defaults_expand_discover_and_my_stuffs() {
        let state = sidebar();
        assert_eq!(state.expanded.iter().map(String::as_str).collect::<Vec<_>>(), ["discover", "my-stuffs"]);
        assert!(!state.user_has_manually_toggled);
    }

    #[test]
    fn route_change_auto_expands_until_manual_toggle() {
        let mut state = sidebar();
        assert!(state.toggle_group("my-stuffs", false));
        assert!(!state.is_expanded("my-stuffs"));
        assert!(state.user_has_manually_toggled);

        state.on_route_change(Some("requests"));
        assert!(!state.is_expanded("my-stuffs"));
        assert_eq!(state.selected_key(), "requests");
    }

    #[test]
    fn route_change_adds_target_group_without_latch() {
        let mut state = sidebar();
        state.expanded.shift_remove("my-stuffs");
        state.on_route_change(Some("messages"));
        assert!(state.is_expanded("my-stuffs"));

        state.on_route_change(Some("impact"));
        assert!(state.is_expanded("community"));
        assert!(state.items().iter().any(|item| item.key == "impact" && item.checked));
    }

    #[test]
    fn unknown_keys_fall_back_to_discover() {
        let mut state = sidebar();
        state.toggle_group("discover", false);
        state.user_has_manually_toggled = false;
        state.on_route_change(Some("settings"));
        assert!(state.is_expanded("discover"));
    }

    #[test]
    fn group_toggle_is_ignored_while_collapsed() {
        let mut state = sidebar();
        assert!(!state.toggle_group("discover", true));
        assert!(state.is_expanded("discover"));
        assert!(!state.user_has_manually_toggled);
    }

    #[test]
    fn collapse_does_not_touch_expansion() {
        let mut state = sidebar();
        let mut context = SidebarContext::default();
        let before: Vec<String> = state.expanded.iter().cloned().collect();
        assert!(state.toggle_collapsed(&mut context));
        assert!(context.collapsed());
        assert!(!state.toggle_collapsed(&mut context));
        assert_eq!(state.expanded.iter().cloned().collect::<Vec<_>>(), before);
    }

    #[test]
    fn logout_dialog_confirm_and_cancel() {
        let mut state = sidebar();
        state.request_logout();
        assert!(state.logout_dialog_open);
        state.cancel_logout();
        assert!(!state.logout_dialog_open);
        assert!(!state.confirm_logout());

        state.request_logout();
        assert!(state.confirm_logout());
        assert!(!state.logout_dialog_open);
    }

    #[test]
    fn collapsed_targets_only_list_items_of_the_flyout_group() {
        let mut state = sidebar();
        let inline = state.visible_targets(false);
        assert!(inline.contains(&SidebarTarget::Item(0)));

        let collapsed = state.visible_targets(true);
        assert!(!collapsed.iter().any(|t| matches!(t, SidebarTarget::Item(_))));

        state.hovered_group = Some("community");
        let flyout = state.visible_targets(true);
        let impact = state.item_index("impact").unwrap();
        assert!(flyout.contains(&SidebarTarget::Item(impact)));
        assert!(!flyout.contains(&SidebarTarget::Item(0)));
    }

    #[test]
    fn cycling_wraps_around() {
        let state = sidebar();
        assert_eq!(state.cycle_target(false, true), Some(SidebarTarget::ThemeToggle));
        state.logout_focus.set(true);
        assert_eq!(state.cycle_target(false, true), Some(SidebarTarget::ThemeToggle));
        assert_eq!(state.cycle_target(false, false), Some(SidebarTarget::Settings));
    }

    #[test]
    fn no_selection_leaves_expansion_alone() {
        let mut state = sidebar();
        state.expanded.clear();
        state.on_route_change(None);
        assert_eq!(state.expanded.len(), 0);
        assert!(state.items().iter().all(|item| !item.checked));
    }
}
