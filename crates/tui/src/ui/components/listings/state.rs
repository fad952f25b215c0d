use rat_focus::{FocusBuilder, FocusFlag, HasFocus};
use ratatui::layout::Rect;
use stuffsdrop_types::{
    Effect, Listing, ListingQuery, ViewMode,
    listing::{by_distance, category_options},
};

use crate::ui::components::common::TextInputState;

/// Browse state for the listings feed.
#[derive(Debug, Clone)]
pub struct ListingsState {
    listings: Vec<Listing>,
    loading: bool,
    error: Option<String>,
    view_mode: ViewMode,
    query: ListingQuery,
    pub search: TextInputState,
    /// Index into the filtered list.
    selected: usize,

    container_focus: FocusFlag,
    pub search_focus: FocusFlag,
    pub category_focus: FocusFlag,
    pub view_focus: FocusFlag,
    pub results_focus: FocusFlag,
    pub last_area: Rect,
}

impl Default for ListingsState {
    fn default() -> Self {
        Self {
            listings: Vec::new(),
            loading: false,
            error: None,
            view_mode: ViewMode::default(),
            query: ListingQuery::default(),
            search: TextInputState::new(),
            selected: 0,
            container_focus: FocusFlag::named("listings"),
            search_focus: FocusFlag::named("listings.search"),
            category_focus: FocusFlag::named("listings.category"),
            view_focus: FocusFlag::named("listings.view"),
            results_focus: FocusFlag::named("listings.results"),
            last_area: Rect::default(),
        }
    }
}

impl ListingsState {
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn query(&self) -> &ListingQuery {
        &self.query
    }

    pub fn all(&self) -> &[Listing] {
        &self.listings
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Starts a load unless one is already running.
    pub fn request_load(&mut self) -> Vec<Effect> {
        if self.loading {
            return Vec::new();
        }
        self.loading = true;
        vec![Effect::LoadListings]
    }

    /// Applies a load result. Failures keep the previous listings.
    pub fn apply_loaded(&mut self, result: &Result<Vec<Listing>, String>) {
        self.loading = false;
        match result {
            Ok(listings) => {
                self.listings = listings.clone();
                self.error = None;
                self.clamp_selection();
            }
            Err(message) => {
                tracing::warn!(%message, "listings failed to load");
                self.error = Some(message.clone());
            }
        }
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub fn set_view_mode(&mut self, view_mode: ViewMode) {
        self.view_mode = view_mode;
    }

    pub fn toggle_view(&mut self) -> ViewMode {
        self.view_mode = self.view_mode.toggled();
        self.view_mode
    }

    /// Mirrors the search editor into the query.
    pub fn edit_search(&mut self, edit: impl FnOnce(&mut TextInputState)) {
        edit(&mut self.search);
        if self.query.search != self.search.input() {
            self.query.search = self.search.input().to_string();
            self.selected = 0;
        }
    }

    /// Steps through "all" and the categories present in the listings.
    pub fn cycle_category(&mut self, forward: bool) {
        let options = category_options(&self.listings);
        let current = options
            .iter()
            .position(|option| option.eq_ignore_ascii_case(&self.query.category))
            .unwrap_or(0);
        let len = options.len();
        let next = if forward { (current + 1) % len } else { (current + len - 1) % len };
        self.query.category = options[next].clone();
        self.selected = 0;
    }

    /// Listings passing the current query, in feed order.
    pub fn visible(&self) -> Vec<&Listing> {
        self.query.apply(&self.listings)
    }

    /// Map view entries: filtered and nearest first.
    pub fn map_entries(&self) -> Vec<&Listing> {
        by_distance(&self.visible())
    }

    pub fn select_next(&mut self) {
        let len = self.visible().len();
        if len > 0 {
            self.selected = (self.selected + 1).min(len - 1);
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select(&mut self, index: usize) {
        self.selected = index;
        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        let len = self.visible().len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }
}

impl HasFocus for ListingsState {
    fn build(&self, builder: &mut FocusBuilder) {
        let tag = builder.start(self);
        builder.leaf_widget(&self.search_focus);
        builder.leaf_widget(&self.category_focus);
        builder.leaf_widget(&self.view_focus);
        builder.leaf_widget(&self.results_focus);
        builder.end(tag);
    }

    fn focus(&self) -> FocusFlag {
        self.container_focus.clone()
    }

    fn area(&self) -> Rect {
        self.last_area
    }
}

#[cfg(test)]
mod tests {
    use stuffsdrop_api::seed_listings;

    use super::*;

    fn loaded() -> ListingsState {
        let mut state = ListingsState::default();
        assert_eq!(state.request_load(), vec![Effect::LoadListings]);
        assert!(state.request_load().is_empty());
        state.apply_loaded(&Ok(seed_listings()));
        state
    }

    #[test]
    fn load_failure_keeps_previous_listings() {
        let mut state = loaded();
        let count = state.all().len();
        state.request_load();
        state.apply_loaded(&Err("offline".into()));
        assert_eq!(state.error(), Some("offline"));
        assert_eq!(state.all().len(), count);
        assert!(!state.is_loading());
    }

    #[test]
    fn category_cycle_wraps_through_all() {
        let mut state = loaded();
        let options = category_options(state.all());
        for _ in 0..options.len() {
            state.cycle_category(true);
        }
        assert_eq!(state.query().category, "all");
        state.cycle_category(false);
        assert_eq!(&state.query().category, options.last().unwrap());
        assert!(state.visible().iter().all(|l| l.category.eq_ignore_ascii_case(&state.query().category)));
    }

    #[test]
    fn search_filters_and_resets_selection() {
        let mut state = loaded();
        state.select(2);
        state.edit_search(|input| input.set_input("zzz-no-match"));
        assert_eq!(state.selected(), 0);
        assert!(state.visible().is_empty());
        state.select_next();
        assert_eq!(state.selected(), 0);
    }

    #[test]
    fn map_entries_are_sorted_by_distance() {
        let state = loaded();
        let distances: Vec<f64> = state.map_entries().iter().map(|l| l.distance_miles).collect();
        assert!(distances.windows(2).all(|pair| pair[0] <= pair[1]));
    }
}
