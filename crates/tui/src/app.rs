//! Application state for the StuffsDrop TUI.
//!
//! `App` owns every screen's state machine, the process-wide contexts and the
//! shared backend collaborators. Components mutate it in reaction to input and
//! hand back [`Effect`]s; background results come back through
//! [`App::update`] as [`Msg::ExecCompleted`].

use std::{fmt, rc::Rc, sync::Arc, time::Instant};

use rat_focus::{Focus, FocusBuilder, FocusFlag, HasFocus};
use ratatui::layout::Rect;
use stuffsdrop_api::{AuthProvider, DataProvider};
use stuffsdrop_types::{ContextError, Effect, ExecOutcome, Identity, Modal, Msg, NavigationProvider, Route, ThemeMode};
use stuffsdrop_util::UserPreferences;
use tracing::{debug, info, warn};

use crate::{
    providers::Providers,
    ui::components::{
        common::{ConfirmAction, ConfirmationModalState, TestimonialsState},
        listings::ListingsState,
        login::LoginState,
        register::RegisterState,
        sidebar::{SidebarFocus, SidebarState},
    },
};

/// Number of frames in the execution throbber.
pub const THROBBER_FRAMES: usize = 10;

/// Cross-cutting collaborators owned by the App.
///
/// Everything in here is shared with background tasks, so each collaborator
/// sits behind an `Arc`.
#[derive(Clone)]
pub struct SharedCtx {
    pub navigation: Arc<dyn NavigationProvider>,
    pub auth: Arc<dyn AuthProvider>,
    pub data: Arc<dyn DataProvider>,
    pub preferences: Arc<UserPreferences>,
}

impl SharedCtx {
    pub fn new(
        navigation: Arc<dyn NavigationProvider>,
        auth: Arc<dyn AuthProvider>,
        data: Arc<dyn DataProvider>,
        preferences: Arc<UserPreferences>,
    ) -> Self {
        Self {
            navigation,
            auth,
            data,
            preferences,
        }
    }
}

impl fmt::Debug for SharedCtx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedCtx")
            .field("preferences", &self.preferences.path())
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
pub struct App {
    /// Backend collaborators and preferences
    pub ctx: SharedCtx,
    /// Theme and sidebar-collapse contexts
    pub providers: Providers,
    /// Focus graph, rebuilt before every render
    pub focus: Rc<Focus>,
    pub current_route: Route,
    pub open_modal: Option<Modal>,
    /// Signed-in user, `None` without a session
    pub identity: Option<Identity>,

    pub sidebar: SidebarState,
    pub login: LoginState,
    pub register: RegisterState,
    pub listings: ListingsState,
    pub confirmation: ConfirmationModalState,
    pub testimonials: TestimonialsState,

    /// Whether a background call is in flight
    pub executing: bool,
    /// Animation frame for the execution throbber
    pub throbber_idx: usize,
    /// Last informational message, shown beside the hints
    pub status: Option<String>,

    root_focus: FocusFlag,
}

impl App {
    /// Builds the state for a fresh session. `theme_override` wins over the
    /// persisted theme; both fall back to the default mode.
    pub fn new(ctx: SharedCtx, theme_override: Option<ThemeMode>) -> Self {
        let theme_mode = theme_override.or_else(|| ctx.preferences.theme_mode()).unwrap_or_default();
        let remembered = ctx.preferences.remembered_identifier();
        let sidebar = SidebarState::new(ctx.navigation.menu_items());

        let mut app = Self {
            providers: Providers::new(theme_mode),
            focus: Rc::new(Focus::default()),
            current_route: Route::Login,
            open_modal: None,
            identity: None,
            sidebar,
            login: LoginState::new(remembered),
            register: RegisterState::new(),
            listings: ListingsState::default(),
            confirmation: ConfirmationModalState::default(),
            testimonials: TestimonialsState::default(),
            executing: false,
            throbber_idx: 0,
            status: None,
            root_focus: FocusFlag::named("app"),
            ctx,
        };
        app.focus = Rc::new(FocusBuilder::build_for(&app));
        app
    }

    /// Rebuilds the focus graph after a structural change, dropping focus
    /// from widgets that are no longer part of it.
    pub fn rebuild_focus(&mut self) {
        let old_focus = std::mem::take(&mut self.focus);
        self.focus = Rc::new(FocusBuilder::rebuild_for(self, Some(Rc::unwrap_or_clone(old_focus))));
    }

    /// Applies a message and returns the effects it requests.
    pub fn update(&mut self, msg: &Msg) -> Vec<Effect> {
        match msg {
            Msg::Tick => {
                self.testimonials.tick(Instant::now());
                if self.executing {
                    self.throbber_idx = (self.throbber_idx + 1) % THROBBER_FRAMES;
                }
                Vec::new()
            }
            Msg::Resize(..) => Vec::new(),
            Msg::ExecCompleted(outcome) => self.apply_outcome(outcome),
        }
    }

    fn apply_outcome(&mut self, outcome: &ExecOutcome) -> Vec<Effect> {
        match outcome {
            ExecOutcome::LoggedIn(result) => {
                let mut effects = self.login.complete(result);
                if let Ok(identity) = result {
                    info!(email = %identity.email, "signed in");
                    self.identity = Some(identity.clone());
                    effects.push(Effect::SwitchTo(Route::Feed));
                }
                effects
            }
            ExecOutcome::Registered(result) => {
                if let Err(message) = result {
                    warn!(%message, "registration rejected");
                }
                self.register.complete_submission(result.clone());
                Vec::new()
            }
            ExecOutcome::LoggedOut(result) => {
                match result {
                    Ok(()) => info!("signed out"),
                    Err(message) => warn!(%message, "logout failed; clearing the local session anyway"),
                }
                self.identity = None;
                self.listings = ListingsState::default();
                self.login = LoginState::new(self.ctx.preferences.remembered_identifier());
                // The collapse flag lives for one session.
                if let Ok(sidebar) = self.providers.use_sidebar_mut() {
                    sidebar.set_collapsed(false);
                }
                vec![Effect::SwitchTo(Route::Login)]
            }
            ExecOutcome::IdentityLoaded(identity) => {
                self.identity = identity.clone();
                match identity {
                    Some(identity) => {
                        info!(email = %identity.email, "resumed session");
                        vec![Effect::SwitchTo(Route::Feed)]
                    }
                    None => {
                        debug!("no session; staying on the login screen");
                        Vec::new()
                    }
                }
            }
            ExecOutcome::ListingsLoaded(result) => {
                if let Err(message) = result {
                    warn!(%message, "listings failed to load");
                }
                self.listings.apply_loaded(result);
                Vec::new()
            }
            ExecOutcome::Log(message) => {
                info!(%message);
                self.status = Some(message.clone());
                Vec::new()
            }
        }
    }

    /// Resolves the screen actually shown for `requested` and syncs the
    /// sidebar selection. Screens that need a session redirect to login.
    pub fn enter_route(&mut self, requested: Route) -> Route {
        let route = if !requested.is_public() && self.identity.is_none() {
            debug!(route = %requested.path(), "no session; redirecting to login");
            Route::Login
        } else {
            requested
        };

        if route == Route::Register && self.current_route != Route::Register && self.register.show_verification() {
            self.register = RegisterState::new();
        }

        let selected = self.ctx.navigation.selected_key(&route.path());
        self.sidebar.on_route_change(selected.as_deref());
        self.current_route = route.clone();
        route
    }

    /// Flips the theme and asks for the choice to be persisted.
    pub fn toggle_theme(&mut self) -> Result<Vec<Effect>, ContextError> {
        let mode = self.providers.use_theme_mut()?.toggle();
        Ok(vec![Effect::PersistTheme(mode)])
    }

    pub fn toggle_sidebar(&mut self) -> Result<(), ContextError> {
        let context = self.providers.use_sidebar_mut()?;
        let collapsed = self.sidebar.toggle_collapsed(context);
        if !collapsed {
            self.sidebar.hovered_group = None;
        }
        debug!(collapsed, "sidebar toggled");
        Ok(())
    }

    /// Opens the logout confirmation.
    pub fn request_logout(&mut self) -> Vec<Effect> {
        self.sidebar.request_logout();
        self.confirmation.update_opts(ConfirmationModalState::logout_opts());
        vec![Effect::ShowModal(Modal::Logout)]
    }

    /// Closes the open confirmation; a confirmed logout also signs out.
    pub fn resolve_confirmation(&mut self, action: ConfirmAction) -> Vec<Effect> {
        match action {
            ConfirmAction::Confirm => {
                if self.sidebar.confirm_logout() {
                    vec![Effect::CloseModal, Effect::Logout]
                } else {
                    vec![Effect::CloseModal]
                }
            }
            ConfirmAction::Cancel => {
                self.sidebar.cancel_logout();
                vec![Effect::CloseModal]
            }
        }
    }

    pub fn sidebar_collapsed(&self) -> bool {
        self.providers.use_sidebar().map(|context| context.collapsed()).unwrap_or(false)
    }
}

impl HasFocus for App {
    fn build(&self, builder: &mut FocusBuilder) {
        if self.open_modal.is_some() {
            builder.widget(&self.confirmation);
            return;
        }
        match &self.current_route {
            Route::Login => {
                builder.widget(&self.login);
            }
            Route::Register => {
                builder.widget(&self.register);
            }
            route => {
                builder.widget(&SidebarFocus {
                    state: &self.sidebar,
                    collapsed: self.sidebar_collapsed(),
                });
                if shows_listings(route) {
                    builder.widget(&self.listings);
                }
            }
        }
    }

    fn focus(&self) -> FocusFlag {
        self.root_focus.clone()
    }

    fn area(&self) -> Rect {
        Rect::default()
    }
}

/// Routes rendered by the listings browser.
pub fn shows_listings(route: &Route) -> bool {
    match route {
        Route::Feed => true,
        Route::Resource(name) => name == "map",
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use stuffsdrop_api::{DEMO_EMAIL, DemoBackend};
    use stuffsdrop_types::StaticResources;

    use super::*;

    fn app() -> App {
        let backend = Arc::new(DemoBackend::new());
        let ctx = SharedCtx::new(
            Arc::new(StaticResources),
            backend.clone(),
            backend,
            Arc::new(UserPreferences::ephemeral()),
        );
        App::new(ctx, None)
    }

    fn identity() -> Identity {
        Identity {
            id: "u1".into(),
            email: DEMO_EMAIL.into(),
            ..Default::default()
        }
    }

    #[test]
    fn starts_on_login_with_default_theme() {
        let app = app();
        assert_eq!(app.current_route, Route::Login);
        assert_eq!(app.providers.use_theme().map(|t| t.mode()), Ok(ThemeMode::Light));
        assert!(!app.sidebar_collapsed());
    }

    #[test]
    fn theme_override_beats_preferences() {
        let prefs = UserPreferences::ephemeral();
        prefs.set_theme_mode(ThemeMode::Light).expect("in-memory save");
        let backend = Arc::new(DemoBackend::new());
        let ctx = SharedCtx::new(Arc::new(StaticResources), backend.clone(), backend, Arc::new(prefs));
        let app = App::new(ctx, Some(ThemeMode::Dark));
        assert_eq!(app.providers.use_theme().map(|t| t.mode()), Ok(ThemeMode::Dark));
    }

    #[test]
    fn protected_routes_redirect_without_a_session() {
        let mut app = app();
        assert_eq!(app.enter_route(Route::Feed), Route::Login);

        app.identity = Some(identity());
        assert_eq!(app.enter_route(Route::Resource("saved".into())), Route::Resource("saved".into()));
        assert_eq!(app.sidebar.selected_key(), "saved");
    }

    #[test]
    fn successful_login_stores_identity_and_opens_the_feed() {
        let mut app = app();
        let effects = app.update(&Msg::ExecCompleted(Box::new(ExecOutcome::LoggedIn(Ok(identity())))));
        assert_eq!(app.identity.as_ref().map(|i| i.email.as_str()), Some(DEMO_EMAIL));
        assert!(effects.contains(&Effect::SwitchTo(Route::Feed)));
        assert!(effects.contains(&Effect::RememberIdentifier(None)));
    }

    #[test]
    fn failed_login_keeps_the_user_on_the_form() {
        let mut app = app();
        let effects = app.update(&Msg::ExecCompleted(Box::new(ExecOutcome::LoggedIn(Err("Nope".into())))));
        assert!(effects.is_empty());
        assert!(app.identity.is_none());
        assert_eq!(app.login.errors().get(stuffsdrop_types::FormField::Submit), Some("Nope"));
    }

    #[test]
    fn logout_goes_through_the_confirmation() {
        let mut app = app();
        app.identity = Some(identity());

        assert_eq!(app.request_logout(), vec![Effect::ShowModal(Modal::Logout)]);
        assert_eq!(app.resolve_confirmation(ConfirmAction::Confirm), vec![Effect::CloseModal, Effect::Logout]);
        // A second confirm finds the dialog already closed.
        assert_eq!(app.resolve_confirmation(ConfirmAction::Confirm), vec![Effect::CloseModal]);

        let effects = app.update(&Msg::ExecCompleted(Box::new(ExecOutcome::LoggedOut(Ok(())))));
        assert_eq!(effects, vec![Effect::SwitchTo(Route::Login)]);
        assert!(app.identity.is_none());
    }

    #[test]
    fn cancelled_logout_only_closes_the_dialog() {
        let mut app = app();
        app.request_logout();
        assert_eq!(app.resolve_confirmation(ConfirmAction::Cancel), vec![Effect::CloseModal]);
        assert_eq!(app.resolve_confirmation(ConfirmAction::Confirm), vec![Effect::CloseModal]);
    }

    #[test]
    fn sign_out_expands_the_sidebar_again() {
        let mut app = app();
        app.identity = Some(identity());
        assert_eq!(app.toggle_sidebar(), Ok(()));
        assert!(app.sidebar_collapsed());

        app.update(&Msg::ExecCompleted(Box::new(ExecOutcome::LoggedOut(Ok(())))));
        assert!(!app.sidebar_collapsed());
    }

    #[test]
    fn toggles_flip_the_contexts() {
        let mut app = app();
        assert_eq!(app.toggle_theme(), Ok(vec![Effect::PersistTheme(ThemeMode::Dark)]));
        assert_eq!(app.toggle_sidebar(), Ok(()));
        assert!(app.sidebar_collapsed());
    }

    #[test]
    fn toggles_fail_without_providers() {
        let mut app = app();
        app.providers = Providers::default();
        assert!(matches!(app.toggle_theme(), Err(ContextError::MissingProvider { .. })));
        assert!(app.toggle_sidebar().is_err());
    }

    #[test]
    fn throbber_advances_only_while_executing() {
        let mut app = app();
        app.update(&Msg::Tick);
        assert_eq!(app.throbber_idx, 0);
        app.executing = true;
        for _ in 0..THROBBER_FRAMES + 1 {
            app.update(&Msg::Tick);
        }
        assert_eq!(app.throbber_idx, 1);
    }

    #[test]
    fn listings_route_detection() {
        assert!(shows_listings(&Route::Feed));
        assert!(shows_listings(&Route::Resource("map".into())));
        assert!(!shows_listings(&Route::Resource("saved".into())));
        assert!(!shows_listings(&Route::Login));
    }
}
