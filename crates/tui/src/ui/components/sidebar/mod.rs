mod menu;
mod sidebar_component;
mod state;
mod user_section;

pub use sidebar_component::{COLLAPSED_WIDTH, EXPANDED_WIDTH, SidebarComponent};
pub use state::{SidebarFocus, SidebarState};
