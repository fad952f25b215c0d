//! UI components: sidebar, auth forms, listings, resource views, modals.

pub mod common;
mod component;
pub mod listings;
pub mod login;
pub mod register;
pub mod resource;
pub mod sidebar;

pub(crate) use component::Component;
pub use listings::ListingsComponent;
pub use login::LoginComponent;
pub use register::RegisterComponent;
pub use resource::ResourceComponent;
pub use sidebar::SidebarComponent;
