mod listings_component;
mod state;

pub use listings_component::ListingsComponent;
pub use state::ListingsState;
