mod resource_component;

pub use resource_component::ResourceComponent;
