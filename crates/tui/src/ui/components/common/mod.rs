mod confirmation_modal;

pub mod form_field;
pub mod testimonials;
pub mod text_input;

pub use confirmation_modal::{ConfirmAction, ConfirmationModal, ConfirmationModalState};
pub use testimonials::TestimonialsState;
pub use text_input::TextInputState;
