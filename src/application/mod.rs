pub mod store;
pub mod use_cases;

pub use store::{ApplicationStore, StateUpdate};
pub use use_cases::form_validation::FormValidator;
pub use use_cases::qr_validation::QrConfigValidator;
