pub mod column_selection;
pub mod form_validation;
pub mod qr_defaults;
pub mod qr_validation;
