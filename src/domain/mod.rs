pub mod error;
pub mod event;
pub mod form;
pub mod qr;
pub mod rules;
pub mod validation;

// Uploaded CSV data
pub mod csv;
