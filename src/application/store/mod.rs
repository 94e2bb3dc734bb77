// ============================================================
// APPLICATION STATE STORE
// ============================================================
// Wizard state container with its event bus and cascading validation

mod application_store;
mod event_bus;

pub use application_store::{
    ApplicationStore, ProgressStatus, StateSnapshot, StateUpdate, NO_QR_DATA_MESSAGE,
};
pub use event_bus::EventBus;
