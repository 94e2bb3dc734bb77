pub mod app;
pub mod application;
pub mod domain;
pub mod infrastructure;

pub use crate::app::{bootstrap, init_tracing, UploadFlow};
pub use crate::application::store::{
    ApplicationStore, EventBus, ProgressStatus, StateSnapshot, StateUpdate,
};
pub use crate::domain::error::{AppError, Result};
pub use crate::domain::event::{AppStateEvent, EventPayload, EventType};
pub use crate::domain::validation::ValidationError;
