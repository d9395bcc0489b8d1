#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod progress_tracker;
pub mod study_session;
pub mod topic_descriptions;

pub use app_services::{AppServices, ServicesConfig};
pub use error::{AppServicesError, SessionError};
pub use progress_tracker::{PersistOutcome, ProgressTracker, ToggleOutcome};
pub use study_session::StudySession;
