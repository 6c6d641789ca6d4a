//! Core library surface for the distance log.
//!
//! The record store is usable on its own; the terminal front-end, settings and
//! logging setup exist so the `bin` target stays a thin bootstrap.
pub mod logging;
pub mod models;
pub mod settings;
pub mod store;
pub mod ui;

/// The domain type every layer passes around.
pub use models::Record;

/// The session's record collection and its error type.
pub use store::{RecordStore, StoreError};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};

pub use settings::Settings;
