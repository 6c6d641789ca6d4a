//! Ratatui front-end for the distance log. The record table is the only
//! screen; adding, editing and removing happen in modal overlays on top of it.
//! Every mutation goes through the [`RecordStore`](crate::store::RecordStore)
//! owned by [`App`].

mod app;
mod forms;
mod helpers;
mod terminal;

pub use app::App;
pub use terminal::run_app;
