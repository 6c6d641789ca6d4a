//! Binary entry point: parse options, set up file logging, start a fresh
//! record store for the session and drive the Ratatui event loop until the
//! user exits.
use chrono::Local;
use clap::Parser;
use distance_log::{logging, run_app, App, RecordStore, Settings};

fn main() -> anyhow::Result<()> {
    let settings = Settings::parse();
    logging::init(&settings);

    let mut app = App::new(RecordStore::new(), Local::now().date_naive());
    run_app(&mut app)
}
