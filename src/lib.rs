pub mod app;
pub mod config;
pub mod errors;
pub mod event_log;
pub mod format;
pub mod handlers;
pub mod logging;
pub mod models;
pub mod state;
pub mod stats;
pub mod storage;
pub mod tracker;
pub mod ui;

pub use app::router;
pub use config::Config;
pub use state::AppState;
pub use storage::Storage;
pub use tracker::Tracker;
