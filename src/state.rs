use crate::storage::Storage;
use crate::tracker::Tracker;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub storage: Storage,
    pub tracker: Arc<Mutex<Tracker>>,
}

impl AppState {
    pub fn new(storage: Storage, tracker: Tracker) -> Self {
        Self {
            storage,
            tracker: Arc::new(Mutex::new(tracker)),
        }
    }
}
