use crate::calendar::Clock;
use crate::storage::Store;

#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub clock: Clock,
}

impl AppState {
    pub fn new(store: Store, clock: Clock) -> Self {
        Self { store, clock }
    }
}
