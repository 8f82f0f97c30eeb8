use std::sync::Arc;

use admission::AdmissionControl;
use config::Config;
use store::CounterBackend;

pub mod admission;
pub mod badge;
pub mod config;
pub mod error;
pub mod middleware;
pub mod router;
pub mod routes;
pub mod store;
pub mod utils;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: Arc<CounterBackend>,
    pub admission: Arc<AdmissionControl>,
}

impl AppState {
    pub fn new(config: Config, store: CounterBackend) -> Self {
        let admission = AdmissionControl::new(config.admission_window());
        Self {
            config,
            store: Arc::new(store),
            admission: Arc::new(admission),
        }
    }
}
