pub mod error;
pub mod store;

pub use error::StoreError;
pub use store::ClinicStore;

use shared_config::AppConfig;

/// Shared application state handed to every router.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub store: ClinicStore,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            store: ClinicStore::new(),
        }
    }
}
