use std::sync::Arc;

use crate::{config::CatalogSettings, db::Catalog};

/// Shared application state
///
/// The catalogue is immutable after start-up, so handlers read it through
/// the `Arc` without any lock.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub settings: CatalogSettings,
}

impl AppState {
    pub fn new(catalog: Catalog, settings: CatalogSettings) -> Self {
        Self {
            catalog: Arc::new(catalog),
            settings,
        }
    }
}
