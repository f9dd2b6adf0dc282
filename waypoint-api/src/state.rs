use std::sync::Arc;
use waypoint_core::{EntityClient, OfferSource};

#[derive(Debug, Clone, Copy)]
pub struct TableSettings {
    pub default_page_size: usize,
    pub bulk_concurrency: usize,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            default_page_size: 10,
            bulk_concurrency: 3,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub entities: Arc<dyn EntityClient>,
    pub offers: Arc<dyn OfferSource>,
    pub tables: TableSettings,
}
