pub mod app_config;
pub mod http_client;
pub mod offer_client;

pub use app_config::AppConfig;
pub use http_client::HttpEntityClient;
pub use offer_client::HttpOfferSource;
