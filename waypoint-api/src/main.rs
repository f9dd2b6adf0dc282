use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use waypoint_api::{app, AppState, TableSettings};
use waypoint_store::{AppConfig, HttpEntityClient, HttpOfferSource};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "waypoint_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load()?;
    tracing::info!("Starting Waypoint API on port {}", config.server.port);
    tracing::debug!("Loaded configuration: {:?}", config);

    let entities = HttpEntityClient::new(config.backend.base_url.clone(), config.backend.timeout())?;
    let offers = HttpOfferSource::new(&config.flight_search)?;

    let state = AppState {
        entities: Arc::new(entities),
        offers: Arc::new(offers),
        tables: TableSettings {
            default_page_size: config.table.default_page_size,
            bulk_concurrency: config.bulk.concurrency,
        },
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(state)).await?;
    Ok(())
}
