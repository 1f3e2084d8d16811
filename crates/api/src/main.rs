use std::sync::Arc;

use flashstock_api::app;
use flashstock_api::config::Config;
use flashstock_api::seed;
use flashstock_infra::{ExpirySweeper, SweeperConfig};

#[tokio::main]
async fn main() {
    flashstock_observability::init();

    let config = Config::from_env();
    let services = Arc::new(app::build_services(&config));

    if config.seed_demo_data {
        seed::seed_demo_catalog(&services.coordinator);
    }

    let sweeper = ExpirySweeper::spawn(
        services.coordinator.clone(),
        SweeperConfig::default().with_interval(config.sweep_interval),
    );

    let router = app::build_app(services);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {e}", config.bind_addr));

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, router).await.unwrap();

    sweeper.shutdown();
}
