use chrono::Local;
use consumption_tracker::{AppState, Config, Storage, Tracker, logging, router};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let config = Config::from_env();
    let storage = Storage::new(&config.data_dir);
    storage.ensure_dir().await?;
    info!(data_dir = %storage.dir().display(), "using data directory");

    let tracker = Tracker::load(&storage, &Local::now()).await;
    let app = router(AppState::new(storage, tracker));

    let addr = config.addr();
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
}
