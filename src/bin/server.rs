use sheet_planner::api;
use sheet_planner::config::ServerConfig;
use tracing::Level;

#[tokio::main]
async fn main() {
    let config = ServerConfig::from_env();

    let _sentry = config.sentry_dsn.as_deref().map(|dsn| {
        sentry::init((
            dsn,
            sentry::ClientOptions {
                release: sentry::release_name!(),
                ..Default::default()
            },
        ))
    });

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open("development.log")
        .expect("failed to open development.log");

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_target(false)
        .with_ansi(false)
        .with_max_level(Level::INFO)
        .init();

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {addr}: {e}"));
    eprintln!("Listening on {addr}");
    tracing::info!(%addr, sentry = config.sentry_dsn.is_some(), "server started");
    if let Err(e) = axum::serve(listener, api::router()).await {
        tracing::error!(error = %e, "server stopped");
    }
}
