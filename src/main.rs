mod config;
mod routes;
mod services;
mod state;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let dotenv = dotenvy::dotenv();
    tracing_subscriber::fmt::init();
    if let Err(e) = dotenv {
        if !e.not_found() {
            tracing::warn!(error = %e, "ignoring unreadable .env file");
        }
    }

    let config = config::Config::from_env();
    let port = config.port;
    tracing::info!(
        levels_dir = %config.levels_dir.display(),
        public_dir = %config.public_dir.display(),
        "level storage configured"
    );

    let state = state::AppState::new(config);
    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;

    tracing::info!(%port, "maze-editor listening");
    axum::serve(listener, app).await
}
