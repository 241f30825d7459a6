use tracing::info;

use crate::api;
use crate::cli::commands::ServeArgs;
use crate::errors::QrTraceError;

pub async fn handle_serve(args: ServeArgs) -> Result<(), QrTraceError> {
    let mut config = super::load_config(args.config.as_deref()).await?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    let db = super::open_database(&config)?;
    let pipeline = super::build_pipeline(db.clone(), &config)?;
    let state = api::AppState::new(db, config.clone(), pipeline);
    let app = api::build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| QrTraceError::Internal(format!("Server error: {}", e)))?;

    Ok(())
}
