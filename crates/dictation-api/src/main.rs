//! dictation-api - HTTP API server for the dictation backend

use std::path::Path;
use std::sync::Arc;

use tokio::{net::TcpListener, signal};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::writer::BoxMakeWriter, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

use dictation_api::config::{LogConfig, LogFormat};
use dictation_api::{router, AppState, Config};
use dictation_db::Database;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    let _file_guard = init_tracing(&config.log)?;
    info!(
        data_root = %config.data_root.display(),
        frontend_url = %config.frontend_url,
        "Configuration loaded"
    );

    info!(
        max_connections = config.db_max_connections,
        "Connecting to database..."
    );
    let db = Database::connect_with_config(&config.database_url, config.pool_config()).await?;
    db.migrate().await?;
    info!("Database ready");

    let state = AppState::new(&config.data_root, Arc::new(db.favorites.clone()));
    let app = router(state, &config.frontend_url);

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server running on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server stopped");
    Ok(())
}

/// Install the global subscriber described by `log`.
///
/// Returns the appender guard when logging to a file; it must live until
/// shutdown so buffered lines are flushed.
fn init_tracing(log: &LogConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::builder().parse_lossy(&log.filter);

    let (writer, guard) = match &log.file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            let name = path
                .file_name()
                .ok_or_else(|| anyhow::anyhow!("LOG_FILE has no file name: {}", path.display()))?;
            let (non_blocking, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, name));
            (BoxMakeWriter::new(non_blocking), Some(guard))
        }
        None => (BoxMakeWriter::new(std::io::stdout), None),
    };

    let ansi = log.use_ansi();
    let layer = match log.format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_writer(writer)
            .with_ansi(ansi)
            .boxed(),
        LogFormat::Text => tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_ansi(ansi)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .init();

    let destination = match &log.file {
        Some(path) => path.display().to_string(),
        None => "(stdout)".to_string(),
    };
    info!(log_format = ?log.format, log_file = %destination, "Logging initialized");
    Ok(guard)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
