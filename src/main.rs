use clap::Parser;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use abhyasa::auth::AuthKeys;
use abhyasa::config::{self, CliArgs};
use abhyasa::{create_app, db, run_migrations, AppState};

/// Initializes the tracing subscriber
///
/// Log lines always go to stdout; when a log file is configured a daily
/// rolling file layer is added as well. The returned guard must be held
/// for the lifetime of the process so buffered log lines are flushed.
fn init_logging(log_file: Option<&Path>) -> Option<WorkerGuard> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match log_file {
        Some(path) => {
            let directory = path.parent().filter(|p| !p.as_os_str().is_empty());
            let file_name = path
                .file_name()
                .map(|name| name.to_os_string())
                .unwrap_or_else(|| "abhyasa.log".into());
            let appender =
                tracing_appender::rolling::daily(directory.unwrap_or(Path::new(".")), file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);

            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(writer)
                        .with_ansi(false),
                )
                .init();

            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .init();

            None
        }
    }
}

#[tokio::main]
async fn main() {
    // Load environment variables before clap reads them
    if std::fs::metadata(".env").is_ok() {
        dotenv::dotenv().ok();
    }

    let args = CliArgs::parse();
    let config = config::get_config(args);

    // Keep the guard alive so the file appender flushes on shutdown
    let _guard = init_logging(config.log_file.as_deref());

    let secret = match &config.jwt_secret {
        Some(secret) => secret.clone(),
        None => {
            warn!("JWT_SECRET is not set, using an insecure development secret");
            "abhyasa-dev-secret".to_string()
        }
    };

    // Initialize the database pool and bring the schema up to date
    let pool = Arc::new(db::init_pool(&config.database_url));
    {
        let conn = &mut pool
            .get()
            .expect("Failed to get a database connection for migrations");
        run_migrations(conn);
    }
    info!("Database ready at {}", config.database_url);

    let app = create_app(AppState {
        pool,
        auth: AuthKeys::new(&secret),
    });

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind server address");
    axum::serve(listener, app)
        .await
        .expect("Server error");
}
