// src/main.rs

use std::net::SocketAddr;
use std::process;

use axum_server::tls_rustls::RustlsConfig;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use truthquiz::config::Config;
use truthquiz::repository::QuestionRepository;
use truthquiz::routes;
use truthquiz::state::{AppState, QuestionCount};

#[tokio::main]
async fn main() {
    // Load configuration from environment (and .env, if present)
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("failed to initialize app config: {}", e);
            process::exit(1);
        }
    };

    let file_appender = tracing_appender::rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    if let Err(e) = run(config).await {
        tracing::error!("fatal: {}", e);
        process::exit(1);
    }
}

async fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let pool = connect(&config).await?;
    tracing::info!("Connected to database at {}", config.database_path);

    // Run Migrations Automatically
    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Migrations applied successfully.");

    let count = QuestionRepository::new(&pool).count().await?;
    tracing::info!("Question bank holds {} questions", count);

    let state = AppState {
        pool,
        config: config.clone(),
        question_count: QuestionCount::new(count),
    };

    let app = routes::create_router(state).into_make_service_with_connect_info::<SocketAddr>();

    match &config.tls {
        Some(tls) => {
            let rustls = RustlsConfig::from_pem_file(&tls.cert_path, &tls.key_path).await?;
            tracing::info!("Listening on https://{}", config.address);
            axum_server::bind_rustls(config.address, rustls)
                .serve(app)
                .await?;
        }
        None => {
            let listener = tokio::net::TcpListener::bind(config.address).await?;
            tracing::info!("Listening on http://{}", config.address);
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}

async fn connect(config: &Config) -> Result<SqlitePool, sqlx::Error> {
    let mut options = SqliteConnectOptions::new()
        .filename(&config.database_path)
        .create_if_missing(true);

    // Only meaningful when SQLite is built with SQLCipher
    if let Some(password) = &config.database_password {
        options = options.pragma("key", password.clone());
    }

    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
}
