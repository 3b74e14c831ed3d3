//! # Seller Intake Web Application
//!
//! Entry point for the seller verification intake service: receives Webflow
//! form submissions, exposes the review dashboard API, issues badges and
//! runs the needs-info reminder sweep.

#![recursion_limit = "256"]

pub mod api;
pub mod config;
pub mod consts;
pub mod front;
pub mod logger;
pub mod models;
pub mod repo;
pub mod services;
pub mod utils;
pub mod webhook;

use ntex::web;
use ntex_cors::Cors;
use openssl::ssl::{SslAcceptor, SslFiletype, SslMethod};

#[ntex::main]
async fn main() -> anyhow::Result<()> {
    logger::setup_simple_logger()?;

    let app_config = &config::APP_CONFIG;

    // Initialize database connection pool and schema
    let sqlite_repo = repo::sqlite::SqlxSqliteRepo {
        db_pool: utils::setup_sqlite_db_pool(app_config.is_prod()).await?,
    };
    sqlite_repo.ensure_schema().await?;

    // The reminder sweep runs outside the request path with its own
    // repository and notification handles.
    let sweep_repo: repo::ImplAppRepo = Box::new(sqlite_repo.clone());
    let sweep_sink: services::ImplNotificationSink =
        Box::new(services::notification::NotificationHandler::new());
    ntex::rt::spawn(api::reminder::reminder_loop(sweep_repo, sweep_sink));

    configure_and_run_server(sqlite_repo).await
}

/// Configures SSL acceptor for production environments
fn setup_ssl_acceptor() -> anyhow::Result<openssl::ssl::SslAcceptorBuilder> {
    let mut ssl_acceptor = SslAcceptor::mozilla_intermediate(SslMethod::tls_server())
        .map_err(|e| anyhow::anyhow!("Failed to create SSL acceptor: {}", e))?;

    let app_config = &config::APP_CONFIG;
    ssl_acceptor
        .set_private_key_file(&app_config.private_key_path, SslFiletype::PEM)
        .map_err(|e| {
            anyhow::anyhow!(
                "Failed to load private key from {}: {}",
                app_config.private_key_path,
                e
            )
        })?;

    ssl_acceptor
        .set_certificate_file(&app_config.certificate_path, SslFiletype::PEM)
        .map_err(|e| {
            anyhow::anyhow!(
                "Failed to load certificate from {}: {}",
                app_config.certificate_path,
                e
            )
        })?;

    Ok(ssl_acceptor)
}

/// Creates application state from the provided services
fn create_app_state(sqlite_repo: repo::sqlite::SqlxSqliteRepo) -> front::AppState {
    front::AppState {
        repo: Box::new(sqlite_repo),
        notification_sink: Box::new(services::notification::NotificationHandler::new()),
    }
}

/// Configures and starts the web server with appropriate SSL settings
async fn configure_and_run_server(sqlite_repo: repo::sqlite::SqlxSqliteRepo) -> anyhow::Result<()> {
    let app_config = &config::APP_CONFIG;
    let server_addr = (app_config.web_server_host.as_str(), app_config.server_port()?);

    let server = web::server(move || {
        web::App::new()
            .wrap(
                Cors::new()
                    .allowed_methods(vec!["GET", "HEAD", "POST", "OPTIONS", "PATCH"])
                    .allowed_origin("http://localhost:8080")
                    .allowed_origin("http://localhost:3000")
                    .allowed_origin("https://mimmarketplace.com")
                    .allowed_origin("https://mimmarketplace.onrender.com")
                    .finish(),
            )
            .wrap(web::middleware::Logger::default())
            .wrap(web::middleware::Compress::default())
            .state(create_app_state(sqlite_repo.clone()))
            .configure(front::routes::applications)
            .configure(front::routes::badges)
            .configure(front::routes::sellers)
            .configure(webhook::routes::webflow)
            .service((front::server::health,))
    });

    let bound_server = if app_config.is_prod() {
        let ssl_acceptor = setup_ssl_acceptor()?;
        server.bind_openssl(server_addr, ssl_acceptor)?
    } else {
        server.bind(server_addr)?
    };

    log::info!(
        "Starting server on {}:{} (env: {})",
        server_addr.0,
        server_addr.1,
        app_config.env
    );

    bound_server
        .run()
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))
}
