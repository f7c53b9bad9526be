//! phototale web entry point.

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware::Logger, web::Data};
use anyhow::{Context, Result};
use phototale::backend::create_backend;
use phototale::config::AppConfig;
use phototale::web::{AppState, configure};
use tracing::info;

#[actix_web::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = AppConfig::load().context("Failed to load configuration")?;
    let bind_addr = format!("{}:{}", config.server.host, config.server.port);

    let backend = Arc::new(create_backend(&config));
    info!(endpoint = %config.endpoint, "starting server on http://{bind_addr}");

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header();

        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .app_data(Data::new(AppState::new(backend.clone(), ".")))
            .configure(configure)
    })
    .bind(&bind_addr)
    .with_context(|| format!("Failed to bind to {bind_addr}"))?
    .run()
    .await
    .context("Server error")
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("phototale=info,actix_web=info")
            }),
        )
        .init();
}
