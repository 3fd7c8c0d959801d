use std::sync::Arc;

use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use dotenvy::dotenv;
use tracing::info;
use tracing_appender::rolling;

use attendance_core::config::Config;
use attendance_core::ledger::AttendanceLedger;
use attendance_core::leave::LeaveEngine;
use attendance_core::routes;
use attendance_core::store::Store;

#[get("/")]
async fn index() -> impl Responder {
    "attendance-core"
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = Config::from_env();

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .pretty()
        .init();

    info!("Server starting on {}", config.server_addr);

    let store = Arc::new(Store::new());
    let ledger = AttendanceLedger::new(store.clone());
    let engine = LeaveEngine::new(store.clone());

    let server_addr = config.server_addr.clone();
    let config_data = config.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .app_data(Data::from(store.clone()))
            .app_data(Data::new(ledger.clone()))
            .app_data(Data::new(engine.clone()))
            .service(index)
            .configure(|cfg| routes::configure(cfg, config_data.clone()))
    })
    .bind(server_addr)?
    .run()
    .await?;

    Ok(())
}
