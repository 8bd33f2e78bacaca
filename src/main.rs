mod api;
mod blockchain;
mod clock;
mod codec;
mod config;
mod error;
mod ledger;
mod storage;
mod transaction;

use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use dotenvy::dotenv;
use log::{error, info};

use api::AppState;
use clock::SystemClock;
use config::Config;
use ledger::Ledger;
use storage::SledStore;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let _ = dotenv();
    env_logger::init();

    let config = Config::from_env();

    let ledger = SledStore::open(&config.db_path)
        .and_then(|store| Ledger::open(Arc::new(store), Arc::new(SystemClock), &config.node_address))
        .map_err(|e| {
            error!("cannot open ledger at {}: {e}", config.db_path.display());
            std::io::Error::other(e)
        })?;

    info!(
        "⛓️ Starting ledger API at http://{}:{} (height {}, node address {})",
        config.host,
        config.port,
        ledger.checkpoint().height,
        config.node_address
    );

    let state = web::Data::new(AppState::new(ledger));

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(api::init_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
