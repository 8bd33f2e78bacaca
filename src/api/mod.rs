mod balance;
mod blocks;
mod docs;
mod health;
pub mod models;
mod status;
mod tx;

use actix_web::HttpResponse;
use actix_web::web::{self, ServiceConfig};
use log::error;

use crate::error::LedgerError;
use models::ErrorResponse;

pub use models::AppState;

pub fn init_routes(cfg: &mut ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .service(docs::documentation)
            .service(health::health_check)
            .service(blocks::get_blocks)
            .service(blocks::post_block)
            .service(blocks::get_block)
            .service(blocks::validate_chain)
            .service(status::get_status)
            .service(balance::get_balance)
            .service(tx::post_transaction)
            .service(tx::get_mempool),
    );
}

/// Map a ledger failure onto a response. Caller mistakes become 400s;
/// storage and decoding failures are logged and surface as 500s.
fn error_response(err: &LedgerError) -> HttpResponse {
    let body = ErrorResponse {
        error: err.to_string(),
    };
    if err.is_recoverable() {
        return HttpResponse::BadRequest().json(body);
    }
    error!("ledger failure: {err}");
    HttpResponse::InternalServerError().json(body)
}
