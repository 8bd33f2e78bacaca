use actix_web::{HttpResponse, Responder, get, web};

use super::models::{AppState, StatusResponse};

#[get("/status/")]
pub async fn get_status(state: web::Data<AppState>) -> impl Responder {
    let ledger = state.ledger.lock().expect("mutex poisoned");
    let checkpoint = ledger.checkpoint();
    HttpResponse::Ok().json(StatusResponse {
        newest_hash: checkpoint.newest_hash.clone(),
        height: checkpoint.height,
        current_difficulty: checkpoint.current_difficulty,
        mempool_size: ledger.mempool().len(),
        node_address: ledger.address().to_string(),
    })
}
