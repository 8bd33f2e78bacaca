use actix_web::{HttpResponse, Responder, get, post, web};
use log::{debug, info};
use std::time::Instant;

use super::error_response;
use super::models::{AppState, MempoolResponse, NewTxRequest, NewTxResponse};

/// Send `amount` from the node address to `to` and queue it in the mempool.
#[post("/transactions/")]
pub async fn post_transaction(
    state: web::Data<AppState>,
    body: web::Json<NewTxRequest>,
) -> impl Responder {
    let t0 = Instant::now();
    debug!("POST /transactions/ - to={} amount={}", body.to, body.amount);

    let to = body.to.trim();
    if to.is_empty() {
        return HttpResponse::BadRequest().body("to required");
    }

    let mut ledger = state.ledger.lock().expect("mutex poisoned");
    match ledger.add_tx(to, body.amount) {
        Ok(tx) => {
            info!(
                "POST /transactions/ - txid={} OK ({} ms, mempool size {})",
                tx.id,
                t0.elapsed().as_millis(),
                ledger.mempool().len()
            );
            HttpResponse::Created().json(NewTxResponse { id: tx.id })
        }
        Err(e) => error_response(&e),
    }
}

/// List the current mempool.
#[get("/mempool/")]
pub async fn get_mempool(state: web::Data<AppState>) -> impl Responder {
    let ledger = state.ledger.lock().expect("mutex poisoned");
    let txs = ledger.mempool().to_vec();
    HttpResponse::Ok().json(MempoolResponse {
        size: txs.len(),
        transactions: txs,
    })
}
