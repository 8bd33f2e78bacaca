use actix_web::{HttpResponse, Responder, get, post, web};
use log::{debug, error, info};

use super::error_response;
use super::models::{AddBlockRequest, AppState, ErrorResponse, ValidateResponse};
use crate::error::LedgerError;

/// Every block, newest first.
#[get("/blocks/")]
pub async fn get_blocks(state: web::Data<AppState>) -> impl Responder {
    let ledger = state.ledger.lock().expect("mutex poisoned");
    match ledger.blocks() {
        Ok(blocks) => HttpResponse::Ok().json(blocks),
        Err(e) => error_response(&e),
    }
}

/// Seal a block confirming the current mempool plus a reward to this node.
/// The nonce search runs on the blocking pool, not on the async worker.
#[post("/blocks/")]
pub async fn post_block(
    state: web::Data<AppState>,
    body: web::Json<AddBlockRequest>,
) -> impl Responder {
    let data = body.into_inner().data;
    let sealed = web::block(move || {
        let mut ledger = state.ledger.lock().expect("mutex poisoned");
        debug!(
            "POST /blocks/ - sealing with {} pending txs",
            ledger.mempool().len()
        );
        ledger.add_block(&data)
    })
    .await;

    match sealed {
        Ok(Ok(block)) => {
            info!("POST /blocks/ - block #{} {}", block.height, block.hash);
            HttpResponse::Created().json(block)
        }
        Ok(Err(e)) => error_response(&e),
        Err(e) => {
            error!("POST /blocks/ - sealing task failed: {e}");
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: e.to_string(),
            })
        }
    }
}

#[get("/blocks/{hash}/")]
pub async fn get_block(state: web::Data<AppState>, path: web::Path<(String,)>) -> impl Responder {
    let hash = path.into_inner().0;
    let ledger = state.ledger.lock().expect("mutex poisoned");
    match ledger.block(&hash) {
        Ok(block) => HttpResponse::Ok().json(block),
        Err(e @ LedgerError::NotFound(_)) => HttpResponse::NotFound().json(ErrorResponse {
            error: e.to_string(),
        }),
        Err(e) => error_response(&e),
    }
}

/// Validate the whole chain.
#[get("/validate/")]
pub async fn validate_chain(state: web::Data<AppState>) -> impl Responder {
    let ledger = state.ledger.lock().expect("mutex poisoned");
    match ledger.is_valid_chain() {
        Ok(valid) => {
            let checkpoint = ledger.checkpoint();
            HttpResponse::Ok().json(ValidateResponse {
                valid,
                height: checkpoint.height,
                difficulty: checkpoint.current_difficulty,
            })
        }
        Err(e) => error_response(&e),
    }
}
