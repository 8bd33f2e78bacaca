use actix_web::{HttpResponse, Responder, get, web};

use super::error_response;
use super::models::{AppState, BalanceQuery, BalanceResponse};

#[get("/balance/{address}/")]
pub async fn get_balance(
    state: web::Data<AppState>,
    path: web::Path<(String,)>,
    query: web::Query<BalanceQuery>,
) -> impl Responder {
    let address = path.into_inner().0;

    let ledger = state.ledger.lock().expect("mutex poisoned");
    let balance = match ledger.balance(&address) {
        Ok(balance) => balance,
        Err(e) => return error_response(&e),
    };
    let utxos = if query.utxos {
        match ledger.utxos(&address) {
            Ok(utxos) => Some(utxos),
            Err(e) => return error_response(&e),
        }
    } else {
        None
    };

    HttpResponse::Ok().json(BalanceResponse {
        address,
        balance,
        utxos,
    })
}
