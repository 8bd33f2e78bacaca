use actix_web::{HttpResponse, Responder, get};

use super::models::UrlDescription;

/// Self-describing list of endpoints.
#[get("/")]
pub async fn documentation() -> impl Responder {
    let endpoint = |url, method, description, payload| UrlDescription {
        url,
        method,
        description,
        payload,
    };
    HttpResponse::Ok().json([
        endpoint("/api/v1/", "GET", "See documentation", None),
        endpoint("/api/v1/status/", "GET", "See the chain checkpoint", None),
        endpoint("/api/v1/blocks/", "GET", "See all blocks, newest first", None),
        endpoint(
            "/api/v1/blocks/",
            "POST",
            "Seal a block from the mempool",
            Some("data:string"),
        ),
        endpoint("/api/v1/blocks/{hash}/", "GET", "See a block", None),
        endpoint("/api/v1/validate/", "GET", "Validate the whole chain", None),
        endpoint(
            "/api/v1/balance/{address}/",
            "GET",
            "Balance of an address (?utxos=true lists outputs)",
            None,
        ),
        endpoint("/api/v1/mempool/", "GET", "See pending transactions", None),
        endpoint(
            "/api/v1/transactions/",
            "POST",
            "Send from the node address",
            Some("to:string, amount:int"),
        ),
    ])
}
