use crate::ledger::Ledger;
use crate::transaction::UTxOut;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// Shared application state. Chain and mempool sit behind one lock so every
/// request sees them from the same snapshot.
pub struct AppState {
    pub ledger: Mutex<Ledger>,
}

impl AppState {
    pub fn new(ledger: Ledger) -> Self {
        Self {
            ledger: Mutex::new(ledger),
        }
    }
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/* ---------- Docs ---------- */

#[derive(Serialize)]
pub struct UrlDescription {
    pub url: &'static str,
    pub method: &'static str,
    pub description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<&'static str>,
}

/* ---------- Chain API Models ---------- */

#[derive(Deserialize)]
pub struct AddBlockRequest {
    #[serde(default)]
    pub data: String,
}

#[derive(Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub height: u64,
    pub difficulty: u32,
}

#[derive(Serialize)]
pub struct StatusResponse {
    pub newest_hash: String,
    pub height: u64,
    pub current_difficulty: u32,
    pub mempool_size: usize,
    pub node_address: String,
}

/* ---------- TX API Models ---------- */

#[derive(Deserialize)]
pub struct NewTxRequest {
    pub to: String,
    pub amount: u64,
}

#[derive(Serialize)]
pub struct NewTxResponse {
    pub id: String,
}

#[derive(Serialize)]
pub struct MempoolResponse {
    pub size: usize,
    pub transactions: Vec<crate::transaction::Tx>,
}

/* ---------- Balance API Models ---------- */

#[derive(Deserialize)]
pub struct BalanceQuery {
    #[serde(default)]
    pub utxos: bool,
}

#[derive(Serialize)]
pub struct BalanceResponse {
    pub address: String,
    pub balance: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utxos: Option<Vec<UTxOut>>,
}
