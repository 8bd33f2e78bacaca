use log::debug;

use super::model::{OutPoint, Tx};

/// Transactions waiting for the next block. Not persisted.
///
/// Not thread-safe; the owner serializes access (the API keeps the whole
/// ledger behind one `Mutex`).
#[derive(Debug, Default)]
pub struct Mempool {
    txs: Vec<Tx>,
}

impl Mempool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a transaction. Validation is the builder's job.
    pub fn add(&mut self, tx: Tx) {
        debug!("mempool: +{} (size {})", tx.id, self.txs.len() + 1);
        self.txs.push(tx);
    }

    /// Drain the pool into the set a new block confirms: every pending
    /// transaction followed by a fresh reward to `miner`.
    pub fn tx_to_confirm(&mut self, miner: &str, timestamp: i64) -> Vec<Tx> {
        self.txs.push(Tx::coinbase(miner, timestamp));
        std::mem::take(&mut self.txs)
    }

    /// Whether a pending transaction already spends `outpoint`.
    pub fn spends(&self, outpoint: &OutPoint) -> bool {
        self.txs
            .iter()
            .flat_map(|tx| tx.tx_ins.iter())
            .any(|input| input.tx_id == outpoint.tx_id && input.index == outpoint.index)
    }

    pub fn transactions(&self) -> &[Tx] {
        &self.txs
    }
}
