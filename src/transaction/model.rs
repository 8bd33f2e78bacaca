use serde::{Deserialize, Serialize};

use crate::codec::hash_hex;

/// Fixed reward minted to the block producer.
pub const MINER_REWARD: u64 = 50;

/// Owner recorded on the sentinel input of a reward transaction.
pub const COINBASE_OWNER: &str = "COINBASE";

/// Output index recorded on the sentinel input of a reward transaction.
pub const COINBASE_INDEX: i32 = -1;

/// Identifies a specific transaction output by its tx id and index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutPoint {
    pub tx_id: String,
    pub index: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxIn {
    /// Transaction that produced the output being spent.
    pub tx_id: String,
    pub index: i32,
    /// Address claiming the output. Not authenticated.
    pub owner: String,
}

impl TxIn {
    pub fn coinbase() -> Self {
        Self {
            tx_id: String::new(),
            index: COINBASE_INDEX,
            owner: COINBASE_OWNER.to_string(),
        }
    }

    pub fn is_coinbase(&self) -> bool {
        self.tx_id.is_empty() && self.index == COINBASE_INDEX && self.owner == COINBASE_OWNER
    }

    pub fn outpoint(&self) -> OutPoint {
        OutPoint {
            tx_id: self.tx_id.clone(),
            index: self.index,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxOut {
    pub owner: String,
    pub amount: u64,
}

/// An output nobody has spent yet, neither on chain nor in the mempool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UTxOut {
    pub tx_id: String,
    pub index: i32,
    pub amount: u64,
}

impl UTxOut {
    pub fn outpoint(&self) -> OutPoint {
        OutPoint {
            tx_id: self.tx_id.clone(),
            index: self.index,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tx {
    /// Content hash of timestamp, inputs and outputs.
    pub id: String,
    pub timestamp: i64,
    pub tx_ins: Vec<TxIn>,
    pub tx_outs: Vec<TxOut>,
}

impl Tx {
    /// Build a transaction and compute its id from its content.
    pub fn new(timestamp: i64, tx_ins: Vec<TxIn>, tx_outs: Vec<TxOut>) -> Self {
        let mut tx = Self {
            id: String::new(),
            timestamp,
            tx_ins,
            tx_outs,
        };
        tx.id = tx.compute_id();
        tx
    }

    /// Reward transaction: one sentinel input, `MINER_REWARD` to `miner`.
    pub fn coinbase(miner: &str, timestamp: i64) -> Self {
        Self::new(
            timestamp,
            vec![TxIn::coinbase()],
            vec![TxOut {
                owner: miner.to_string(),
                amount: MINER_REWARD,
            }],
        )
    }

    pub fn is_coinbase(&self) -> bool {
        self.tx_ins.len() == 1 && self.tx_ins[0].is_coinbase()
    }

    pub fn compute_id(&self) -> String {
        let ins = self
            .tx_ins
            .iter()
            .map(|i| format!("{}/{}/{}", i.tx_id, i.index, i.owner))
            .collect::<Vec<_>>()
            .join(",");
        let outs = self
            .tx_outs
            .iter()
            .map(|o| format!("{}/{}", o.owner, o.amount))
            .collect::<Vec<_>>()
            .join(",");
        hash_hex(&format!("{}:[{}]:[{}]", self.timestamp, ins, outs))
    }
}
