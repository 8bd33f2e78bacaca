use serde::{Deserialize, Serialize};

use super::DIFF_MAX;
use crate::codec::hash_hex;
use crate::transaction::Tx;

/// A single block in the chain holding a list of transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub hash: String,
    /// Empty only for the genesis block.
    pub prev_hash: String,
    pub height: u64,
    /// Difficulty in force when the block was sealed.
    pub difficulty: u32,
    /// Proof-of-work nonce.
    pub nonce: u64,
    /// Unix seconds; strictly increasing along the chain.
    pub timestamp: i64,
    pub data: String,
    pub transactions: Vec<Tx>,
}

impl Block {
    /// Build an unsealed block. Call `mine()` to perform PoW.
    pub fn new(
        height: u64,
        prev_hash: String,
        difficulty: u32,
        timestamp: i64,
        data: String,
        transactions: Vec<Tx>,
    ) -> Self {
        let mut block = Self {
            hash: String::new(),
            prev_hash,
            height,
            difficulty,
            nonce: 0,
            timestamp,
            data,
            transactions,
        };
        block.hash = block.compute_hash();
        block
    }

    pub fn is_genesis(&self) -> bool {
        self.prev_hash.is_empty()
    }

    /// SHA-256 over every field except `hash` itself. Transactions enter
    /// through their ids, which already commit to their content.
    pub fn compute_hash(&self) -> String {
        let tx_ids = self
            .transactions
            .iter()
            .map(|t| t.id.as_str())
            .collect::<Vec<_>>()
            .join(",");
        let preimage = format!(
            "{}:{}:{}:{}:{}:[{}]:{}",
            self.height,
            self.timestamp,
            self.prev_hash,
            self.difficulty,
            self.nonce,
            tx_ids,
            self.data
        );
        hash_hex(&preimage)
    }

    /// Leading hex zeros the hash must carry. The difficulty itself is
    /// unbounded; the search target stops at `DIFF_MAX`.
    pub fn target_zeros(&self) -> usize {
        self.difficulty.min(DIFF_MAX) as usize
    }

    /// Find a nonce that yields a hash starting with `target_zeros()`
    /// leading zeros (in hex).
    pub fn mine(&mut self) {
        let target_prefix = "0".repeat(self.target_zeros());
        loop {
            self.hash = self.compute_hash();
            if self.hash.starts_with(&target_prefix) {
                break;
            }
            self.nonce = self.nonce.wrapping_add(1);
        }
    }

    /// Cached `hash` matches the content and satisfies the block's own
    /// target. Does NOT validate chain linkage.
    pub fn is_valid(&self) -> bool {
        if self.hash != self.compute_hash() {
            return false;
        }
        self.hash
            .chars()
            .take(self.target_zeros())
            .all(|c| c == '0')
    }
}
