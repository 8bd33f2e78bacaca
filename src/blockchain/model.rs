use std::sync::Arc;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::{
    ALLOWED_RANGE_MINUTES, BLOCK_INTERVAL_MINUTES, Block, DEFAULT_DIFFICULTY, DIFF_MIN,
    DIFFICULTY_INTERVAL,
};
use crate::clock::Clock;
use crate::codec;
use crate::error::{LedgerError, Result};
use crate::storage::{Bucket, CHECKPOINT_KEY, Store};
use crate::transaction::Tx;

/// Persisted chain summary. Block bodies live separately, keyed by hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub newest_hash: String,
    pub height: u64,
    pub current_difficulty: u32,
}

/// How [`Blockchain::open`] reached the ready state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bootstrap {
    /// No checkpoint was stored; a genesis block was sealed.
    Genesis,
    /// The stored checkpoint was decoded.
    Restored,
}

/// Linear retarget: one step up if the window was mined at least
/// `ALLOWED_RANGE_MINUTES` faster than expected, one step down if at least
/// that much slower.
pub fn retarget(current: u32, newest_timestamp: i64, anchor_timestamp: i64) -> u32 {
    let actual_minutes = (newest_timestamp - anchor_timestamp) / 60;
    let expected_minutes = DIFFICULTY_INTERVAL as i64 * BLOCK_INTERVAL_MINUTES;

    if actual_minutes <= expected_minutes - ALLOWED_RANGE_MINUTES {
        current + 1
    } else if actual_minutes >= expected_minutes + ALLOWED_RANGE_MINUTES {
        current.saturating_sub(1).max(DIFF_MIN)
    } else {
        current
    }
}

/// Hash-linked chain stored in a [`Store`], tracked by its checkpoint.
pub struct Blockchain {
    store: Arc<dyn Store>,
    clock: Arc<dyn Clock>,
    checkpoint: Checkpoint,
}

impl Blockchain {
    /// Restore the chain from the stored checkpoint, or seal a genesis block
    /// if the store is empty.
    pub fn open(store: Arc<dyn Store>, clock: Arc<dyn Clock>) -> Result<(Self, Bootstrap)> {
        match store.get(Bucket::Meta, CHECKPOINT_KEY)? {
            Some(bytes) => {
                let checkpoint: Checkpoint = codec::decode(&bytes)?;
                info!(
                    "restored chain: height={} difficulty={} tip={}",
                    checkpoint.height, checkpoint.current_difficulty, checkpoint.newest_hash
                );
                let chain = Self {
                    store,
                    clock,
                    checkpoint,
                };
                Ok((chain, Bootstrap::Restored))
            }
            None => {
                let genesis = Block::new(
                    0,
                    String::new(),
                    DEFAULT_DIFFICULTY,
                    clock.now(),
                    String::new(),
                    Vec::new(),
                );
                let mut chain = Self {
                    store,
                    clock,
                    checkpoint: Checkpoint {
                        newest_hash: String::new(),
                        height: 0,
                        current_difficulty: DEFAULT_DIFFICULTY,
                    },
                };
                let genesis = chain.seal(genesis)?;
                info!("sealed genesis block {}", genesis.hash);
                Ok((chain, Bootstrap::Genesis))
            }
        }
    }

    pub fn checkpoint(&self) -> &Checkpoint {
        &self.checkpoint
    }

    pub fn now(&self) -> i64 {
        self.clock.now()
    }

    /// Timestamp for the next block: the clock, but always at least one
    /// second past the tip so two blocks never share a timestamp.
    pub fn next_timestamp(&self) -> Result<i64> {
        let tip = self.find_block(&self.checkpoint.newest_hash)?;
        Ok(self.clock.now().max(tip.timestamp + 1))
    }

    /// Seal a new block on top of the tip and persist it with the new
    /// checkpoint.
    pub fn add_block(&mut self, data: String, transactions: Vec<Tx>) -> Result<Block> {
        let timestamp = self.next_timestamp()?;
        self.add_block_at(timestamp, data, transactions)
    }

    /// Like [`Blockchain::add_block`] with a timestamp taken earlier from
    /// [`Blockchain::next_timestamp`], so the caller can stamp the block's
    /// transactions with the same value.
    pub fn add_block_at(
        &mut self,
        timestamp: i64,
        data: String,
        transactions: Vec<Tx>,
    ) -> Result<Block> {
        let height = self.checkpoint.height + 1;
        let difficulty = self.difficulty_for(height)?;
        let block = Block::new(
            height,
            self.checkpoint.newest_hash.clone(),
            difficulty,
            timestamp,
            data,
            transactions,
        );
        self.seal(block)
    }

    /// Mine `block`, write its body, then advance and write the checkpoint.
    fn seal(&mut self, mut block: Block) -> Result<Block> {
        block.mine();
        self.store
            .put(Bucket::Blocks, block.hash.as_bytes(), &codec::encode(&block)?)?;

        let next = Checkpoint {
            newest_hash: block.hash.clone(),
            height: block.height,
            current_difficulty: block.difficulty,
        };
        self.store
            .put(Bucket::Meta, CHECKPOINT_KEY, &codec::encode(&next)?)?;
        self.checkpoint = next;

        debug!(
            "sealed block #{} (hash={}, nonce={}, difficulty={}, txs={})",
            block.height,
            block.hash,
            block.nonce,
            block.difficulty,
            block.transactions.len()
        );
        Ok(block)
    }

    /// Difficulty for the block that will sit at `next_height`.
    pub fn difficulty_for(&self, next_height: u64) -> Result<u32> {
        if next_height == 0 {
            return Ok(DEFAULT_DIFFICULTY);
        }
        let current = self.checkpoint.current_difficulty;
        if next_height % DIFFICULTY_INTERVAL != 0 {
            return Ok(current);
        }

        // Newest first: [next_height - 1, ..., next_height - DIFFICULTY_INTERVAL]
        let window = self
            .blocks()
            .take(DIFFICULTY_INTERVAL as usize)
            .collect::<Result<Vec<_>>>()?;
        let (Some(newest), Some(anchor)) = (window.first(), window.last()) else {
            return Ok(current);
        };

        let next = retarget(current, newest.timestamp, anchor.timestamp);
        if next != current {
            info!(
                "difficulty retarget at height {}: {} -> {} (window {}s)",
                next_height,
                current,
                next,
                newest.timestamp - anchor.timestamp
            );
        }
        Ok(next)
    }

    /// Look up a single block body by hash.
    pub fn find_block(&self, hash: &str) -> Result<Block> {
        find_block(self.store.as_ref(), hash)
    }

    /// Walk from the tip back to genesis, newest first.
    pub fn blocks(&self) -> Blocks<'_> {
        Blocks {
            store: self.store.as_ref(),
            cursor: Some(self.checkpoint.newest_hash.clone()),
        }
    }

    /// Validate the whole chain: hashes, PoW, linkage and genesis.
    pub fn is_valid_chain(&self) -> Result<bool> {
        let mut expected_height = self.checkpoint.height;
        let mut expected_hash = self.checkpoint.newest_hash.clone();

        for block in self.blocks() {
            let block = block?;
            if block.hash != expected_hash || block.height != expected_height || !block.is_valid() {
                return Ok(false);
            }
            if block.is_genesis() {
                return Ok(block.height == 0);
            }
            if block.height == 0 {
                return Ok(false);
            }
            expected_height -= 1;
            expected_hash = block.prev_hash;
        }
        Ok(false)
    }
}

fn find_block(store: &dyn Store, hash: &str) -> Result<Block> {
    match store.get(Bucket::Blocks, hash.as_bytes())? {
        Some(bytes) => codec::decode(&bytes),
        None => Err(LedgerError::NotFound(hash.to_string())),
    }
}

/// Lazy newest-first walk over the stored chain. A missing block is
/// reported once and ends the walk.
pub struct Blocks<'a> {
    store: &'a dyn Store,
    cursor: Option<String>,
}

impl Iterator for Blocks<'_> {
    type Item = Result<Block>;

    fn next(&mut self) -> Option<Self::Item> {
        let hash = self.cursor.take()?;
        match find_block(self.store, &hash) {
            Ok(block) => {
                if !block.is_genesis() {
                    self.cursor = Some(block.prev_hash.clone());
                }
                Some(Ok(block))
            }
            Err(e) => Some(Err(e)),
        }
    }
}
