use std::sync::Arc;

use log::{info, warn};

use crate::blockchain::{Block, Blockchain, Bootstrap, Checkpoint};
use crate::clock::Clock;
use crate::error::Result;
use crate::storage::Store;
use crate::transaction::{self, Mempool, Tx, UTxOut};

/// Chain state and mempool of one node, plus the node's own address, which
/// both pays for `add_tx` and collects block rewards.
pub struct Ledger {
    chain: Blockchain,
    mempool: Mempool,
    address: String,
}

impl Ledger {
    pub fn open(store: Arc<dyn Store>, clock: Arc<dyn Clock>, address: &str) -> Result<Self> {
        let (chain, bootstrap) = Blockchain::open(store, clock)?;
        if bootstrap == Bootstrap::Genesis {
            info!("new chain initialised for {address}");
        }
        Ok(Self {
            chain,
            mempool: Mempool::new(),
            address: address.to_string(),
        })
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn checkpoint(&self) -> &Checkpoint {
        self.chain.checkpoint()
    }

    /// Confirm everything pending, plus a reward to this node, in a new block.
    /// The reward shares the block's timestamp, which is unique per block, so
    /// no two rewards get the same id.
    pub fn add_block(&mut self, data: &str) -> Result<Block> {
        let timestamp = self.chain.next_timestamp()?;
        let txs = self.mempool.tx_to_confirm(&self.address, timestamp);
        let block = self.chain.add_block_at(timestamp, data.to_string(), txs)?;
        info!(
            "block #{} sealed: hash={} difficulty={} transfers={}",
            block.height,
            block.hash,
            block.difficulty,
            block.transactions.iter().filter(|tx| !tx.is_coinbase()).count()
        );
        Ok(block)
    }

    /// Full chain, newest first.
    pub fn blocks(&self) -> Result<Vec<Block>> {
        self.chain.blocks().collect()
    }

    pub fn block(&self, hash: &str) -> Result<Block> {
        self.chain.find_block(hash)
    }

    pub fn is_valid_chain(&self) -> Result<bool> {
        self.chain.is_valid_chain()
    }

    pub fn utxos(&self, address: &str) -> Result<Vec<UTxOut>> {
        transaction::utxos_by_address(&self.chain, &self.mempool, address)
    }

    pub fn balance(&self, address: &str) -> Result<u64> {
        transaction::balance_by_address(&self.chain, &self.mempool, address)
    }

    /// Send `amount` from this node's address to `to` and queue it.
    pub fn add_tx(&mut self, to: &str, amount: u64) -> Result<Tx> {
        let utxos = self.utxos(&self.address)?;
        let tx = transaction::make_transfer(&self.address, to, amount, &utxos, self.chain.now())
            .inspect_err(|e| warn!("transfer {} -> {to} of {amount} rejected: {e}", self.address))?;
        self.mempool.add(tx.clone());
        Ok(tx)
    }

    pub fn mempool(&self) -> &[Tx] {
        self.mempool.transactions()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::clock::SystemClock;
    use crate::clock::testing::StepClock;
    use crate::error::LedgerError;
    use crate::storage::SledStore;
    use crate::transaction::model::MINER_REWARD;

    fn open(dir: &tempfile::TempDir) -> Ledger {
        open_with(dir, Arc::new(SystemClock))
    }

    fn open_with(dir: &tempfile::TempDir, clock: Arc<dyn Clock>) -> Ledger {
        let store = Arc::new(SledStore::open(dir.path().join("db")).unwrap());
        Ledger::open(store, clock, "nico").unwrap()
    }

    /// Clock that never moves, as when several blocks land in one second.
    fn frozen() -> Arc<dyn Clock> {
        Arc::new(StepClock::new(1_700_000_000, 0))
    }

    fn assert_no_repeated_inputs(tx: &Tx) {
        let mut seen = HashSet::new();
        for input in &tx.tx_ins {
            assert!(seen.insert(input.outpoint()), "{} spends {:?} twice", tx.id, input);
        }
    }

    #[test]
    fn fresh_ledger_has_only_genesis() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = open(&dir);

        let blocks = ledger.blocks().unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].height, 0);
        assert_eq!(blocks[0].difficulty, 2);
        assert_eq!(ledger.balance("nico").unwrap(), 0);
        assert_eq!(ledger.balance("anyone").unwrap(), 0);
    }

    #[test]
    fn four_blocks_pay_four_rewards() {
        let dir = tempfile::tempdir().unwrap();
        let mut ledger = open(&dir);
        for i in 0..4 {
            ledger.add_block(&format!("block {i}")).unwrap();
        }

        assert_eq!(ledger.checkpoint().height, 4);
        assert_eq!(ledger.balance("nico").unwrap(), 4 * MINER_REWARD);
        assert_eq!(ledger.balance("nico").unwrap(), 200);
        assert!(ledger.is_valid_chain().unwrap());
    }

    #[test]
    fn transfer_confirms_with_change() {
        let dir = tempfile::tempdir().unwrap();
        let mut ledger = open(&dir);
        ledger.add_block("").unwrap();
        ledger.add_block("").unwrap();

        let tx = ledger.add_tx("bob", 70).unwrap();
        assert_eq!(tx.tx_ins.len(), 2);
        assert_eq!(tx.tx_outs[0].amount, 30);
        assert_eq!(ledger.mempool().len(), 1);

        // both rewards are in flight: nothing left to spend
        assert_eq!(ledger.balance("nico").unwrap(), 0);
        assert!(matches!(
            ledger.add_tx("carol", 1),
            Err(LedgerError::InsufficientFunds { have: 0, need: 1 })
        ));

        let block = ledger.add_block("transfer").unwrap();
        assert_eq!(block.transactions.len(), 2);
        assert!(ledger.mempool().is_empty());
        assert_eq!(ledger.balance("bob").unwrap(), 70);
        assert_eq!(ledger.balance("nico").unwrap(), 30 + MINER_REWARD);
    }

    #[test]
    fn rejected_transfer_changes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut ledger = open(&dir);
        ledger.add_block("").unwrap();

        let err = ledger.add_tx("bob", 51).unwrap_err();
        assert_eq!(err, LedgerError::InsufficientFunds { have: 50, need: 51 });
        assert!(ledger.mempool().is_empty());
        assert_eq!(ledger.balance("nico").unwrap(), 50);
    }

    #[test]
    fn block_lookup_by_hash() {
        let dir = tempfile::tempdir().unwrap();
        let mut ledger = open(&dir);
        let block = ledger.add_block("find me").unwrap();

        assert_eq!(ledger.block(&block.hash).unwrap(), block);
        assert!(matches!(ledger.block("nope"), Err(LedgerError::NotFound(_))));
    }

    #[test]
    fn restart_reproduces_chain_and_drops_mempool() {
        let dir = tempfile::tempdir().unwrap();
        let (checkpoint, blocks) = {
            let mut ledger = open(&dir);
            ledger.add_block("one").unwrap();
            ledger.add_block("two").unwrap();
            ledger.add_tx("bob", 10).unwrap();
            (ledger.checkpoint().clone(), ledger.blocks().unwrap())
        };

        let ledger = open(&dir);
        assert_eq!(ledger.checkpoint(), &checkpoint);
        assert_eq!(ledger.blocks().unwrap(), blocks);
        assert!(ledger.mempool().is_empty());
        assert_eq!(ledger.balance("nico").unwrap(), 100);
    }

    #[test]
    fn rewards_sealed_in_one_second_stay_distinct() {
        let dir = tempfile::tempdir().unwrap();
        let mut ledger = open_with(&dir, frozen());
        ledger.add_block("").unwrap();
        ledger.add_block("").unwrap();

        let utxos = ledger.utxos("nico").unwrap();
        assert_eq!(utxos.len(), 2);
        assert_ne!(utxos[0].tx_id, utxos[1].tx_id);
        assert_eq!(ledger.balance("nico").unwrap(), 2 * MINER_REWARD);
    }

    #[test]
    fn transfer_under_frozen_clock_keeps_every_coin() {
        let dir = tempfile::tempdir().unwrap();
        let mut ledger = open_with(&dir, frozen());
        ledger.add_block("").unwrap();
        ledger.add_block("").unwrap();

        let tx = ledger.add_tx("bob", 10).unwrap();
        assert_eq!(tx.tx_ins.len(), 1);
        assert_no_repeated_inputs(&tx);
        // the untouched reward stays spendable while the transfer is pending
        assert_eq!(ledger.balance("nico").unwrap(), MINER_REWARD);

        ledger.add_block("").unwrap();
        assert_eq!(ledger.balance("bob").unwrap(), 10);
        assert_eq!(ledger.balance("nico").unwrap(), 3 * MINER_REWARD - 10);

        let everything = ledger.add_tx("bob", 3 * MINER_REWARD - 10).unwrap();
        assert_eq!(everything.tx_ins.len(), 3);
        assert_no_repeated_inputs(&everything);
        ledger.add_block("").unwrap();
        assert_eq!(ledger.balance("bob").unwrap(), 3 * MINER_REWARD);
        assert_eq!(ledger.balance("nico").unwrap(), MINER_REWARD);

        for block in ledger.blocks().unwrap() {
            for tx in &block.transactions {
                assert_no_repeated_inputs(tx);
            }
        }
        assert!(ledger.is_valid_chain().unwrap());
    }
}
