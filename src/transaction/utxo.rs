use std::collections::HashSet;

use super::mempool::Mempool;
use super::model::{OutPoint, UTxOut};
use crate::blockchain::Blockchain;
use crate::error::Result;

/// Outputs owned by `address` that no confirmed transaction has consumed and
/// no pending transaction is about to consume.
///
/// Recomputed from the full chain on every call: one walk to collect spent
/// outpoints, a second to collect the owner's outputs. Ordered newest block
/// first, then transaction order, then output order.
pub fn utxos_by_address(
    chain: &Blockchain,
    mempool: &Mempool,
    address: &str,
) -> Result<Vec<UTxOut>> {
    let mut spent = HashSet::<OutPoint>::new();
    for block in chain.blocks() {
        for tx in &block?.transactions {
            for input in tx.tx_ins.iter().filter(|i| !i.is_coinbase()) {
                spent.insert(input.outpoint());
            }
        }
    }

    let mut utxos = Vec::new();
    for block in chain.blocks() {
        for tx in block?.transactions {
            for (index, output) in tx.tx_outs.iter().enumerate() {
                if output.owner != address {
                    continue;
                }
                let utxo = UTxOut {
                    tx_id: tx.id.clone(),
                    index: index as i32,
                    amount: output.amount,
                };
                let outpoint = utxo.outpoint();
                if spent.contains(&outpoint) || mempool.spends(&outpoint) {
                    continue;
                }
                utxos.push(utxo);
            }
        }
    }
    Ok(utxos)
}

pub fn balance_by_address(chain: &Blockchain, mempool: &Mempool, address: &str) -> Result<u64> {
    Ok(utxos_by_address(chain, mempool, address)?
        .iter()
        .map(|u| u.amount)
        .sum())
}
