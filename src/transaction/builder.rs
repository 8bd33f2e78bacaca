use std::collections::HashSet;

use super::model::{Tx, TxIn, TxOut, UTxOut};
use crate::error::{LedgerError, Result};

/// Build a transfer of `amount` from `from` to `to`, spending `utxos` in
/// the order given until the amount is covered (first fit). Any surplus
/// goes back to `from` as a change output ahead of the payment.
///
/// An outpoint listed more than once counts, and is spent, only once.
pub fn make_transfer(
    from: &str,
    to: &str,
    amount: u64,
    utxos: &[UTxOut],
    timestamp: i64,
) -> Result<Tx> {
    if amount == 0 {
        return Err(LedgerError::InvalidAmount);
    }
    let mut seen = HashSet::new();
    let utxos: Vec<&UTxOut> = utxos.iter().filter(|u| seen.insert(u.outpoint())).collect();

    let balance: u64 = utxos.iter().map(|u| u.amount).sum();
    if balance < amount {
        return Err(LedgerError::InsufficientFunds {
            have: balance,
            need: amount,
        });
    }

    let mut total = 0u64;
    let mut tx_ins = Vec::new();
    for utxo in utxos {
        if total >= amount {
            break;
        }
        tx_ins.push(TxIn {
            tx_id: utxo.tx_id.clone(),
            index: utxo.index,
            owner: from.to_string(),
        });
        total += utxo.amount;
    }

    let mut tx_outs = Vec::with_capacity(2);
    if total > amount {
        tx_outs.push(TxOut {
            owner: from.to_string(),
            amount: total - amount,
        });
    }
    tx_outs.push(TxOut {
        owner: to.to_string(),
        amount,
    });

    Ok(Tx::new(timestamp, tx_ins, tx_outs))
}
