pub mod builder;
pub mod mempool;
pub mod model;
pub mod utxo;

pub use builder::make_transfer;
pub use mempool::Mempool;
pub use model::{Tx, UTxOut};
pub use utxo::{balance_by_address, utxos_by_address};
