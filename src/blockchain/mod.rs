pub mod block;
pub mod model;

pub use block::Block;
pub use model::{Blockchain, Bootstrap, Checkpoint};

/// Difficulty of the genesis block.
pub const DEFAULT_DIFFICULTY: u32 = 2;

/// Retarget every this many blocks.
pub const DIFFICULTY_INTERVAL: u64 = 5;

/// Expected minutes between blocks.
pub const BLOCK_INTERVAL_MINUTES: i64 = 2;

/// Tolerance (minutes) around the expected window before adjusting.
pub const ALLOWED_RANGE_MINUTES: i64 = 2;

/// Difficulty never drops below this.
pub const DIFF_MIN: u32 = 1;

/// Most leading zeros a block hash is mined to. Difficulty keeps climbing
/// past this; the nonce search does not.
pub const DIFF_MAX: u32 = 6;
