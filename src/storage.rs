use std::path::Path;

use log::debug;

use crate::error::Result;

/// Key of the single checkpoint record inside [`Bucket::Meta`].
pub const CHECKPOINT_KEY: &[u8] = b"checkpoint";

/// Storage namespaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    /// Block bodies keyed by block hash.
    Blocks,
    /// Chain summary (the checkpoint).
    Meta,
}

impl Bucket {
    pub fn name(self) -> &'static str {
        match self {
            Bucket::Blocks => "blocks",
            Bucket::Meta => "meta",
        }
    }
}

/// Key/value byte store backing the chain.
///
/// `put` must be durable by the time it returns; the chain never re-reads
/// its own writes from a cache.
pub trait Store: Send + Sync {
    fn get(&self, bucket: Bucket, key: &[u8]) -> Result<Option<Vec<u8>>>;
    fn put(&self, bucket: Bucket, key: &[u8], value: &[u8]) -> Result<()>;
}

/// sled-backed store with one tree per bucket.
pub struct SledStore {
    _db: sled::Db,
    blocks: sled::Tree,
    meta: sled::Tree,
}

impl SledStore {
    /// Open (or create) the database directory at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = sled::open(path.as_ref())?;
        debug!("opened sled store at {}", path.as_ref().display());
        Self::from_db(db)
    }

    fn from_db(db: sled::Db) -> Result<Self> {
        let blocks = db.open_tree(Bucket::Blocks.name())?;
        let meta = db.open_tree(Bucket::Meta.name())?;
        Ok(Self {
            _db: db,
            blocks,
            meta,
        })
    }

    fn tree(&self, bucket: Bucket) -> &sled::Tree {
        match bucket {
            Bucket::Blocks => &self.blocks,
            Bucket::Meta => &self.meta,
        }
    }
}

impl Store for SledStore {
    fn get(&self, bucket: Bucket, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(self.tree(bucket).get(key)?.map(|v| v.to_vec()))
    }

    fn put(&self, bucket: Bucket, key: &[u8], value: &[u8]) -> Result<()> {
        let tree = self.tree(bucket);
        tree.insert(key, value)?;
        tree.flush()?;
        Ok(())
    }
}
