//! Cache domain - bounded recency cache

mod lru;

pub use lru::{EvictionListener, LruCache};
