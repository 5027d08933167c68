// ── Resource cache ──

mod cache;
mod fetch;

pub use cache::{CacheSnapshot, LoadState, ResourceCache, SITES_CACHE_KEY};
pub use fetch::{FetchHandle, FetchOutcome};
