//! Key-value stores for cached and per-request extraction results.
//!
//! The engine consumes the [`KvStore`] contract and never implements
//! storage policy itself: eviction, expiry, and durability belong to the
//! backing store. Two independent key spaces use this contract: the
//! content-addressed result cache and the per-request result store.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::{ExtractError, Result};

/// Minimal get/set contract consumed by the engine and service layer.
///
/// A failing store surfaces [`ExtractError::CacheUnavailable`]; callers
/// degrade to recomputing rather than failing the request.
pub trait KvStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    fn set(&self, key: &str, value: &[u8]) -> Result<()>;
}

/// In-process store backed by a mutex-guarded map. Never expires entries.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| ExtractError::CacheUnavailable("store mutex poisoned".to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| ExtractError::CacheUnavailable("store mutex poisoned".to_string()))?;
        entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }
}

impl<S: KvStore + ?Sized> KvStore for std::sync::Arc<S> {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        (**self).set(key, value)
    }
}
