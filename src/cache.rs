//! Hierarchical, prefix-namespaced cache for resolver views
//!
//! A [`Cache`] is a chain of [`CacheTier`]s, fastest first. Writes and
//! deletes go to every tier in order; a read that misses in a faster tier
//! but hits in a slower one copies the value back into the faster tiers.
//!
//! Every key is scoped by a prefix, normally the fingerprint of the loaded
//! manifest set. Loading more manifests changes the prefix, so stale views
//! simply become unreachable instead of needing eviction.
//!
//! Values are strings; [`Cache::get_json`] and [`Cache::set_json`] wrap them
//! with `serde_json`. A miss is always `None`, never a sentinel value.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use log::trace;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Error, Result};

/// One storage level of a [`Cache`]
pub trait CacheTier: Send {
    fn get(&mut self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn delete(&mut self, key: &str) -> Result<()>;
}

/// In-process tier owned by a single cache
#[derive(Debug, Clone, Default)]
pub struct MemoryTier {
    entries: HashMap<String, String>,
}

impl MemoryTier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CacheTier for MemoryTier {
    fn get(&mut self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Thread-safe tier whose clones share one store
///
/// Use this to let several resolvers (one per request) reuse each other's
/// views while each keeps its own fast tier.
#[derive(Debug, Clone, Default)]
pub struct SharedTier {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl SharedTier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.lock()?.is_empty())
    }

    pub fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.lock()?.contains_key(key))
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries.lock().map_err(|_| Error::Cache {
            message: "Shared tier lock poisoned".to_string(),
        })
    }
}

impl CacheTier for SharedTier {
    fn get(&mut self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}

/// Chain of cache tiers sharing one key prefix
pub struct Cache {
    prefix: String,
    tiers: Vec<Box<dyn CacheTier>>,
}

impl Cache {
    /// Create a cache with a single in-process tier
    pub fn new() -> Self {
        Self {
            prefix: String::new(),
            tiers: vec![Box::new(MemoryTier::new())],
        }
    }

    /// Append a slower tier behind the existing ones
    pub fn with_tier(mut self, tier: impl CacheTier + 'static) -> Self {
        self.push_tier(Box::new(tier));
        self
    }

    pub fn push_tier(&mut self, tier: Box<dyn CacheTier>) {
        self.tiers.push(tier);
    }

    pub fn tier_count(&self) -> usize {
        self.tiers.len()
    }

    /// Scope all following operations to `prefix`
    pub fn set_prefix(&mut self, prefix: impl Into<String>) {
        self.prefix = prefix.into();
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The key as stored in the tiers
    pub fn scoped_key(&self, key: &str) -> String {
        if self.prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}:{}", self.prefix, key)
        }
    }

    /// Look `key` up tier by tier, promoting hits into the faster tiers
    pub fn get(&mut self, key: &str) -> Result<Option<String>> {
        let scoped = self.scoped_key(key);
        for level in 0..self.tiers.len() {
            if let Some(value) = self.tiers[level].get(&scoped)? {
                trace!("cache hit for {} in tier {}", scoped, level);
                for faster in &mut self.tiers[..level] {
                    faster.set(&scoped, &value)?;
                }
                return Ok(Some(value));
            }
        }
        trace!("cache miss for {}", scoped);
        Ok(None)
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let scoped = self.scoped_key(key);
        for tier in &mut self.tiers {
            tier.set(&scoped, value)?;
        }
        Ok(())
    }

    pub fn delete(&mut self, key: &str) -> Result<()> {
        let scoped = self.scoped_key(key);
        for tier in &mut self.tiers {
            tier.delete(&scoped)?;
        }
        Ok(())
    }

    /// Fetch and decode a JSON value
    pub fn get_json<T: DeserializeOwned>(&mut self, key: &str) -> Result<Option<T>> {
        match self.get(key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Encode and store a JSON value
    pub fn set_json<T: Serialize>(&mut self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.set(key, &raw)
    }

    /// Get a cached value, or compute and cache it if not present
    pub fn get_or_compute<T, F>(&mut self, key: &str, compute: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Result<T>,
    {
        if let Some(value) = self.get_json(key)? {
            return Ok(value);
        }
        let value = compute()?;
        self.set_json(key, &value)?;
        Ok(value)
    }
}

impl Default for Cache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Cache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cache")
            .field("prefix", &self.prefix)
            .field("tiers", &self.tiers.len())
            .finish()
    }
}
