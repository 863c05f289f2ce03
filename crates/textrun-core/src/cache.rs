//! Memoized measurements
//!
//! Measuring text is by far the most costly thing a layout pass does, so
//! every distinct (style, text, word spacing) combination is measured once.
//!
//! Entries hold metrics *before* line-height scaling. Line height is applied
//! to a copy on every read, so changing it never requires invalidation.
//! Entries never expire: growth during interactive editing is slow, and a
//! caller who disagrees can [`reset`](MeasureCache::reset) or
//! [`swap`](MeasureCache::swap) the whole store at once.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::{error::Result, style::ResolvedStyle, types::Script, types::TextMetrics};

/// Everything that changes a raw measurement
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MeasureKey {
    pub family: String,
    /// Effective size in points (stored as size * 100 for hash stability)
    pub size: i32,
    pub bold: bool,
    pub italic: bool,
    pub script: Script,
    pub text: String,
    /// Word-spacing percentage in force (stored as percent * 100)
    pub word_spacing: Option<i32>,
}

impl MeasureKey {
    pub fn new(text: impl Into<String>, style: &ResolvedStyle, word_spacing: Option<f32>) -> Self {
        Self {
            family: style.family.clone(),
            size: quantize(style.size),
            bold: style.bold,
            italic: style.italic,
            script: style.script,
            text: text.into(),
            word_spacing: word_spacing.map(quantize),
        }
    }
}

/// Signed so negative spacing never collides with zero
fn quantize(value: f32) -> i32 {
    (value * 100.0).round() as i32
}

/// The map behind a [`MeasureCache`]
pub type MeasureStore = HashMap<MeasureKey, TextMetrics>;

/// Snapshot of cache usage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Unbounded measurement memo
#[derive(Default)]
pub struct MeasureCache {
    store: RwLock<MeasureStore>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl MeasureCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing store, e.g. one saved by [`swap`](Self::swap)
    pub fn with_store(store: MeasureStore) -> Self {
        Self {
            store: RwLock::new(store),
            ..Self::default()
        }
    }

    /// Copy of the cached metrics, if present
    pub fn get(&self, key: &MeasureKey) -> Option<TextMetrics> {
        let found = self.store.read().get(key).copied();
        if found.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
        found
    }

    pub fn insert(&self, key: MeasureKey, metrics: TextMetrics) {
        self.store.write().insert(key, metrics);
    }

    /// Cached metrics, or the result of `measure` stored for next time
    ///
    /// `measure` runs without holding the lock. Errors are returned and
    /// nothing is cached for them.
    pub fn get_or_try_insert_with<F>(&self, key: MeasureKey, measure: F) -> Result<TextMetrics>
    where
        F: FnOnce() -> Result<TextMetrics>,
    {
        if let Some(metrics) = self.get(&key) {
            log::trace!("measure cache hit: {:?}", key.text);
            return Ok(metrics);
        }

        log::debug!(
            "measure cache miss: {:?} ({} {}pt)",
            key.text,
            key.family,
            key.size as f32 / 100.0
        );
        let metrics = measure()?;
        self.insert(key, metrics);
        Ok(metrics)
    }

    /// Drop every entry, returning how many there were
    pub fn reset(&self) -> usize {
        let discarded = std::mem::take(&mut *self.store.write());
        log::debug!("measure cache reset, {} entries discarded", discarded.len());
        discarded.len()
    }

    /// Install `store` and hand back the previous one
    pub fn swap(&self, store: MeasureStore) -> MeasureStore {
        let previous = std::mem::replace(&mut *self.store.write(), store);
        log::debug!("measure cache swapped, {} entries replaced", previous.len());
        previous
    }

    pub fn len(&self) -> usize {
        self.store.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.read().is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
