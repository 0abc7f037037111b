//! Memoized curve samples keyed by `(min, max, count)`
//!
//! Sound because a [`ModelPort`] never changes after its first load.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::{sample, CurveError, CurveSamples};
use crate::model::ModelPort;

type CacheKey = (u64, u64, usize);

/// Default number of distinct domains kept
pub const DEFAULT_CACHE_CAPACITY: usize = 32;

#[derive(Debug)]
pub struct CurveCache {
    entries: RwLock<HashMap<CacheKey, Arc<CurveSamples>>>,
    capacity: usize,
}

impl CurveCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            capacity: capacity.max(1),
        }
    }

    /// Cached samples for the domain, sampling on a miss
    pub fn get_or_sample(
        &self,
        port: &ModelPort,
        min: f64,
        max: f64,
        count: usize,
    ) -> Result<Arc<CurveSamples>, CurveError> {
        let key = (min.to_bits(), max.to_bits(), count);

        if let Ok(entries) = self.entries.read() {
            if let Some(hit) = entries.get(&key) {
                return Ok(Arc::clone(hit));
            }
        }

        let samples = Arc::new(sample(port, min, max, count)?);

        if let Ok(mut entries) = self.entries.write() {
            // Domains come from a handful of UI settings; a full reset is enough
            if entries.len() >= self.capacity && !entries.contains_key(&key) {
                entries.clear();
            }
            entries.insert(key, Arc::clone(&samples));
        }

        Ok(samples)
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for CurveCache {
    fn default() -> Self {
        Self::new()
    }
}
