// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 tabflow contributors

//! Result caching keyed by pipeline fingerprint
//!
//! The in-process memoization layer a reactive consumer sits on: identical
//! fingerprint means identical computation, so the stored dataset can be
//! served without re-evaluating. Pipelines with an unresolved fingerprint
//! (the empty pipeline) are never cached.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::compute::ComputeContext;
use crate::errors::TabflowResult;
use crate::pipeline::{pipeline_id, Pipeline};
use crate::table::Dataset;

/// In-memory dataset cache keyed by pipeline fingerprint.
#[derive(Debug, Default)]
pub struct ResultCache {
    entries: HashMap<String, Dataset>,
    hits: u64,
    misses: u64,
}

/// Cache statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Number of cached datasets
    pub entries: usize,
    /// Lookups served from the cache
    pub hits: u64,
    /// Lookups that required evaluation
    pub misses: u64,
}

impl ResultCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluate a pipeline through the cache.
    ///
    /// Computes the pipeline's fingerprint under `context`; on a hit the
    /// stored dataset is cloned out, on a miss the pipeline is evaluated and
    /// the result stored. The empty pipeline bypasses the cache entirely.
    pub fn fetch(
        &mut self,
        pipeline: &Pipeline,
        context: &ComputeContext,
    ) -> TabflowResult<Option<Dataset>> {
        let Some(key) = pipeline_id(pipeline, context)? else {
            return Ok(None);
        };

        if let Some(cached) = self.entries.get(&key) {
            self.hits += 1;
            debug!(%key, "cache hit");
            return Ok(Some(cached.clone()));
        }

        self.misses += 1;
        debug!(%key, "cache miss, evaluating");
        let result = pipeline.evaluate(context)?;
        if let Some(ref dataset) = result {
            self.entries.insert(key, dataset.clone());
        }
        Ok(result)
    }

    /// Drop one cached entry.
    pub fn invalidate(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Drop all cached entries (statistics are kept).
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Current statistics.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            hits: self.hits,
            misses: self.misses,
        }
    }
}
