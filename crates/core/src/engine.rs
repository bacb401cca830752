//! Extraction engine: content fingerprint, cache lookup, concurrent
//! per-page fan-out, and JSON shaping.
//!
//! The engine owns the per-document lifecycle and nothing else: parsing
//! belongs to the injected backend, storage policy to the injected
//! store. Page work runs on a rayon pool built for and torn down with
//! each call; workers return `(page_index, tables)` and the merge sorts
//! by index, so output order is reproducible even though completion
//! order is not.

use rayon::ThreadPoolBuilder;
use rayon::prelude::*;
use serde_json::json;

use crate::backend::{PdfBackend, PdfDocument};
use crate::error::{ExtractError, Result};
use crate::fingerprint;
use crate::normalize::{self, NormalizeOptions, TableRecords};
use crate::store::KvStore;

pub(crate) fn default_thread_count() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Options for one engine instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineOptions {
    /// Worker cap for per-page fan-out. 0 means available parallelism.
    /// The effective pool size never exceeds the page count.
    pub threads: usize,

    /// Normalization behavior applied to every table.
    pub normalize: NormalizeOptions,
}

/// The extraction-and-caching engine.
///
/// Both collaborators are constructor-injected so tests can substitute
/// scripted backends and counting or failing stores.
pub struct ExtractionEngine<B, C> {
    backend: B,
    cache: C,
    options: EngineOptions,
}

impl<B: PdfBackend, C: KvStore> ExtractionEngine<B, C> {
    pub fn new(backend: B, cache: C) -> Self {
        Self::with_options(backend, cache, EngineOptions::default())
    }

    pub fn with_options(backend: B, cache: C, options: EngineOptions) -> Self {
        Self {
            backend,
            cache,
            options,
        }
    }

    /// Extract every table in the document and return JSON text.
    ///
    /// The happy path returns a serialized list of per-table record
    /// lists. Any internal failure comes back as the discriminated
    /// `{"error": "..."}` payload instead; this method never fails at
    /// the type level, which is what transport layers want.
    pub fn extract(&self, bytes: &[u8]) -> String {
        match self.try_extract(bytes) {
            Ok(tables_json) => tables_json,
            Err(e) => error_payload(&e),
        }
    }

    /// Typed variant of [`extract`](Self::extract) for library callers
    /// that want the error taxonomy instead of the JSON error shape.
    pub fn try_extract(&self, bytes: &[u8]) -> Result<String> {
        let key = fingerprint::cache_key(bytes);

        if let Some(cached) = self.cache_get(&key) {
            return Ok(cached);
        }

        let doc = self.backend.open(bytes)?;
        let tables = self.extract_document(&doc)?;
        let tables_json = serde_json::to_string(&tables)?;
        self.cache_put(&key, &tables_json);

        Ok(tables_json)
    }

    /// Cache lookup with degradation: read failures and undecodable
    /// values count as misses, never as errors.
    fn cache_get(&self, key: &str) -> Option<String> {
        match self.cache.get(key) {
            Ok(Some(value)) if value.is_empty() => {
                tracing::debug!(key, "empty cache value, treating as miss");
                None
            }
            Ok(Some(value)) => match String::from_utf8(value) {
                Ok(cached) => {
                    tracing::debug!(key, "cache hit");
                    Some(cached)
                }
                Err(_) => {
                    tracing::warn!(key, "cached value is not utf-8, recomputing");
                    None
                }
            },
            Ok(None) => {
                tracing::debug!(key, "cache miss");
                None
            }
            Err(e) => {
                tracing::warn!(key, error = %e, "cache read failed, recomputing");
                None
            }
        }
    }

    /// Write-through with degradation: a failed write leaves the result
    /// uncached and the caller unaffected.
    fn cache_put(&self, key: &str, tables_json: &str) {
        if let Err(e) = self.cache.set(key, tables_json.as_bytes()) {
            tracing::warn!(key, error = %e, "cache write failed, result not cached");
        }
    }

    fn extract_document(&self, doc: &B::Document) -> Result<Vec<TableRecords>> {
        let page_count = doc.page_count();
        if page_count == 0 {
            return Ok(Vec::new());
        }

        let threads = if self.options.threads > 0 {
            self.options.threads
        } else {
            default_thread_count()
        }
        .min(page_count);

        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|e| ExtractError::Extraction(e.to_string()))?;

        let mut results: Vec<(usize, Vec<TableRecords>)> = pool.install(|| {
            (0..page_count)
                .into_par_iter()
                .map(|page_idx| (page_idx, self.extract_page(doc, page_idx)))
                .collect()
        });
        results.sort_by_key(|(page_idx, _)| *page_idx);

        let mut merged = Vec::new();
        for (_, page_tables) in results {
            merged.extend(page_tables);
        }
        Ok(merged)
    }

    /// Fail-soft page policy: a failing page contributes zero tables and
    /// the rest of the document still completes.
    fn extract_page(&self, doc: &B::Document, page_idx: usize) -> Vec<TableRecords> {
        match self.try_extract_page(doc, page_idx) {
            Ok(page_tables) => page_tables,
            Err(e) => {
                tracing::warn!(page = page_idx, error = %e, "page failed, contributing no tables");
                Vec::new()
            }
        }
    }

    fn try_extract_page(&self, doc: &B::Document, page_idx: usize) -> Result<Vec<TableRecords>> {
        let text = doc.page_text(page_idx)?;
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let raw_tables = doc.page_tables(page_idx)?;
        let mut page_tables = Vec::with_capacity(raw_tables.len());
        for table in &raw_tables {
            let records = normalize::normalize_table(table, self.options.normalize)
                .map_err(|e| ExtractError::Extraction(format!("page {}: {}", page_idx, e)))?;
            page_tables.push(records);
        }
        Ok(page_tables)
    }
}

/// Render a failure as the JSON object callers receive in place of a
/// table list. The shape is stable so downstream consumers can match on
/// the `error` field.
pub fn error_payload(err: &ExtractError) -> String {
    json!({ "error": format!("An error occurred: {}", err) }).to_string()
}
