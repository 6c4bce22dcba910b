//! # Catalog Store
//!
//! Loads the raw figure-data document and keeps it in a single-slot cache.
//!
//! - The store is the ONLY component that touches external storage
//! - A parsed document is served from cache for `CATALOG_TTL`
//! - A failed reload never clears a still-fresh entry
//! - An expired entry is never served: a failing reload past the TTL propagates the error
//!
//! The source and the clock are injected so tests can count reads and move time.

use crate::WardrobeError;
use crate::primitives::{CATALOG_TTL, MAX_CATALOG_FILE_SIZE};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// A parsed catalog document, shared between the cache and its readers.
pub type RawCatalog = Arc<Value>;

// =============================================================================
// SOURCES
// =============================================================================

/// Where the catalog document comes from.
pub trait CatalogSource: Send + Sync {
    /// Human-readable location, for logs.
    fn describe(&self) -> String;

    /// Read the whole document.
    ///
    /// Returns `WardrobeError::Config` when no location is configured and
    /// `WardrobeError::SourceRead` when reading fails.
    fn read(&self) -> Result<Vec<u8>, WardrobeError>;
}

/// Catalog stored in a local JSON file.
#[derive(Debug, Clone, Default)]
pub struct FileSource {
    path: Option<PathBuf>,
}

impl FileSource {
    /// Create a file source. `None` means "not configured".
    #[must_use]
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }
}

impl CatalogSource for FileSource {
    fn describe(&self) -> String {
        match &self.path {
            Some(p) => p.display().to_string(),
            None => "<unconfigured>".to_string(),
        }
    }

    fn read(&self) -> Result<Vec<u8>, WardrobeError> {
        let path = self.path.as_ref().ok_or_else(|| {
            WardrobeError::Config("catalog location is not configured (FIGUREDATA_PATH)".into())
        })?;

        let metadata = std::fs::metadata(path)
            .map_err(|e| WardrobeError::SourceRead(format!("{}: {}", path.display(), e)))?;
        if metadata.len() > MAX_CATALOG_FILE_SIZE {
            return Err(WardrobeError::SourceRead(format!(
                "{}: size {} bytes exceeds maximum {} bytes",
                path.display(),
                metadata.len(),
                MAX_CATALOG_FILE_SIZE
            )));
        }

        std::fs::read(path)
            .map_err(|e| WardrobeError::SourceRead(format!("{}: {}", path.display(), e)))
    }
}

/// Catalog held in memory. Counts how often it was read.
#[derive(Debug, Default)]
pub struct MemorySource {
    bytes: Vec<u8>,
    reads: AtomicUsize,
}

impl MemorySource {
    #[must_use]
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
            reads: AtomicUsize::new(0),
        }
    }

    /// Number of completed `read` calls.
    #[must_use]
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl CatalogSource for MemorySource {
    fn describe(&self) -> String {
        "<memory>".to_string()
    }

    fn read(&self) -> Result<Vec<u8>, WardrobeError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.bytes.clone())
    }
}

impl<S: CatalogSource + ?Sized> CatalogSource for Arc<S> {
    fn describe(&self) -> String {
        (**self).describe()
    }

    fn read(&self) -> Result<Vec<u8>, WardrobeError> {
        (**self).read()
    }
}

// =============================================================================
// CLOCKS
// =============================================================================

/// Time source used for freshness decisions.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Clock shared between the store and the query caches.
pub type SharedClock = Arc<dyn Clock>;

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<Instant>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Instant::now()),
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

// =============================================================================
// STORE
// =============================================================================

#[derive(Debug, Clone)]
struct CachedCatalog {
    raw: RawCatalog,
    loaded_at: Instant,
}

/// Single-slot, TTL-bounded cache in front of a [`CatalogSource`].
pub struct CatalogStore {
    source: Box<dyn CatalogSource>,
    clock: SharedClock,
    ttl: Duration,
    slot: Mutex<Option<CachedCatalog>>,
}

impl CatalogStore {
    /// Create a store with the wall clock and the default TTL.
    pub fn new(source: impl CatalogSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            clock: Arc::new(SystemClock),
            ttl: CATALOG_TTL,
            slot: Mutex::new(None),
        }
    }

    /// Replace the clock.
    #[must_use]
    pub fn with_clock(mut self, clock: SharedClock) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the time-to-live.
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Clock used by this store.
    #[must_use]
    pub fn clock(&self) -> SharedClock {
        Arc::clone(&self.clock)
    }

    /// Source location, for logs.
    #[must_use]
    pub fn describe(&self) -> String {
        self.source.describe()
    }

    /// Return the catalog, reading the source only when the cache is cold or expired.
    pub fn load(&self) -> Result<RawCatalog, WardrobeError> {
        let now = self.clock.now();

        if let Some(cached) = self.fresh_entry(now) {
            tracing::debug!(source = %self.source.describe(), "catalog cache hit");
            return Ok(cached);
        }

        let bytes = self.source.read().inspect_err(|e| {
            tracing::warn!(source = %self.source.describe(), error = %e, "catalog read failed");
        })?;
        let value: Value = serde_json::from_slice(&bytes).map_err(|e| {
            tracing::warn!(source = %self.source.describe(), error = %e, "catalog parse failed");
            WardrobeError::Parse(e.to_string())
        })?;

        let raw = Arc::new(value);
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        *slot = Some(CachedCatalog {
            raw: Arc::clone(&raw),
            loaded_at: now,
        });

        tracing::info!(
            source = %self.source.describe(),
            bytes = bytes.len(),
            "catalog loaded"
        );
        Ok(raw)
    }

    /// Drop the cached document.
    pub fn invalidate(&self) {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        *slot = None;
    }

    /// When the cached document was loaded, if any.
    #[must_use]
    pub fn loaded_at(&self) -> Option<Instant> {
        let slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        slot.as_ref().map(|c| c.loaded_at)
    }

    fn fresh_entry(&self, now: Instant) -> Option<RawCatalog> {
        let slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        slot.as_ref()
            .filter(|c| now.saturating_duration_since(c.loaded_at) < self.ttl)
            .map(|c| Arc::clone(&c.raw))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Source whose content can be swapped between reads.
    struct ScriptedSource {
        content: Mutex<Result<Vec<u8>, String>>,
        reads: AtomicUsize,
    }

    impl ScriptedSource {
        fn new(content: &str) -> Self {
            Self {
                content: Mutex::new(Ok(content.as_bytes().to_vec())),
                reads: AtomicUsize::new(0),
            }
        }

        fn fail_with(&self, msg: &str) {
            *self.content.lock().expect("lock") = Err(msg.to_string());
        }

        fn reads(&self) -> usize {
            self.reads.load(Ordering::SeqCst)
        }
    }

    impl CatalogSource for ScriptedSource {
        fn describe(&self) -> String {
            "<scripted>".into()
        }

        fn read(&self) -> Result<Vec<u8>, WardrobeError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.content
                .lock()
                .expect("lock")
                .clone()
                .map_err(WardrobeError::SourceRead)
        }
    }

    fn store_with(source: Arc<ScriptedSource>) -> (CatalogStore, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        let store = CatalogStore::new(source).with_clock(clock.clone());
        (store, clock)
    }

    #[test]
    fn unconfigured_file_source_is_config_error() {
        let store = CatalogStore::new(FileSource::new(None));
        assert!(matches!(store.load(), Err(WardrobeError::Config(_))));
    }

    #[test]
    fn missing_file_is_read_error() {
        let store = CatalogStore::new(FileSource::new(Some("/nonexistent/figuredata.json".into())));
        assert!(matches!(store.load(), Err(WardrobeError::SourceRead(_))));
    }

    #[test]
    fn invalid_json_is_parse_error() {
        let store = CatalogStore::new(MemorySource::new("{not json"));
        assert!(matches!(store.load(), Err(WardrobeError::Parse(_))));
        assert!(store.loaded_at().is_none());
    }

    #[test]
    fn loads_within_ttl_share_one_read() {
        let source = Arc::new(ScriptedSource::new(r#"{"a":1}"#));
        let (store, clock) = store_with(source.clone());

        let first = store.load().expect("load");
        clock.advance(CATALOG_TTL - Duration::from_secs(1));
        let second = store.load().expect("load");

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(source.reads(), 1);
    }

    #[test]
    fn expired_entry_triggers_fresh_read() {
        let source = Arc::new(ScriptedSource::new(r#"{"a":1}"#));
        let (store, clock) = store_with(source.clone());

        let first = store.load().expect("load");
        clock.advance(CATALOG_TTL);
        let second = store.load().expect("load");

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(source.reads(), 2);
    }

    #[test]
    fn failed_reload_past_ttl_propagates() {
        let source = Arc::new(ScriptedSource::new(r#"{"a":1}"#));
        let (store, clock) = store_with(source.clone());

        store.load().expect("load");
        source.fail_with("disk gone");
        clock.advance(CATALOG_TTL + Duration::from_secs(1));

        assert!(matches!(store.load(), Err(WardrobeError::SourceRead(_))));
    }

    #[test]
    fn source_failure_within_ttl_is_not_observed() {
        let source = Arc::new(ScriptedSource::new(r#"{"a":1}"#));
        let (store, clock) = store_with(source.clone());

        let first = store.load().expect("load");
        let loaded_at = store.loaded_at();
        source.fail_with("disk gone");
        clock.advance(Duration::from_secs(60));

        let again = store.load().expect("cached");
        assert!(Arc::ptr_eq(&first, &again));
        assert_eq!(store.loaded_at(), loaded_at);
        assert_eq!(source.reads(), 1);
    }

    #[test]
    fn invalidate_forces_reload() {
        let source = Arc::new(ScriptedSource::new(r#"{"a":1}"#));
        let (store, _clock) = store_with(source.clone());

        store.load().expect("load");
        store.invalidate();
        store.load().expect("load");

        assert_eq!(source.reads(), 2);
    }

    #[test]
    fn memory_source_counts_reads() {
        let source = MemorySource::new("{}");
        assert_eq!(source.reads(), 0);
        source.read().expect("read");
        assert_eq!(source.reads(), 1);
    }
}
