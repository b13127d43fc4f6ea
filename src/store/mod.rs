//! Store Module
//!
//! The in-memory map, its public operations, and its lifecycle.
//!
//! ## Concurrency Model: Multiple-Reader / Single-Writer
//!
//! - **Writes** (`set`/`delete`): exclusive lock on the map, held only for the
//!   in-memory mutation. Never touch the backend.
//! - **Reads** (`get`/`all`/`len`/`contains_key`): shared lock, many at once.
//!   Values are cloned out, so callers never hold a reference into the map.
//! - **Flush**: shared lock while encoding the snapshot, released before the
//!   backend write. Runs alongside readers, waits for an in-flight writer.
//!
//! ## Lifecycle
//! ```text
//! open() ──▶ load snapshot ──▶ [start scheduler if period > 0]
//!                                     │
//!         set/get/delete/all/flush ◀──┘
//!                                     │
//! close() ──▶ stop + join scheduler ──▶ final flush
//! ```
//!
//! Dropping a store without `close` stops the scheduler but does not flush.

mod shared;

use std::any::TypeId;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::backend::{Backend, FileBackend};
use crate::codec::Format;
use crate::config::Config;
use crate::error::{Result, SnapError};
use crate::scheduler::{FlushCounters, FlushScheduler, FlushStats};

use shared::Shared;

/// Bounds every stored value type must satisfy
pub trait StoreValue: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {}

impl<T> StoreValue for T where T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {}

/// Store holding arbitrary JSON values under one roof
///
/// Only `Format::Json` can decode untyped values; opening one with
/// `Format::Bincode` fails with `SnapError::Config`.
pub type DynStore = Store<serde_json::Value>;

/// The capability set consumers of a store depend on
pub trait KvStore<V>: Send + Sync {
    /// Insert or overwrite `key`
    fn set(&self, key: String, value: V);

    /// Latest value for `key`, if any
    fn get(&self, key: &str) -> Option<V>;

    /// Remove `key`; true if it was present
    fn delete(&self, key: &str) -> bool;

    /// Independent copy of every entry
    fn all(&self) -> HashMap<String, V>;

    /// Persist a snapshot now
    fn flush(&self) -> Result<()>;

    /// Stop background flushing and persist a final snapshot
    fn close(&self) -> Result<()>;
}

/// Concurrency-safe in-memory map with whole-map snapshots
///
/// Share across threads with `Arc<Store<V>>`.
pub struct Store<V> {
    config: Config,

    /// Map + lock + backend, also held by the flush thread
    shared: Arc<Shared<V>>,

    /// `None` when periodic flushing is disabled or after `close`
    scheduler: Mutex<Option<FlushScheduler>>,

    counters: Arc<FlushCounters>,

    closed: AtomicBool,
}

impl<V: StoreValue> Store<V> {
    /// Open a store backed by the file at `config.flush_path`
    ///
    /// On startup:
    /// 1. Load the existing snapshot (a missing file means an empty store)
    /// 2. Start the flush scheduler if `flush_period` is non-zero
    pub fn open(config: Config) -> Result<Self> {
        if config.flush_path.as_os_str().is_empty() {
            return Err(SnapError::Config("flush_path must not be empty".to_string()));
        }

        let backend = FileBackend::new(&config.flush_path);
        Self::with_backend(config, backend)
    }

    /// Open with a path (convenience method)
    ///
    /// Uses the default config with the specified snapshot file
    pub fn open_path(path: impl AsRef<Path>) -> Result<Self> {
        let config = Config::builder().flush_path(path.as_ref()).build();
        Self::open(config)
    }

    /// Open a store against any backend
    ///
    /// `config.flush_path` is ignored; the backend decides where bytes go.
    pub fn with_backend(config: Config, backend: impl Backend + 'static) -> Result<Self> {
        // bincode is not self-describing: it would write snapshots it can never read back
        if config.format == Format::Bincode && TypeId::of::<V>() == TypeId::of::<serde_json::Value>() {
            return Err(SnapError::Config(
                "untyped serde_json::Value stores need Format::Json".to_string(),
            ));
        }

        let data: HashMap<String, V> =
            shared::load(&backend, config.format, config.load_policy)?;
        let loaded = data.len();

        let shared = Arc::new(Shared::new(data, Box::new(backend), config.format));
        let counters = Arc::new(FlushCounters::default());

        let scheduler = if config.periodic_flush_enabled() {
            let flusher = Arc::clone(&shared);
            Some(FlushScheduler::start(
                config.flush_period,
                Arc::clone(&counters),
                move || flusher.flush().map(|_| ()),
            )?)
        } else {
            None
        };

        tracing::info!(
            snapshot = %shared.describe_target(),
            entries = loaded,
            period_ms = config.flush_period.as_millis() as u64,
            "store opened"
        );

        Ok(Self {
            config,
            shared,
            scheduler: Mutex::new(scheduler),
            counters,
            closed: AtomicBool::new(false),
        })
    }

    /// Insert or overwrite a value
    pub fn set(&self, key: impl Into<String>, value: V) {
        self.shared.data().write().insert(key.into(), value);
    }

    /// Get a clone of the value stored under `key`
    pub fn get(&self, key: &str) -> Option<V> {
        self.shared.data().read().get(key).cloned()
    }

    /// Remove a key
    ///
    /// Returns whether a value was removed. Deleting a missing key is a no-op.
    pub fn delete(&self, key: &str) -> bool {
        self.shared.data().write().remove(key).is_some()
    }

    /// Copy of every entry
    ///
    /// The copy is detached: changing it does not touch the store, and later
    /// store writes do not show up in it.
    pub fn all(&self) -> HashMap<String, V> {
        self.shared.data().read().clone()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.shared.data().read().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.shared.data().read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.data().read().is_empty()
    }

    /// Write a snapshot of the current map, replacing the previous one
    ///
    /// The map is read-locked only while the snapshot is encoded, so writers
    /// are not blocked by the disk write.
    pub fn flush(&self) -> Result<()> {
        self.shared.flush().map(|_| ())
    }

    /// Stop the scheduler and write a final snapshot
    ///
    /// The scheduler thread is joined before the final flush starts, so no
    /// background flush can land after this one. Calling `close` again is
    /// safe: the scheduler is only stopped once, and each call flushes, which
    /// lets a caller retry a close whose flush failed.
    pub fn close(&self) -> Result<()> {
        let scheduler = self.scheduler.lock().take();
        if let Some(mut scheduler) = scheduler {
            scheduler.stop();
        }

        if !self.closed.swap(true, Ordering::SeqCst) {
            tracing::info!(snapshot = %self.shared.describe_target(), "closing store");
        }

        let entries = self.shared.flush()?;
        tracing::debug!(entries, "final snapshot written");
        Ok(())
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Whether `close` has been called
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Whether the background scheduler is currently running
    pub fn is_flushing_periodically(&self) -> bool {
        self.scheduler
            .lock()
            .as_ref()
            .map(FlushScheduler::is_running)
            .unwrap_or(false)
    }

    /// Counts of background flush ticks so far
    pub fn flush_stats(&self) -> FlushStats {
        self.counters.snapshot()
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl<V: StoreValue> KvStore<V> for Store<V> {
    fn set(&self, key: String, value: V) {
        Store::set(self, key, value)
    }

    fn get(&self, key: &str) -> Option<V> {
        Store::get(self, key)
    }

    fn delete(&self, key: &str) -> bool {
        Store::delete(self, key)
    }

    fn all(&self) -> HashMap<String, V> {
        Store::all(self)
    }

    fn flush(&self) -> Result<()> {
        Store::flush(self)
    }

    fn close(&self) -> Result<()> {
        Store::close(self)
    }
}
