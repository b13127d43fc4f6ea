//! State shared between the store handle and the flush thread

use std::collections::HashMap;

use parking_lot::{Mutex, RwLock};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::backend::Backend;
use crate::codec::Format;
use crate::config::LoadPolicy;
use crate::error::Result;

/// The map, its lock, and the snapshot target
///
/// ## Locking
/// - `data`: the only lock guarding the map. Shared for reads and for
///   encoding a snapshot, exclusive for `set`/`delete`.
/// - `flush_lock`: serializes whole flushes so snapshots reach the backend
///   in the order they were taken. Never acquired while `data` is held.
pub(crate) struct Shared<V> {
    data: RwLock<HashMap<String, V>>,
    flush_lock: Mutex<()>,
    backend: Box<dyn Backend>,
    format: Format,
}

impl<V> Shared<V> {
    pub(crate) fn new(data: HashMap<String, V>, backend: Box<dyn Backend>, format: Format) -> Self {
        Self {
            data: RwLock::new(data),
            flush_lock: Mutex::new(()),
            backend,
            format,
        }
    }

    pub(crate) fn data(&self) -> &RwLock<HashMap<String, V>> {
        &self.data
    }

    pub(crate) fn describe_target(&self) -> String {
        self.backend.describe()
    }
}

impl<V: Serialize + DeserializeOwned> Shared<V> {
    /// Encode a snapshot under the read lock, then write it with no map lock held
    ///
    /// Returns the number of entries written.
    pub(crate) fn flush(&self) -> Result<usize> {
        let _flush_guard = self.flush_lock.lock();

        let (bytes, entries) = {
            let data = self.data.read();
            (self.format.encode(&*data)?, data.len())
        };

        self.backend.write(&bytes)?;

        tracing::debug!(
            entries,
            bytes = bytes.len(),
            snapshot = %self.backend.describe(),
            "flushed snapshot"
        );

        Ok(entries)
    }
}

/// Read the initial map from `backend`
///
/// A missing snapshot yields an empty map. Other failures follow `policy`.
pub(crate) fn load<V: DeserializeOwned>(
    backend: &dyn Backend,
    format: Format,
    policy: LoadPolicy,
) -> Result<HashMap<String, V>> {
    let result = backend.read().and_then(|bytes| match bytes {
        Some(bytes) => format.decode(&bytes),
        None => {
            tracing::debug!(snapshot = %backend.describe(), "no snapshot found, starting empty");
            Ok(HashMap::new())
        }
    });

    match result {
        Ok(map) => Ok(map),
        Err(e) if policy == LoadPolicy::Lenient => {
            tracing::warn!(
                error = %e,
                snapshot = %backend.describe(),
                "could not load snapshot, starting empty"
            );
            Ok(HashMap::new())
        }
        Err(e) => Err(e),
    }
}
