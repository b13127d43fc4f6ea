//! In-memory backend
//!
//! Keeps the snapshot in a shared buffer. Clones share the same buffer, so a
//! test can hand one clone to a store and inspect the other.

use std::io;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::Result;

use super::Backend;

#[derive(Default)]
struct Inner {
    contents: Mutex<Option<Vec<u8>>>,
    writes: AtomicU64,
    fail_writes: AtomicBool,
}

/// Snapshot target held in process memory
#[derive(Clone, Default)]
pub struct MemoryBackend {
    inner: Arc<Inner>,
}

impl MemoryBackend {
    /// Create an empty backend (no snapshot yet)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend that already holds a snapshot
    #[must_use]
    pub fn with_contents(bytes: impl Into<Vec<u8>>) -> Self {
        let backend = Self::new();
        *backend.inner.contents.lock() = Some(bytes.into());
        backend
    }

    /// Current snapshot bytes, if any were written
    pub fn contents(&self) -> Option<Vec<u8>> {
        self.inner.contents.lock().clone()
    }

    /// Number of successful writes so far
    pub fn write_count(&self) -> u64 {
        self.inner.writes.load(Ordering::SeqCst)
    }

    /// Make every following write fail with an I/O error (or stop failing)
    pub fn set_fail_writes(&self, fail: bool) {
        self.inner.fail_writes.store(fail, Ordering::SeqCst);
    }
}

impl Backend for MemoryBackend {
    fn read(&self) -> Result<Option<Vec<u8>>> {
        Ok(self.contents())
    }

    fn write(&self, bytes: &[u8]) -> Result<()> {
        if self.inner.fail_writes.load(Ordering::SeqCst) {
            return Err(io::Error::new(io::ErrorKind::Other, "memory backend write disabled").into());
        }

        *self.inner.contents.lock() = Some(bytes.to_vec());
        self.inner.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn describe(&self) -> String {
        "<memory>".to_string()
    }
}
