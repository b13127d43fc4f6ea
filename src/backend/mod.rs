//! Backend Module
//!
//! Where a snapshot lives between process runs.
//!
//! ## Responsibilities
//! - Read the whole snapshot, reporting absence as `Ok(None)`
//! - Replace the whole snapshot with new bytes
//! - Never hold a handle open across calls
//!
//! ```text
//! ┌─────────────────────────────┐
//! │  Store (map + RwLock)       │
//! └──────────────┬──────────────┘
//!                │ Bytes (encoded by Format)
//!                ▼
//! ┌─────────────────────────────┐
//! │  Backend                    │
//! │  - read()  -> Option<bytes> │
//! │  - write(bytes)             │
//! └─────────────────────────────┘
//!        ▲              ▲
//!        │              │
//!   FileBackend   MemoryBackend
//! ```
//!
//! Writes are plain overwrites. There is no rename step, so a crash in the
//! middle of `write` can leave a truncated or empty target.

mod file;
mod memory;

pub use file::FileBackend;
pub use memory::MemoryBackend;

use crate::error::Result;

/// Storage target for whole-map snapshots
pub trait Backend: Send + Sync {
    /// Read the full snapshot
    ///
    /// Returns `Ok(None)` when no snapshot has ever been written. Any other
    /// failure is an error.
    fn read(&self) -> Result<Option<Vec<u8>>>;

    /// Replace the full snapshot with `bytes`
    fn write(&self, bytes: &[u8]) -> Result<()>;

    /// Human-readable name of the target, for logs
    fn describe(&self) -> String;
}
