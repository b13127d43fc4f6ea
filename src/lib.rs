//! # SnapKV
//!
//! A concurrency-safe in-memory key-value store with:
//! - Multiple-reader / single-writer access through one `RwLock`
//! - Periodic whole-map snapshots written by a background thread
//! - Snapshot reload at startup
//! - Pluggable snapshot encoding (JSON, bincode) and target (file, memory)
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Callers (any thread)                      │
//! │           set / get / delete / all / flush / close           │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                        Store<V>                              │
//! │              HashMap<String, V> behind RwLock                │
//! └──────────┬───────────────────────────────────▲──────────────┘
//!            │ snapshot                          │ tick
//!            ▼                                   │
//!   ┌─────────────────┐                 ┌────────┴────────┐
//!   │  Format (codec) │                 │ FlushScheduler  │
//!   │  Json / Bincode │                 │ (crossbeam tick)│
//!   └────────┬────────┘                 └─────────────────┘
//!            │ bytes
//!            ▼
//!   ┌─────────────────┐
//!   │     Backend     │
//!   │  File / Memory  │
//!   └─────────────────┘
//! ```
//!
//! ## Durability
//! A flush overwrites the whole snapshot in place. There is no write-ahead
//! log and no atomic rename: writes since the last flush are lost on a
//! crash, and a crash during a flush can leave a truncated file.
//!
//! ## Example
//! ```no_run
//! use std::time::Duration;
//! use snapkv::{Config, Store};
//!
//! let config = Config::builder()
//!     .flush_path("./data/users.json")
//!     .flush_period(Duration::from_secs(10))
//!     .build();
//!
//! let store: Store<String> = Store::open(config)?;
//! store.set("name", "Alice".to_string());
//! assert_eq!(store.get("name").as_deref(), Some("Alice"));
//! store.close()?;
//! # Ok::<(), snapkv::SnapError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod codec;
pub mod backend;
pub mod scheduler;
pub mod store;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use backend::{Backend, FileBackend, MemoryBackend};
pub use codec::Format;
pub use config::{Config, LoadPolicy};
pub use error::{Result, SnapError};
pub use scheduler::FlushStats;
pub use store::{DynStore, KvStore, Store, StoreValue};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of SnapKV
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
