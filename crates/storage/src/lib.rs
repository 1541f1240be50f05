//! Event records and their durable storage for the campus events catalog.
//!
//! This crate owns the data model shared by every other crate and the
//! persistence adapter that keeps it on disk.
//!
//! # Overview
//!
//! Two values are persisted, each under its own fixed key:
//!
//! 1. **`events`** holds the whole catalog, serialized as one JSON array of
//!    [`Event`] objects.
//!
//! 2. **`user`** holds the principal of the last successful login, or nothing.
//!
//! # Core Concepts
//!
//! ## DurableStore
//!
//! The [`DurableStore`] trait is the persistence contract. Loads never fail:
//! an absent, unreadable, or corrupt value is reported as `None` so callers
//! can fall back to a safe default. Saves are synchronous and the value is
//! durable once the call returns.
//!
//! ## SqliteStore
//!
//! [`SqliteStore`] implements the contract over a single SQLite key-value
//! table.
//!
//! ## Event
//!
//! An [`Event`] is one catalog entry. Its `id` and `created_by` are set once
//! at creation; everything else is editable through an [`EventPatch`].
//! Dates are stored as `YYYY-MM-DD` and times as `HH:MM`.
//!
//! # Example
//!
//! ```no_run
//! use storage::{DurableStore, Principal, SqliteStore};
//!
//! let store = SqliteStore::open("campus.db")?;
//!
//! if store.load_events().is_none() {
//!     store.save_events(&[])?;
//! }
//!
//! store.save_principal(&Principal::new("u1", "Alice"))?;
//! assert_eq!(store.load_principal().map(|p| p.name), Some("Alice".to_string()));
//! # Ok::<(), storage::Error>(())
//! ```

mod error;
mod event;
mod store;

pub use error::{Error, Result};
pub use event::{Event, EventId, EventPatch, EventType, NewEvent, Principal, PrincipalId};
pub use store::{DurableStore, EVENTS_KEY, SqliteStore, USER_KEY};
