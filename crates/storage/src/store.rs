//! Durable key-value adapter backing the catalog.

use crate::{Event, Principal, Result};
use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::rc::Rc;
use tracing::{debug, warn};

/// Key holding the serialized event collection.
pub const EVENTS_KEY: &str = "events";

/// Key holding the saved principal.
pub const USER_KEY: &str = "user";

/// Persistence contract for the event collection and the saved principal.
///
/// Loads never fail: a missing or unreadable value comes back as `None`.
/// Saves return only once the value is durable.
pub trait DurableStore {
    fn load_events(&self) -> Option<Vec<Event>>;

    fn save_events(&self, events: &[Event]) -> Result<()>;

    fn load_principal(&self) -> Option<Principal>;

    fn save_principal(&self, principal: &Principal) -> Result<()>;

    fn clear_principal(&self) -> Result<()>;
}

impl<T: DurableStore + ?Sized> DurableStore for &T {
    fn load_events(&self) -> Option<Vec<Event>> {
        (**self).load_events()
    }

    fn save_events(&self, events: &[Event]) -> Result<()> {
        (**self).save_events(events)
    }

    fn load_principal(&self) -> Option<Principal> {
        (**self).load_principal()
    }

    fn save_principal(&self, principal: &Principal) -> Result<()> {
        (**self).save_principal(principal)
    }

    fn clear_principal(&self) -> Result<()> {
        (**self).clear_principal()
    }
}

impl<T: DurableStore + ?Sized> DurableStore for Rc<T> {
    fn load_events(&self) -> Option<Vec<Event>> {
        (**self).load_events()
    }

    fn save_events(&self, events: &[Event]) -> Result<()> {
        (**self).save_events(events)
    }

    fn load_principal(&self) -> Option<Principal> {
        (**self).load_principal()
    }

    fn save_principal(&self, principal: &Principal) -> Result<()> {
        (**self).save_principal(principal)
    }

    fn clear_principal(&self) -> Result<()> {
        (**self).clear_principal()
    }
}

/// SQLite-backed store.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open or create a store at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Create an in-memory store (useful for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            "#,
        )?;
        Ok(())
    }

    /// Raw value stored under `key`.
    pub fn get_raw(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    /// Overwrite the raw value stored under `key`.
    pub fn put_raw(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.conn.execute("DELETE FROM kv WHERE key = ?1", [key])?;
        Ok(())
    }

    fn load_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.get_raw(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key, "no stored value");
                return None;
            }
            Err(e) => {
                warn!(key, error = %e, "stored value unavailable");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, error = %e, "stored value is corrupt, ignoring it");
                None
            }
        }
    }

    fn save_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.put_raw(key, &raw)
    }
}

impl DurableStore for SqliteStore {
    fn load_events(&self) -> Option<Vec<Event>> {
        self.load_json(EVENTS_KEY)
    }

    fn save_events(&self, events: &[Event]) -> Result<()> {
        self.save_json(EVENTS_KEY, events)?;
        debug!(count = events.len(), "events saved");
        Ok(())
    }

    fn load_principal(&self) -> Option<Principal> {
        self.load_json(USER_KEY)
    }

    fn save_principal(&self, principal: &Principal) -> Result<()> {
        self.save_json(USER_KEY, principal)
    }

    fn clear_principal(&self) -> Result<()> {
        self.remove(USER_KEY)
    }
}
