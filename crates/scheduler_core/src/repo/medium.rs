//! Key-value storage media behind the record store.
//!
//! # Responsibility
//! - Hold one serialized document per key, with get/set/remove primitives.
//! - Reject a write as a whole; a failed `set_item` leaves the old value.
//!
//! # Invariants
//! - `SqliteMedium` only accepts connections bootstrapped by `db::open_*`.
//! - `MemoryMedium` quota accounting counts key and value bytes.

use crate::db::schema::{user_version, SCHEMA_VERSION};
use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::RefCell;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type MediumResult<T> = Result<T, MediumError>;

/// Failure reported by a storage medium.
#[derive(Debug)]
pub enum MediumError {
    Db(DbError),
    QuotaExceeded {
        key: String,
        required: usize,
        quota: usize,
    },
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
}

impl Display for MediumError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::QuotaExceeded {
                key,
                required,
                quota,
            } => write!(
                f,
                "storage quota exceeded writing `{key}`: {required} bytes needed, {quota} allowed"
            ),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection is not bootstrapped (layout version {actual_version}, expected {expected_version})"
            ),
        }
    }
}

impl Error for MediumError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::QuotaExceeded { .. } | Self::UninitializedConnection { .. } => None,
        }
    }
}

impl From<DbError> for MediumError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for MediumError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// String-valued key-value medium, shaped like browser local storage.
pub trait StorageMedium {
    fn get_item(&self, key: &str) -> MediumResult<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> MediumResult<()>;
    fn remove_item(&self, key: &str) -> MediumResult<()>;
}

impl<M: StorageMedium + ?Sized> StorageMedium for &M {
    fn get_item(&self, key: &str) -> MediumResult<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> MediumResult<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> MediumResult<()> {
        (**self).remove_item(key)
    }
}

/// SQLite-backed medium over the `kv_items` table.
pub struct SqliteMedium<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMedium<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    ///
    /// # Errors
    /// - `UninitializedConnection` when the layout version does not match.
    pub fn try_new(conn: &'conn Connection) -> MediumResult<Self> {
        let actual_version = user_version(conn)?;
        if actual_version != SCHEMA_VERSION {
            return Err(MediumError::UninitializedConnection {
                expected_version: SCHEMA_VERSION,
                actual_version,
            });
        }
        Ok(Self { conn })
    }
}

impl StorageMedium for SqliteMedium<'_> {
    fn get_item(&self, key: &str) -> MediumResult<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv_items WHERE key = ?1;", [key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set_item(&self, key: &str, value: &str) -> MediumResult<()> {
        self.conn.execute(
            "INSERT INTO kv_items (key, value, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now') * 1000)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> MediumResult<()> {
        self.conn.execute("DELETE FROM kv_items WHERE key = ?1;", [key])?;
        Ok(())
    }
}

/// Process-local medium, optionally capped at a byte quota.
#[derive(Debug, Default)]
pub struct MemoryMedium {
    items: RefCell<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryMedium {
    pub fn new() -> Self {
        Self::default()
    }

    /// Medium that rejects writes once keys plus values exceed `quota` bytes.
    pub fn with_quota(quota: usize) -> Self {
        Self {
            items: RefCell::default(),
            quota: Some(quota),
        }
    }

    /// Bytes currently held, counting keys and values.
    pub fn used_bytes(&self) -> usize {
        self.items
            .borrow()
            .iter()
            .map(|(key, value)| key.len() + value.len())
            .sum()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.items.borrow().contains_key(key)
    }
}

impl StorageMedium for MemoryMedium {
    fn get_item(&self, key: &str) -> MediumResult<Option<String>> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> MediumResult<()> {
        if let Some(quota) = self.quota {
            let replaced = self
                .items
                .borrow()
                .get(key)
                .map_or(0, |old| key.len() + old.len());
            let required = self.used_bytes() - replaced + key.len() + value.len();
            if required > quota {
                return Err(MediumError::QuotaExceeded {
                    key: key.to_string(),
                    required,
                    quota,
                });
            }
        }
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> MediumResult<()> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}
