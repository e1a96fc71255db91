use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::{Result, WidgetError};

/// The PrefStore is a flat, namespaced key-value store backed by SQLite.
/// It holds the per-day locators and the widget settings.
pub struct PrefStore {
    conn: Connection,
    db_path: Option<PathBuf>,
}

impl PrefStore {
    /// Open (or create) the store in the user's data directory:
    /// - Linux: ~/.local/share/week-widget/prefs.db
    /// - macOS: ~/Library/Application Support/week-widget/prefs.db
    /// - Windows: %APPDATA%\week-widget\prefs.db
    pub fn open_default() -> Result<Self> {
        let mut path = dirs::data_dir()
            .or_else(dirs::home_dir)
            .ok_or(WidgetError::NoDirectory("data"))?;

        path.push("week-widget");
        Self::open(&path.join("prefs.db"))
    }

    /// Open (or create) the store at an explicit path
    pub fn open(db_path: &Path) -> Result<Self> {
        // Ensure the parent directory exists
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(db_path)?;
        info!("📁 Preference store opened at: {}", db_path.display());

        let store = PrefStore {
            conn,
            db_path: Some(db_path.to_path_buf()),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Open a throwaway store that lives only as long as this value
    pub fn open_in_memory() -> Result<Self> {
        let store = PrefStore {
            conn: Connection::open_in_memory()?,
            db_path: None,
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS prefs (
                namespace   TEXT NOT NULL,
                key         TEXT NOT NULL,
                value       TEXT NOT NULL,
                PRIMARY KEY (namespace, key)
            )",
            [],
        )?;
        Ok(())
    }

    pub fn get_string(&self, namespace: &str, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM prefs WHERE namespace = ?1 AND key = ?2",
                params![namespace, key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Store a value, replacing whatever was there
    pub fn put_string(&self, namespace: &str, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO prefs (namespace, key, value) VALUES (?1, ?2, ?3)
             ON CONFLICT(namespace, key) DO UPDATE SET value = excluded.value",
            params![namespace, key, value],
        )?;
        Ok(())
    }

    /// Read an integer value. A stored value that is not an integer
    /// is reported as absent.
    pub fn get_int(&self, namespace: &str, key: &str) -> Result<Option<i64>> {
        let Some(raw) = self.get_string(namespace, key)? else {
            return Ok(None);
        };

        match raw.parse() {
            Ok(value) => Ok(Some(value)),
            Err(_) => {
                warn!("⚠️  Ignoring non-integer value {:?} for {}/{}", raw, namespace, key);
                Ok(None)
            }
        }
    }

    pub fn put_int(&self, namespace: &str, key: &str, value: i64) -> Result<()> {
        self.put_string(namespace, key, &value.to_string())
    }
}

impl std::fmt::Debug for PrefStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrefStore")
            .field("db_path", &self.db_path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_is_none() {
        let store = PrefStore::open_in_memory().unwrap();
        assert_eq!(store.get_string("week_images", "day_uri_0").unwrap(), None);
        assert_eq!(store.get_int("widget_settings", "updateHour").unwrap(), None);
    }

    #[test]
    fn test_put_overwrites() {
        let store = PrefStore::open_in_memory().unwrap();
        store.put_string("week_images", "day_uri_2", "file:///a.png").unwrap();
        store.put_string("week_images", "day_uri_2", "file:///b.png").unwrap();

        assert_eq!(
            store.get_string("week_images", "day_uri_2").unwrap().as_deref(),
            Some("file:///b.png")
        );
    }

    #[test]
    fn test_namespaces_are_separate() {
        let store = PrefStore::open_in_memory().unwrap();
        store.put_int("widget_settings", "updateHour", 7).unwrap();

        assert_eq!(store.get_int("widget_settings", "updateHour").unwrap(), Some(7));
        assert_eq!(store.get_int("week_images", "updateHour").unwrap(), None);
    }

    #[test]
    fn test_non_integer_reads_as_absent() {
        let store = PrefStore::open_in_memory().unwrap();
        store.put_string("widget_settings", "updateMinute", "half past").unwrap();
        assert_eq!(store.get_int("widget_settings", "updateMinute").unwrap(), None);
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("prefs.db");

        {
            let store = PrefStore::open(&path).unwrap();
            store.put_string("week_images", "day_uri_5", "file:///sat.jpg").unwrap();
        }

        let store = PrefStore::open(&path).unwrap();
        assert!(path.exists());
        assert_eq!(
            store.get_string("week_images", "day_uri_5").unwrap().as_deref(),
            Some("file:///sat.jpg")
        );
    }
}
