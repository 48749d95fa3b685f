use anyhow::Result;
use rusqlite::Connection;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::models::stock::HistoryEntry;

/// 本地持久化键，对应浏览器端的 localStorage 键名
const KEY_USER_PREFERENCE: &str = "userPreference";
const KEY_SEARCH_HISTORY: &str = "searchHistory";

pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    pub fn new(data_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&data_dir)?;
        let db_path = data_dir.join("stock_diagnosis.db");
        let conn = Connection::open(db_path)?;
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.migrate()?;
        Ok(db)
    }

    /// 内存库，供测试使用
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS local_state (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
            ",
        )?;
        Ok(())
    }

    fn save_value(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT OR REPLACE INTO local_state (key, value, updated_at) VALUES (?1, ?2, datetime('now'))",
            rusqlite::params![key, value],
        )?;
        Ok(())
    }

    fn load_value(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn.lock().unwrap();
        let result = conn.query_row(
            "SELECT value FROM local_state WHERE key = ?1",
            rusqlite::params![key],
            |row| row.get::<_, String>(0),
        );
        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save_user_preference(&self, preference: &str) -> Result<()> {
        self.save_value(KEY_USER_PREFERENCE, preference)
    }

    pub fn load_user_preference(&self) -> Result<String> {
        Ok(self.load_value(KEY_USER_PREFERENCE)?.unwrap_or_default())
    }

    pub fn save_search_history(&self, history: &[HistoryEntry]) -> Result<()> {
        self.save_value(KEY_SEARCH_HISTORY, &serde_json::to_string(history)?)
    }

    pub fn load_search_history(&self) -> Result<Vec<HistoryEntry>> {
        match self.load_value(KEY_SEARCH_HISTORY)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(vec![]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_preference_roundtrip() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.load_user_preference().unwrap(), "");

        db.save_user_preference("稳健型，偏好低估值蓝筹").unwrap();
        assert_eq!(db.load_user_preference().unwrap(), "稳健型，偏好低估值蓝筹");

        // 覆盖写入
        db.save_user_preference("激进型").unwrap();
        assert_eq!(db.load_user_preference().unwrap(), "激进型");
    }

    #[test]
    fn test_search_history_roundtrip() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.load_search_history().unwrap().is_empty());

        let history = vec![
            HistoryEntry {
                code: "600000".to_string(),
                name: "浦发银行".to_string(),
                time: "2025-01-02T10:00:00+00:00".to_string(),
            },
            HistoryEntry {
                code: "000001".to_string(),
                name: "平安银行".to_string(),
                time: "2025-01-01T10:00:00+00:00".to_string(),
            },
        ];
        db.save_search_history(&history).unwrap();
        assert_eq!(db.load_search_history().unwrap(), history);
    }
}
