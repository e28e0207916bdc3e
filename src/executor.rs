//! Read-only query executor
//!
//! Collaborator around the engine: binds a translated query's parameters
//! positionally and runs it against a SQLite mirror of the legacy
//! schema. Opens the database read-only; never builds SQL itself.

use crate::assembler::{ResolvedQuery, SqlParam};
use crate::error::{Result, TranslateError};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

pub type Row = HashMap<String, serde_json::Value>;

impl rusqlite::ToSql for SqlParam {
    fn to_sql(&self) -> rusqlite::Result<rusqlite::types::ToSqlOutput<'_>> {
        match self {
            SqlParam::Integer(v) => v.to_sql(),
            SqlParam::Text(v) => v.to_sql(),
        }
    }
}

pub struct ReadOnlyExecutor {
    conn: Connection,
}

impl ReadOnlyExecutor {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open_with_flags(path.as_ref(), OpenFlags::SQLITE_OPEN_READ_ONLY)
            .map_err(|e| TranslateError::Execution(format!("failed to open database: {}", e)))?;
        Ok(Self { conn })
    }

    pub fn run(&self, query: &ResolvedQuery) -> Result<Vec<Row>> {
        debug!(
            "Executing: {} with {} param(s)",
            query.sql_query,
            query.params.len()
        );
        let mut stmt = self
            .conn
            .prepare(&query.sql_query)
            .map_err(|e| TranslateError::Execution(format!("prepare failed: {}", e)))?;
        let column_names: Vec<String> =
            stmt.column_names().iter().map(|s| s.to_string()).collect();

        let mut rows = stmt
            .query(rusqlite::params_from_iter(query.params.iter()))
            .map_err(|e| TranslateError::Execution(format!("bind failed: {}", e)))?;

        let mut out = Vec::new();
        while let Some(row) = rows
            .next()
            .map_err(|e| TranslateError::Execution(format!("fetch failed: {}", e)))?
        {
            let mut record = Row::new();
            for (i, name) in column_names.iter().enumerate() {
                let value = row
                    .get_ref(i)
                    .map_err(|e| TranslateError::Execution(format!("read failed: {}", e)))?;
                record.insert(name.clone(), json_value(value));
            }
            out.push(record);
        }
        Ok(out)
    }
}

fn json_value(value: ValueRef<'_>) -> serde_json::Value {
    match value {
        ValueRef::Null => serde_json::Value::Null,
        ValueRef::Integer(v) => serde_json::Value::from(v),
        ValueRef::Real(v) => serde_json::Value::from(v),
        ValueRef::Text(v) => serde_json::Value::from(String::from_utf8_lossy(v).into_owned()),
        // Blobs are not part of any business-facing answer
        ValueRef::Blob(_) => serde_json::Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_db(path: &Path) {
        let conn = Connection::open(path).unwrap();
        conn.execute_batch(
            "CREATE TABLE cust_mst (c_id INTEGER PRIMARY KEY, c_name TEXT);
             INSERT INTO cust_mst VALUES (4, 'Ada Lovelace'), (7, 'Grace Hopper');",
        )
        .unwrap();
    }

    #[test]
    fn binds_params_positionally() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("legacy.db");
        seeded_db(&path);

        let executor = ReadOnlyExecutor::open(&path).unwrap();
        let query = ResolvedQuery {
            sql_query: "SELECT c_name FROM cust_mst WHERE c_id = ?;".to_string(),
            params: vec![SqlParam::Text("4".to_string())],
        };
        let rows = executor.run(&query).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["c_name"], serde_json::json!("Ada Lovelace"));
    }

    #[test]
    fn read_only_rejects_writes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("legacy.db");
        seeded_db(&path);

        let executor = ReadOnlyExecutor::open(&path).unwrap();
        let query = ResolvedQuery {
            sql_query: "DELETE FROM cust_mst;".to_string(),
            params: vec![],
        };
        assert!(executor.run(&query).is_err());
    }
}
