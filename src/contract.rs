//! Schema Contract
//!
//! In-memory description of the legacy schema: tables, columns, business
//! names and coded business rules. Loaded from JSON, cached with an
//! mtime check, and treated as an immutable snapshot by the translation
//! engine.
//!
//! Tables and columns are kept as ordered lists rather than maps because
//! name resolution tie-breaks on declaration order and translation must
//! be deterministic.

use crate::error::{Result, TranslateError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, info};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaContract {
    pub tables: Vec<TableDef>,
    #[serde(default)]
    pub abbreviations: Vec<Abbreviation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableDef {
    /// Physical table name in the legacy schema
    pub name: String,
    pub business_name: String,
    pub description: String,
    pub columns: Vec<ColumnDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnDef {
    /// Physical column name in the legacy schema
    pub name: String,
    pub business_name: String,
    pub description: String,
    /// Informational only; the engine performs no type coercion
    pub data_type: String,
    /// Free-text annotations; coded value maps appear as `<code>: '<label>'`
    #[serde(default)]
    pub business_rules: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Abbreviation {
    pub code: String,
    pub expansion: String,
}

impl SchemaContract {
    pub fn from_json(json: &str) -> Result<Self> {
        let contract: SchemaContract = serde_json::from_str(json)?;
        contract.validate()?;
        Ok(contract)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let contract = Self::from_json(&contents)?;
        info!(
            "Loaded schema contract: {} table(s), {} abbreviation(s)",
            contract.tables.len(),
            contract.abbreviations.len()
        );
        Ok(contract)
    }

    /// Physical names are unique keys within their scope; everything else
    /// in the contract is free text.
    fn validate(&self) -> Result<()> {
        let mut seen_tables = HashSet::new();
        for table in &self.tables {
            if table.name.trim().is_empty() {
                return Err(TranslateError::Contract(
                    "table with empty physical name".to_string(),
                ));
            }
            if !seen_tables.insert(table.name.to_lowercase()) {
                return Err(TranslateError::Contract(format!(
                    "duplicate table '{}'",
                    table.name
                )));
            }
            let mut seen_columns = HashSet::new();
            for column in &table.columns {
                if column.name.trim().is_empty() {
                    return Err(TranslateError::Contract(format!(
                        "table '{}' has a column with an empty physical name",
                        table.name
                    )));
                }
                if !seen_columns.insert(column.name.to_lowercase()) {
                    return Err(TranslateError::Contract(format!(
                        "duplicate column '{}' in table '{}'",
                        column.name, table.name
                    )));
                }
            }
        }
        Ok(())
    }

    /// Expand a cryptic naming code (e.g. `mst` -> `master`) via the
    /// contract's abbreviation glossary. Separate from translation; this
    /// backs the "what does this name mean" lookup.
    pub fn expand_abbreviation(&self, code: &str) -> Option<&str> {
        self.abbreviations
            .iter()
            .find(|a| a.code.eq_ignore_ascii_case(code.trim()))
            .map(|a| a.expansion.as_str())
    }
}

/// Caches a parsed contract and reloads it when the backing file changes,
/// so long-running callers pick up contract updates without a restart.
/// The engine itself never touches this; it receives a borrowed snapshot.
pub struct ContractCache {
    path: PathBuf,
    loaded_at: Option<SystemTime>,
    contract: Option<SchemaContract>,
}

impl ContractCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            loaded_at: None,
            contract: None,
        }
    }

    pub fn get(&mut self) -> Result<&SchemaContract> {
        let modified = std::fs::metadata(&self.path)?.modified()?;
        let fresh = self.contract.is_some() && self.loaded_at.map_or(false, |t| t >= modified);
        if !fresh {
            debug!("Reloading schema contract from {}", self.path.display());
            self.contract = Some(SchemaContract::load(&self.path)?);
            self.loaded_at = Some(modified);
        }
        self.contract
            .as_ref()
            .ok_or_else(|| TranslateError::Contract("contract cache is empty after load".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn contract_json(tables: &str) -> String {
        format!(r#"{{ "tables": [{}] }}"#, tables)
    }

    const CUSTOMER_TABLE: &str = r#"{
        "name": "cust_mst",
        "business_name": "Customer",
        "description": "Customer master records",
        "columns": [
            {"name": "c_id", "business_name": "Customer ID", "description": "Primary key", "data_type": "INTEGER"}
        ]
    }"#;

    #[test]
    fn parses_minimal_contract() {
        let contract = SchemaContract::from_json(&contract_json(CUSTOMER_TABLE)).unwrap();
        assert_eq!(contract.tables.len(), 1);
        assert_eq!(contract.tables[0].columns[0].name, "c_id");
        assert!(contract.tables[0].columns[0].business_rules.is_empty());
        assert!(contract.abbreviations.is_empty());
    }

    #[test]
    fn rejects_duplicate_tables() {
        let json = contract_json(&format!("{}, {}", CUSTOMER_TABLE, CUSTOMER_TABLE));
        let err = SchemaContract::from_json(&json).unwrap_err();
        assert!(err.to_string().contains("duplicate table"), "got: {}", err);
    }

    #[test]
    fn rejects_duplicate_columns() {
        let table = r#"{
            "name": "so_hdr",
            "business_name": "sales orders",
            "description": "",
            "columns": [
                {"name": "ord_id", "business_name": "Order Number", "description": "", "data_type": "INTEGER"},
                {"name": "ORD_ID", "business_name": "Order Number", "description": "", "data_type": "INTEGER"}
            ]
        }"#;
        let err = SchemaContract::from_json(&contract_json(table)).unwrap_err();
        assert!(err.to_string().contains("duplicate column"), "got: {}", err);
    }

    #[test]
    fn expands_abbreviations_case_insensitively() {
        let json = r#"{
            "tables": [],
            "abbreviations": [
                {"code": "mst", "expansion": "master"},
                {"code": "hdr", "expansion": "header"}
            ]
        }"#;
        let contract = SchemaContract::from_json(json).unwrap();
        assert_eq!(contract.expand_abbreviation("MST"), Some("master"));
        assert_eq!(contract.expand_abbreviation(" hdr "), Some("header"));
        assert_eq!(contract.expand_abbreviation("dtl"), None);
    }

    #[test]
    fn cache_reloads_when_file_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contract.json");
        std::fs::write(&path, contract_json(CUSTOMER_TABLE)).unwrap();

        let mut cache = ContractCache::new(&path);
        assert_eq!(cache.get().unwrap().tables.len(), 1);

        // Coarse mtime granularity on some filesystems
        std::thread::sleep(std::time::Duration::from_millis(1100));

        let two_tables = contract_json(&format!(
            "{}, {}",
            CUSTOMER_TABLE,
            CUSTOMER_TABLE.replace("cust_mst", "cust_arch")
        ));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(two_tables.as_bytes()).unwrap();
        file.sync_all().unwrap();
        drop(file);

        assert_eq!(cache.get().unwrap().tables.len(), 2);
    }
}
