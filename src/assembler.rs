//! Query Assembler
//!
//! Combines resolved identifiers and mapped values into one parameterized
//! SELECT statement plus its positional parameter list. Table and column
//! names are the only free-form text written into the SQL string, and
//! they come exclusively from contract-resolved identifiers; every
//! caller-supplied literal travels in `params` behind a `?` placeholder.

use crate::contract::TableDef;
use crate::error::Result;
use crate::intent::{IntentFilter, WILDCARD};
use crate::resolver::NameResolver;
use crate::rules;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// A positional SQL parameter. Integer only when a coded business rule
/// mapped the caller's label; everything else stays text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SqlParam {
    Integer(i64),
    Text(String),
}

impl std::fmt::Display for SqlParam {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SqlParam::Integer(v) => write!(f, "{}", v),
            SqlParam::Text(v) => write!(f, "{}", v),
        }
    }
}

/// Final output of a translation: one statement, `?` placeholders,
/// parameters in statement order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedQuery {
    pub sql_query: String,
    pub params: Vec<SqlParam>,
}

pub fn assemble(
    resolver: &NameResolver,
    table: &TableDef,
    columns: &[String],
    filters: &[IntentFilter],
) -> Result<ResolvedQuery> {
    let mut select_parts: Vec<&str> = Vec::new();
    for requested in columns {
        if requested == WILDCARD {
            // All physical columns, contract declaration order
            select_parts.extend(table.columns.iter().map(|c| c.name.as_str()));
        } else {
            select_parts.push(resolver.resolve_column(table, requested)?.name.as_str());
        }
    }

    let mut clauses: Vec<String> = Vec::new();
    let mut params: Vec<SqlParam> = Vec::new();
    for filter in filters {
        let column = resolver.resolve_column(table, &filter.column)?;
        clauses.push(format!("{} {} ?", column.name, filter.operator));
        params.push(rules::map_value(column, &filter.value));
    }

    let mut sql = format!(
        "SELECT {} FROM {}",
        select_parts.iter().join(", "),
        table.name
    );
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
    sql.push(';');

    Ok(ResolvedQuery {
        sql_query: sql,
        params,
    })
}
