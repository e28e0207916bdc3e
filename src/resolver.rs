//! Name Resolver
//!
//! Maps business-facing table and column names onto physical identifiers
//! in the schema contract. Matching is case-insensitive substring overlap
//! in either direction, so plural or partial requests still resolve.
//! When several business names overlap, the tie-break is an explicit
//! policy: first match in contract declaration order (the documented
//! default), or longest business name. Switching the default is a domain
//! owner decision, not a bug fix.

use crate::contract::{ColumnDef, SchemaContract, TableDef};
use crate::error::{Result, TranslateError};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchPolicy {
    /// First matching entry in contract declaration order
    #[default]
    DeclarationOrder,
    /// Most specific match: the longest matching business name; ties fall
    /// back to declaration order
    LongestBusinessName,
}

pub struct NameResolver {
    policy: MatchPolicy,
}

impl NameResolver {
    pub fn new(policy: MatchPolicy) -> Self {
        Self { policy }
    }

    pub fn resolve_table<'a>(
        &self,
        contract: &'a SchemaContract,
        business_name: &str,
    ) -> Result<&'a TableDef> {
        let wanted = business_name.trim().to_lowercase();
        let found = self.pick(
            contract
                .tables
                .iter()
                .filter(|t| names_overlap(&t.business_name, &wanted)),
            |t| t.business_name.len(),
        );
        match found {
            Some(table) => {
                debug!("Resolved table '{}' -> {}", business_name, table.name);
                Ok(table)
            }
            None => Err(TranslateError::InvalidInput {
                term: business_name.to_string(),
                scope: "the schema contract".to_string(),
            }),
        }
    }

    /// Logical `id` and `status` are special-cased ahead of generic
    /// matching because physical schemas encode them inconsistently.
    pub fn resolve_column<'a>(
        &self,
        table: &'a TableDef,
        business_name: &str,
    ) -> Result<&'a ColumnDef> {
        let wanted = business_name.trim().to_lowercase();

        if wanted == "id" {
            if let Some(column) = table.columns.iter().find(|c| {
                let physical = c.name.to_lowercase();
                physical == "id" || physical.ends_with("_id")
            }) {
                return Ok(column);
            }
        }
        if wanted == "status" {
            if let Some(column) = table.columns.iter().find(|c| {
                let physical = c.name.to_lowercase();
                physical.ends_with("_stat") || physical.ends_with("_status")
            }) {
                return Ok(column);
            }
        }

        let found = self.pick(
            table
                .columns
                .iter()
                .filter(|c| names_overlap(&c.business_name, &wanted)),
            |c| c.business_name.len(),
        );
        match found {
            Some(column) => {
                debug!(
                    "Resolved column '{}' -> {}.{}",
                    business_name, table.name, column.name
                );
                Ok(column)
            }
            None => Err(TranslateError::InvalidInput {
                term: business_name.to_string(),
                scope: format!("table '{}'", table.name),
            }),
        }
    }

    fn pick<'a, T>(
        &self,
        candidates: impl Iterator<Item = &'a T>,
        name_len: impl Fn(&T) -> usize,
    ) -> Option<&'a T> {
        match self.policy {
            MatchPolicy::DeclarationOrder => candidates.into_iter().next(),
            MatchPolicy::LongestBusinessName => {
                let mut best: Option<&T> = None;
                for candidate in candidates {
                    // Strictly-greater keeps the earliest of equal-length names
                    if best.map_or(true, |b| name_len(candidate) > name_len(b)) {
                        best = Some(candidate);
                    }
                }
                best
            }
        }
    }
}

fn names_overlap(business_name: &str, wanted_lower: &str) -> bool {
    let business = business_name.to_lowercase();
    business.contains(wanted_lower) || wanted_lower.contains(&business)
}
