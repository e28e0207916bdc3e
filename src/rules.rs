//! Value Mapper
//!
//! Business rules are unstructured strings; some of them encode coded
//! value maps as `<code>: '<label>'` occurrences (e.g. `5: 'cancelled'`),
//! possibly several per rule, anywhere in the text. The scanner is kept
//! separate from the mapping step so the contract's free-text format can
//! change without touching the mapper's contract.

use crate::assembler::SqlParam;
use crate::contract::ColumnDef;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref VALUE_RULE: Regex =
        Regex::new(r"(\d+):\s*'([^']*)'").expect("value rule pattern must compile");
}

/// Extract every `<code>: '<label>'` pair from one rule string, in order
/// of appearance.
///
/// The contract format defines no escaping: a label containing a quote
/// character is truncated at that quote. Known limitation, pinned by a
/// test below.
pub fn scan_value_rules(rule: &str) -> Vec<(i64, String)> {
    VALUE_RULE
        .captures_iter(rule)
        .filter_map(|caps| {
            let code = caps[1].parse::<i64>().ok()?;
            Some((code, caps[2].to_string()))
        })
        .collect()
}

/// Rewrite a filter literal through the column's coded business rules.
///
/// Best effort: the first occurrence across the column's rules whose
/// label equals `raw` case-insensitively wins. An unmapped value is
/// assumed to already be in physical form and passes through unchanged.
pub fn map_value(column: &ColumnDef, raw: &str) -> SqlParam {
    for rule in &column.business_rules {
        for (code, label) in scan_value_rules(rule) {
            if label.eq_ignore_ascii_case(raw) {
                return SqlParam::Integer(code);
            }
        }
    }
    SqlParam::Text(raw.to_string())
}
