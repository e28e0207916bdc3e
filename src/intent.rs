//! Intent Parser
//!
//! Matches a request description against an ordered, closed set of
//! sentence shapes. The first shape whose pattern matches the full
//! description (case-insensitive) wins; later shapes are never tried.
//! A shape's outcome is either an extractor producing a [`ParsedIntent`]
//! or a terminal unsupported claim, so known-but-unimplemented question
//! shapes get a specific, stable error instead of the generic rejection.

use crate::error::{Result, TranslateError};
use lazy_static::lazy_static;
use regex::{Captures, Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Requested-column marker meaning "every physical column of the table".
pub const WILDCARD: &str = "*";

/// Structured form of a request: what to query, which business-level
/// fields to return, and which filters to apply. Transient; built fresh
/// per call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedIntent {
    /// Business name of the entity to query
    pub target: String,
    /// Requested business field names, or the `*` wildcard
    pub columns: Vec<String>,
    pub filters: Vec<IntentFilter>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentFilter {
    /// Business-level column name (logical `id`/`status` included)
    pub column: String,
    pub operator: String,
    pub value: String,
}

fn shape(pattern: &str) -> Regex {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .expect("sentence shape pattern must compile")
}

lazy_static! {
    static ref SHOW_FIELD_BY_ID: Regex =
        shape(r"^show me the (.+?) for the (.+?) with id (\d+)[.!]?$");
    static ref WHICH_ARE_VALUE: Regex = shape(r"^which (.+?) are (.+?)\??$");
    static ref LIST_ALL_IN: Regex = shape(r"^list all (.+?) in the '(.+?)'[.!]?$");
    static ref NAME_BY_ID: Regex = shape(r"^what is the name of the (.+?) with id (\d+)\??$");
    static ref QUANTITY_PER_PRODUCT: Regex =
        shape(r"^what was the quantity of each product sold in order number (\d+)\??$");
    static ref WHO_PLACED_ORDER: Regex = shape(r"^who placed order number (\d+)\??$");
}

/// What matching a sentence shape produces.
enum ShapeOutcome {
    /// Build an intent from the captured groups
    Extract(fn(&Captures) -> ParsedIntent),
    /// Claimed shape that the engine deliberately does not implement
    Unsupported(&'static str),
}

struct SentenceShape {
    pattern: &'static Regex,
    outcome: ShapeOutcome,
}

fn extract_show_field(caps: &Captures) -> ParsedIntent {
    ParsedIntent {
        target: caps[2].to_string(),
        columns: vec![caps[1].to_string()],
        filters: vec![IntentFilter {
            column: "id".to_string(),
            operator: "=".to_string(),
            value: caps[3].to_string(),
        }],
    }
}

fn extract_which_are(caps: &Captures) -> ParsedIntent {
    ParsedIntent {
        target: caps[1].to_string(),
        columns: vec!["id".to_string()],
        filters: vec![IntentFilter {
            column: "status".to_string(),
            operator: "=".to_string(),
            value: caps[2].to_string(),
        }],
    }
}

fn extract_list_all(caps: &Captures) -> ParsedIntent {
    // The quoted qualifier names the table; the leading noun is filler
    // ("list all records in the 'sales orders'").
    ParsedIntent {
        target: caps[2].to_string(),
        columns: vec![WILDCARD.to_string()],
        filters: Vec::new(),
    }
}

fn extract_name_by_id(caps: &Captures) -> ParsedIntent {
    ParsedIntent {
        target: caps[1].to_string(),
        columns: vec!["name".to_string()],
        filters: vec![IntentFilter {
            column: "id".to_string(),
            operator: "=".to_string(),
            value: caps[2].to_string(),
        }],
    }
}

pub struct IntentParser {
    shapes: Vec<SentenceShape>,
}

impl Default for IntentParser {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentParser {
    pub fn new() -> Self {
        Self {
            shapes: vec![
                SentenceShape {
                    pattern: &SHOW_FIELD_BY_ID,
                    outcome: ShapeOutcome::Extract(extract_show_field),
                },
                SentenceShape {
                    pattern: &WHICH_ARE_VALUE,
                    outcome: ShapeOutcome::Extract(extract_which_are),
                },
                SentenceShape {
                    pattern: &LIST_ALL_IN,
                    outcome: ShapeOutcome::Extract(extract_list_all),
                },
                SentenceShape {
                    pattern: &NAME_BY_ID,
                    outcome: ShapeOutcome::Extract(extract_name_by_id),
                },
                SentenceShape {
                    pattern: &QUANTITY_PER_PRODUCT,
                    outcome: ShapeOutcome::Unsupported(
                        "per-line quantities require joining order lines to products, \
                         which is not supported yet",
                    ),
                },
                SentenceShape {
                    pattern: &WHO_PLACED_ORDER,
                    outcome: ShapeOutcome::Unsupported(
                        "linking an order to its customer requires a join, \
                         which is not supported yet",
                    ),
                },
            ],
        }
    }

    /// First matching shape wins; no match at all is the "no intent" path,
    /// surfaced as the same error kind as a claimed-but-unsupported shape.
    pub fn parse(&self, description: &str) -> Result<ParsedIntent> {
        let trimmed = description.trim();
        for sentence in &self.shapes {
            if let Some(caps) = sentence.pattern.captures(trimmed) {
                return match &sentence.outcome {
                    ShapeOutcome::Extract(extract) => Ok(extract(&caps)),
                    ShapeOutcome::Unsupported(reason) => {
                        debug!("Claimed unsupported shape: {}", trimmed);
                        Err(TranslateError::UnsupportedOperation {
                            hint: format!("{}. Try rephrasing the request.", reason),
                        })
                    }
                };
            }
        }
        debug!("No sentence shape matched: {}", trimmed);
        Err(TranslateError::UnsupportedOperation {
            hint: "the request did not match any supported question shape. \
                   Try rephrasing the request."
                .to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(description: &str) -> Result<ParsedIntent> {
        IntentParser::new().parse(description)
    }

    #[test]
    fn show_field_by_id() {
        let intent = parse("Show me the Customer Name for the customer with ID 4.").unwrap();
        assert_eq!(intent.target, "customer");
        assert_eq!(intent.columns, vec!["Customer Name"]);
        assert_eq!(
            intent.filters,
            vec![IntentFilter {
                column: "id".to_string(),
                operator: "=".to_string(),
                value: "4".to_string(),
            }]
        );
    }

    #[test]
    fn which_entities_are_value() {
        let intent = parse("Which sales orders are cancelled?").unwrap();
        assert_eq!(intent.target, "sales orders");
        assert_eq!(intent.columns, vec!["id"]);
        assert_eq!(intent.filters[0].column, "status");
        assert_eq!(intent.filters[0].value, "cancelled");
    }

    #[test]
    fn list_all_takes_quoted_qualifier_as_target() {
        let intent = parse("List all records in the 'sales orders'").unwrap();
        assert_eq!(intent.target, "sales orders");
        assert_eq!(intent.columns, vec![WILDCARD]);
        assert!(intent.filters.is_empty());
    }

    #[test]
    fn name_by_id() {
        let intent = parse("What is the name of the customer with ID 7?").unwrap();
        assert_eq!(intent.target, "customer");
        assert_eq!(intent.columns, vec!["name"]);
        assert_eq!(intent.filters[0].value, "7");
    }

    #[test]
    fn join_shapes_are_claimed_but_unsupported() {
        for description in [
            "What was the quantity of each product sold in order number 1001?",
            "Who placed order number 42?",
        ] {
            match parse(description) {
                Err(TranslateError::UnsupportedOperation { hint }) => {
                    assert!(hint.contains("join"), "hint should mention joins: {}", hint)
                }
                other => panic!("expected UnsupportedOperation, got {:?}", other),
            }
        }
    }

    #[test]
    fn gibberish_is_unsupported() {
        assert!(matches!(
            parse("gibberish with no structure"),
            Err(TranslateError::UnsupportedOperation { .. })
        ));
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert!(parse("WHICH SALES ORDERS ARE CANCELLED?").is_ok());
        assert!(parse("show me the Customer Name for the CUSTOMER with id 4").is_ok());
    }

    #[test]
    fn parse_is_deterministic() {
        let first = parse("Which sales orders are cancelled?").unwrap();
        let second = parse("Which sales orders are cancelled?").unwrap();
        assert_eq!(first, second);
    }
}
