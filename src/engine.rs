//! Semantic Query Translation Engine
//!
//! Linear, synchronous pipeline: description -> intent -> name
//! resolution and value mapping -> assembled query. Pure computation
//! over an immutable contract snapshot; no state survives between calls,
//! so one translator is safe to share across threads for as long as the
//! contract borrow lives.

use crate::assembler::{self, ResolvedQuery};
use crate::contract::SchemaContract;
use crate::error::Result;
use crate::intent::IntentParser;
use crate::resolver::{MatchPolicy, NameResolver};
use tracing::{debug, info};

pub struct QueryTranslator<'a> {
    contract: &'a SchemaContract,
    parser: IntentParser,
    resolver: NameResolver,
}

impl<'a> QueryTranslator<'a> {
    pub fn new(contract: &'a SchemaContract) -> Self {
        Self::with_policy(contract, MatchPolicy::default())
    }

    pub fn with_policy(contract: &'a SchemaContract, policy: MatchPolicy) -> Self {
        Self {
            contract,
            parser: IntentParser::new(),
            resolver: NameResolver::new(policy),
        }
    }

    /// Translate one request description into a parameterized query.
    /// Any resolution failure aborts the whole call; no partial query is
    /// ever returned.
    pub fn translate(&self, description: &str) -> Result<ResolvedQuery> {
        debug!("Translating: {}", description);
        let intent = self.parser.parse(description)?;
        let table = self.resolver.resolve_table(self.contract, &intent.target)?;
        let resolved = assembler::assemble(&self.resolver, table, &intent.columns, &intent.filters)?;
        info!("Translated '{}' -> {}", description, resolved.sql_query);
        Ok(resolved)
    }
}
