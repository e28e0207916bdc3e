pub mod assembler;
pub mod contract;
pub mod engine;
pub mod error;
pub mod executor;
pub mod intent;
pub mod resolver;
pub mod rules;

pub use assembler::{ResolvedQuery, SqlParam};
pub use contract::{ContractCache, SchemaContract};
pub use engine::QueryTranslator;
pub use error::{Result, TranslateError};
