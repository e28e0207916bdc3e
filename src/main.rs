use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use querylens::contract::SchemaContract;
use querylens::engine::QueryTranslator;
use querylens::executor::ReadOnlyExecutor;

#[derive(Parser)]
#[command(name = "querylens")]
#[command(about = "Translate business-language questions into parameterized SQL for a legacy schema")]
struct Args {
    /// The request in business language, e.g. "Which sales orders are cancelled?"
    description: String,

    /// Path to the schema contract JSON
    #[arg(short, long, default_value = "contract.json")]
    contract: PathBuf,

    /// SQLite mirror of the legacy schema to run the query against (read-only)
    #[arg(long)]
    db: Option<PathBuf>,

    /// Print the {sql_query, params} envelope as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let contract = SchemaContract::load(&args.contract)?;
    let translator = QueryTranslator::new(&contract);
    let query = translator.translate(&args.description)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&query)?);
    } else {
        println!("SQL:    {}", query.sql_query);
        println!("Params: {}", serde_json::to_string(&query.params)?);
    }

    if let Some(db) = &args.db {
        let executor = ReadOnlyExecutor::open(db)?;
        let rows = executor.run(&query)?;
        info!("Query returned {} row(s)", rows.len());
        for row in &rows {
            println!("{}", serde_json::to_string(row)?);
        }
    }

    Ok(())
}
