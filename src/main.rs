//! span-finalizer
//!
//! Replays a captured transaction through the trace finalizer and prints the
//! spans it records.
//!
//! ```text
//!  transaction.json ──▶ decision ──▶ HttpTracer ──▶ finalize ──▶ MemoryDriver ──▶ stdout (JSON)
//!  config.toml ───────▶ validated FinalizerConfig ──▶ trace::Config
//! ```

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use span_finalizer::config::{load_config, FinalizerConfig};
use span_finalizer::observability::logging;
use span_finalizer::replay::{replay, Transaction};
use span_finalizer::trace::{Config, HttpTracer, LocalInfo, MemoryDriver};

#[derive(Parser)]
#[command(name = "span-finalizer")]
#[command(about = "Replay a proxied transaction through the trace finalizer", long_about = None)]
struct Cli {
    /// TOML configuration file; defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON transaction capture.
    transaction: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => FinalizerConfig::default(),
    };
    logging::init(&config.observability);

    tracing::info!(
        operation = config.tracing.operation_name.as_str(),
        verbose = config.tracing.verbose,
        custom_tags = config.tracing.custom_tags.len(),
        "Configuration loaded"
    );

    let transaction: Transaction = serde_json::from_str(&fs::read_to_string(&cli.transaction)?)?;

    let driver = MemoryDriver::new();
    let tracer = HttpTracer::new(Arc::new(driver.clone()), LocalInfo::from(&config.local));
    let runtime_config = Config::from_schema(&config);

    let decision = replay(&transaction, &tracer, &runtime_config);
    tracing::info!(
        reason = decision.reason.as_str(),
        traced = decision.traced,
        "Transaction replayed"
    );

    let spans = driver.take_finished();
    println!("{}", serde_json::to_string_pretty(&spans)?);
    Ok(())
}
