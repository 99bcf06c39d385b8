//! watermarkstat entry point.
//!
//! Only the clear operation is supported: it asks the buffer orchestration
//! to reset a watermark group in every selected namespace.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use sonic_db_common::{DbId, RedisDatabase};
use sonic_intfutil::{select_namespaces, watermark, IntfUtilConfig, IntfUtilError, WatermarkKind};

/// Clear buffer watermarks
#[derive(Parser, Debug)]
#[command(name = "watermarkstat")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Watermark group to clear
    #[arg(short = 'c', long, value_enum)]
    clear: WatermarkKind,

    /// Clear the persistent watermark instead of the user one
    #[arg(short = 'p', long)]
    persistent: bool,

    /// Only clear in this namespace
    #[arg(short = 'n', long)]
    namespace: Option<String>,

    /// Configuration file [default: /etc/sonic/intfutil.toml]
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(short = 'l', long, default_value = "warn")]
    log_level: String,
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = IntfUtilConfig::load_from(args.config.as_deref())?;
    config.validate()?;

    for namespace in select_namespaces(&config.namespace_list(), args.namespace.as_deref())? {
        let counters_db = RedisDatabase::connect(config.redis_config(&namespace, DbId::CountersDb))
            .await
            .map_err(|source| IntfUtilError::StoreUnavailable {
                namespace: namespace.to_string(),
                source,
            })?;

        watermark::clear(&counters_db, args.clear, args.persistent).await?;
    }

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(&args.log_level);

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Failed to start runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(args)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
