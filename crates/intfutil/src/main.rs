//! intfutil entry point.
//!
//! Prints one interface report as a text table on stdout. Logs go to
//! stderr so they never mix with the table.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use sonic_intfutil::{
    select_namespaces, DisplayMode, FanOutRunner, IntfUtilConfig, RedisConnector, ReportKind,
    ReportQuery,
};

/// Show interface status
#[derive(Parser, Debug)]
#[command(name = "intfutil")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Report to show
    #[arg(short = 'c', long = "command", value_enum, default_value = "status")]
    command: ReportKind,

    /// Interface names or ranges (Ethernet0,Ethernet8-16), a sub-interface, or "subport"
    #[arg(short = 'i', long)]
    interface: Option<String>,

    /// Only query this namespace
    #[arg(short = 'n', long)]
    namespace: Option<String>,

    /// Which interfaces to show
    #[arg(short = 'd', long, value_enum)]
    display: Option<DisplayMode>,

    /// Configuration file [default: /etc/sonic/intfutil.toml]
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(short = 'l', long, default_value = "warn")]
    log_level: String,
}

/// Initialize tracing/logging on stderr.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Runs the report. Returns false if some namespace had to be left out.
async fn run(args: Args) -> anyhow::Result<bool> {
    let config = IntfUtilConfig::load_from(args.config.as_deref())?;
    config.validate()?;
    debug!(config = ?args.config, "Loaded configuration");

    let namespaces = select_namespaces(&config.namespace_list(), args.namespace.as_deref())?;
    let display = args.display.unwrap_or_else(|| config.display_mode());
    let query = ReportQuery::new(args.command, args.interface.as_deref())?;

    let runner = FanOutRunner::new(
        RedisConnector::new(config.clone()),
        config.port_capabilities(),
    );
    let report = runner
        .run(&namespaces, &query, &display)
        .await
        .with_context(|| format!("Failed to build the {} report", query.kind))?;

    print!("{}", report.render());
    Ok(report.is_complete())
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
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
