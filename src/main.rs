use std::io;
use std::num::NonZeroUsize;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use rowstore::{Session, TABLE_MAX_PAGES, Table, TableConfig};

/// Interactive in-memory row store.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Maximum number of pages the table may allocate
    #[arg(long, default_value_t = NonZeroUsize::new(TABLE_MAX_PAGES).unwrap_or(NonZeroUsize::MIN))]
    max_pages: NonZeroUsize,

    /// Log more to stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = TableConfig::new(cli.max_pages);
    info!(max_pages = config.max_pages(), max_rows = config.max_rows(), "starting");

    let mut session = Session::new(Table::with_config(config));
    match session.run(io::stdin().lock(), io::stdout().lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) if err.is_input_failure() => {
            println!("Error reading input");
            ExitCode::FAILURE
        }
        Err(err) => {
            error!(%err, "failed to write output");
            ExitCode::FAILURE
        }
    }
}
