use std::path::PathBuf;
use std::process;

use clap::Parser;

use stockroute_cli::Command;
use stockroute_infra::FileStore;
use stockroute_observability::LogFormat;

#[derive(Parser)]
#[command(name = "stockroute")]
#[command(about = "Shelf-life aware routing of perishable stock across storage locations")]
#[command(version)]
struct Cli {
    /// Directory holding locations.json and audit.json
    #[arg(long, env = "STOCKROUTE_DATA_DIR", default_value = "stockroute-data")]
    data_dir: PathBuf,

    /// Log output format (json or pretty)
    #[arg(long, env = "STOCKROUTE_LOG_FORMAT", default_value = "json")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    stockroute_observability::init_with(cli.log_format);

    let store = FileStore::new(&cli.data_dir);
    match stockroute_cli::run(cli.command, &store) {
        Ok(output) => print!("{output}"),
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("error: {e:#}");
            process::exit(1);
        }
    }
}
