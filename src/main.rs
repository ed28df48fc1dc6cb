use anyhow::Result;
use clap::Parser;
use tracing::error;

use reqstat::{app, utils, Args};

fn main() -> Result<()> {
    let args = Args::parse();
    utils::setup_logging(args.verbose);
    utils::validate_args(&args)?;

    if args.is_client() {
        if let Err(e) = app::run_client(&args) {
            eprintln!("{:#}", e);
            std::process::exit(1);
        }
        return Ok(());
    }

    let server = match app::prepare_server(&args) {
        Ok(server) => server,
        Err(e) => {
            error!(action = "start", component = "main", error = %format!("{:#}", e), "Startup failed");
            eprintln!("{:#}", e);
            std::process::exit(1);
        }
    };
    server.serve()
}
