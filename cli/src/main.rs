use clap::Parser;
use jsonserver_core::{run_demo, ConsoleReporter, JsonServerClient};
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod args;
mod exit_codes;

use args::Cli;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    std::process::exit(run(&cli));
}

fn run(cli: &Cli) -> i32 {
    let auth = match cli.auth() {
        Ok(auth) => auth,
        Err(err) => {
            eprintln!("error: {err} (use --token or set JSON_SERVER_API_TOKEN)");
            return exit_codes::CONFIG_ERROR;
        }
    };
    debug!(base_url = auth.base_url(), db = auth.database(), "starting demo");

    let client = JsonServerClient::new(auth);
    let mut reporter = ConsoleReporter::default();
    match run_demo(&client, &cli.post(), &mut reporter) {
        Ok(_) => exit_codes::SUCCESS,
        // the reporter has already printed the failure
        Err(err) => {
            debug!(error = ?err, "demo failed");
            exit_codes::RUN_FAILED
        }
    }
}
