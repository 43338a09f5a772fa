use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use hrm_schema::cli::Args;
use hrm_schema::commands::{CommandContext, CommandRunner};

fn main() -> ExitCode {
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let ctx = CommandContext {
        database_url: args.database_url,
    };

    match args.command.run(&ctx, args.format) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
