//! `vertclip` binary.

use clap::Parser;
use std::process::ExitCode;
use tracing::error;

use vertclip_cli::logging::init_tracing;
use vertclip_cli::{Args, CliConfig};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let config = CliConfig::from_env();
    init_tracing(config.log_format, args.verbose);

    match vertclip_cli::run(&args, &config, |line| println!("{}", line)).await {
        Ok(outcome) => {
            println!("Done! Output saved to: {}", outcome.output.display());
            ExitCode::SUCCESS
        }
        Err(e) if e.is_encode_failure() => {
            error!("{}", e);
            println!("FFmpeg failed, check the command above for errors.");
            exit_code(e.exit_code())
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            exit_code(e.exit_code())
        }
    }
}

fn exit_code(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
