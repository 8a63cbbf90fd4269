use clap::Parser;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    dirsweep_cli::init_tracing();

    let cli = dirsweep_cli::Cli::parse();
    if let Err(e) = dirsweep_cli::run(cli).await {
        tracing::error!("{e:#}");
        eprintln!("Error: {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}
