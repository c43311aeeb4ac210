use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use selfcert::config::Settings;
use selfcert::issue::issue_certificate;
use tracing_subscriber::EnvFilter;

mod cli;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("selfcert=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    let settings = Settings::load(cli.config.as_deref()).context("can't load settings")?;
    let request = cli.into_request(&settings);

    let issued = issue_certificate(&request, &settings)?;

    tracing::info!("the keys and certificate have been generated successfully");
    println!("Certificate Info: {}", issued.certificate_path.display());
    println!("Private Key File: {}", issued.private_key_path.display());
    println!("Public Key File: {}", issued.public_key_path.display());
    Ok(())
}
