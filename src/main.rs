//! Student records auth service - Entry Point
//!
//! Serves user registration and login over a line-based command protocol.

use log::{error, info};
use std::process::ExitCode;

use student_records_auth::config::ServiceConfig;
use student_records_auth::error::ServerError;
use student_records_auth::server::Server;
use student_records_auth::storage::open_store;
use student_records_auth::utils::logging::setup_logging;

#[tokio::main]
async fn main() -> ExitCode {
    // RUST_LOG overrides the default `info` filter
    setup_logging();

    info!("Launching student records auth service...");

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), ServerError> {
    let config = ServiceConfig::load()?;
    let store = open_store(&config.storage)?;
    let server = Server::bind(config, store).await?;

    tokio::select! {
        _ = server.start() => {}
        _ = tokio::signal::ctrl_c() => info!("Shutdown requested"),
    }

    Ok(())
}
