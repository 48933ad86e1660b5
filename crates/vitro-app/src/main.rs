//! Vitro — application entry point.
//!
//! Wires telemetry, configuration, the datastore, and the access gate,
//! then reports the startup state. The interactive surface sits on top
//! of this wiring and re-evaluates the gate on every cycle.

use tracing_subscriber::EnvFilter;
use vitro_auth::{AccessGate, GateState};
use vitro_core::error::VitroResult;
use vitro_core::models::session::Session;
use vitro_db::{DbConfig, DbManager, SurrealUserRepository};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("vitro=info".parse().unwrap()))
        .json()
        .init();

    tracing::info!("Starting vitro...");

    if let Err(e) = run().await {
        tracing::error!(error = %e, "startup failed");
        std::process::exit(1);
    }
}

async fn run() -> VitroResult<()> {
    let config = DbConfig::from_env()?;
    let manager = DbManager::connect(&config).await?;
    vitro_db::run_migrations(manager.client()).await?;

    let users = SurrealUserRepository::new(manager.client().clone());
    let gate = AccessGate::new(users);

    match gate.evaluate(&Session::unauthenticated()).await? {
        GateState::Setup => {
            tracing::info!("no accounts found; first-run administrator setup required")
        }
        GateState::Login => tracing::info!("credential store ready; login required"),
        GateState::Authenticated => {}
    }

    Ok(())
}
