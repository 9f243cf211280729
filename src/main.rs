use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use thiserror::Error;

use crate::analysis::MockAnalyzer;
use crate::api::server::AppState;
use crate::db::prelude::MemStorage;
use crate::util::env::{Env, EnvErr};
use crate::util::telemetry;

mod analysis;
mod api;
mod args;
mod db;
mod util;

#[derive(Debug, Error)]
enum RunnerErr {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Env(#[from] EnvErr),

    #[error(transparent)]
    Std(#[from] Box<dyn std::error::Error>),
}

type Result<T> = core::result::Result<T, RunnerErr>;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = args::parse_cli_args();

    let mut env = Env::load()?;
    cli.apply(&mut env);

    let telemetry = telemetry::Telemetry::new(&env)?.register()?;
    tracing::info!(seed = env.seed, "seeding in-memory store");

    let storage = MemStorage::seeded(env.seed, Utc::now());
    let analyzer = MockAnalyzer::new(Duration::from_millis(env.analysis_delay_ms));
    let state = AppState::new(Arc::new(storage), analyzer);

    let served = api::server::serve(&env, state).await;
    if let Err(e) = &served {
        tracing::error!(error = ?e, "server exited with error");
    }

    telemetry.shutdown();
    served?;

    Ok(())
}
