//! Application setup and initialization
//!
//! Everything here runs once at startup: tracing, the database pool and
//! migrations, the document sink, the mailer, and the router. All of it is
//! handed to request handling through `AppState` — no ambient globals.

pub mod database;
pub mod routes;
pub mod server;
pub mod telemetry;

use std::sync::Arc;

use anyhow::Result;
use intake_core::Config;
use intake_db::SubmissionRepository;

use crate::services::email::EmailService;
use crate::state::AppState;

/// Initialize the entire application.
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    telemetry::init_tracing();

    tracing::info!(
        environment = %config.environment,
        storage_backend = %config.storage_backend,
        email_unique = config.submission_email_unique,
        "Configuration loaded"
    );

    // Database: connect, migrate, reconcile the optional email constraint.
    let pool = database::setup_database(&config).await?;
    let submissions = SubmissionRepository::new(pool.clone());
    submissions
        .ensure_email_uniqueness(config.submission_email_unique)
        .await?;

    // Document sink (deployment strategy fixed here).
    let sink = intake_storage::create_sink(&config).await?;

    let mailer = EmailService::from_config(&config);

    let state = Arc::new(AppState {
        config: config.clone(),
        pool,
        submissions,
        sink,
        mailer,
    });

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
