//! Application state.
//!
//! All shared resources are constructed once in setup and injected through
//! this struct; nothing in the request path reaches for ambient globals.

use std::sync::Arc;

use intake_core::Config;
use intake_db::SubmissionRepository;
use intake_storage::DocumentSink;
use sqlx::PgPool;

use crate::services::email::EmailService;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub pool: PgPool,
    pub submissions: SubmissionRepository,
    pub sink: Arc<dyn DocumentSink>,
    pub mailer: Option<EmailService>,
}

fn _assert_app_state_send_sync() {
    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}
    assert_send::<AppState>();
    assert_sync::<AppState>();
}
