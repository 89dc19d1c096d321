use std::sync::Arc;

use crate::auth::service::AuthService;
use crate::report::service::ReportService;

/// Shared application state injected into all route handlers via Axum extractors.
/// Built once in `main`; every service inside is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub reports: Arc<ReportService>,
}
