use std::sync::Arc;

use axum::extract::FromRef;
use velvet_core::{PgDatabase, Velvet};

/// The velvet instance this server exposes
pub type App = Velvet<PgDatabase>;

#[derive(Clone, FromRef)]
pub struct ServerContext {
    pub app: Arc<App>,
}
