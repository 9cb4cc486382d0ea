use std::sync::Arc;

use movies_dal::Pool;

#[derive(Clone)]
pub struct AppState {
    state: Arc<AppStateInner>,
}

impl AppState {
    pub fn new(app_config: AppConfig, pool: Pool) -> Self {
        AppState {
            state: Arc::new(AppStateInner { app_config, pool }),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.state.app_config
    }

    pub fn pool(&self) -> &Pool {
        &self.state.pool
    }
}

struct AppStateInner {
    pool: Pool,
    app_config: AppConfig,
}

pub struct AppConfig {
    pub upload_limit_mb: usize,
}

// Required by axum-valid's `Garde` extractor: the validation context `()`
// must be obtainable from the router state.
impl axum::extract::FromRef<AppState> for () {
    fn from_ref(_: &AppState) {}
}
