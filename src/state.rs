use std::sync::Arc;
use std::time::Duration;

use crate::auth::LoginThrottle;
use crate::config::AppConfig;
use crate::database::Store;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: Arc<AppConfig>,
    pub throttle: Arc<LoginThrottle>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: AppConfig) -> Self {
        let throttle = LoginThrottle::new(
            config.security.max_login_attempts,
            Duration::from_secs(config.security.login_lockout_secs),
        );

        Self {
            store,
            config: Arc::new(config),
            throttle: Arc::new(throttle),
        }
    }
}
