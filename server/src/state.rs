use std::sync::Arc;

use mathboard_shared::ClientConfig;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ClientConfig>,
}

impl AppState {
    pub fn new(api_url: String) -> Self {
        Self {
            config: Arc::new(ClientConfig { api_url }),
        }
    }
}
