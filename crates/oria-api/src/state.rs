use std::sync::Arc;

use oria_storage::Storage;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub storage: Arc<dyn Storage>,
    /// Bearer token for `/api/admin`. `None` keeps the admin routes closed.
    pub admin_token: Option<String>,
}

impl AppStateInner {
    pub fn new(storage: Arc<dyn Storage>, admin_token: Option<String>) -> AppState {
        Arc::new(Self {
            storage,
            admin_token,
        })
    }
}
