use std::sync::Arc;

use tracing::{error, info, warn};

use crate::config::AppConfig;
use crate::storage::supabase::{SupabaseClient, SupabaseTodoRepository};

/// Everything built once at start-up. The backend handle is optional so a
/// misconfigured process still serves the liveness route.
pub struct AppContext {
    pub config: AppConfig,
    backend: Option<Arc<SupabaseClient>>,
}

impl AppContext {
    pub fn new(config: AppConfig) -> Self {
        let backend = match &config.backend {
            None => {
                warn!("SUPABASE_URL or SUPABASE_KEY not set, todo routes will fail with 500");
                None
            }
            Some(backend) => {
                match SupabaseClient::new(&backend.url, backend.key.as_str(), config.backend_timeout) {
                    Ok(client) => {
                        info!(url = %backend.url, "Backend client initialized");
                        Some(Arc::new(client))
                    }
                    Err(e) => {
                        error!(error = %e, "Failed to initialize backend client");
                        None
                    }
                }
            }
        };
        Self { config, backend }
    }

    pub fn has_backend(&self) -> bool {
        self.backend.is_some()
    }

    pub fn todo_repository(&self) -> SupabaseTodoRepository {
        SupabaseTodoRepository::new(self.backend.clone())
    }
}
