use tracing::{debug, warn};

use crate::api::MovieApi;

/// Best-effort liveness gate. Never fails; any error means "unhealthy".
pub async fn check_health(api: &dyn MovieApi) -> bool {
    match api.health().await {
        Ok(()) => {
            debug!("Health check passed");
            true
        }
        Err(e) => {
            warn!("Health check failed: {}", e);
            false
        }
    }
}
