//! Render surface readiness.

use easel_core::RenderSurface;
use tracing::{debug, warn};

use crate::settings::SurfaceSettings;

/// Poll `surface` until it reports ready, at most `ready_retries` times.
///
/// Returns `false` when the surface never became ready. Callers carry on
/// either way; the miss is only logged.
pub async fn wait_until_ready(surface: &dyn RenderSurface, settings: &SurfaceSettings) -> bool {
    let attempts = settings.ready_retries.max(1);
    for attempt in 1..=attempts {
        if surface.is_ready() {
            if attempt > 1 {
                debug!(attempt, "Render surface ready");
            }
            return true;
        }
        if attempt < attempts {
            tokio::time::sleep(settings.ready_interval).await;
        }
    }

    warn!(
        attempts,
        interval_ms = u64::try_from(settings.ready_interval.as_millis()).unwrap_or(u64::MAX),
        "Render surface not ready, continuing anyway"
    );
    false
}
