// 📝 Logging - tracing subscriber setup
//
// The filter comes from PLACEMENT_LOG and falls back to placement_dashboard=info.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Environment variable holding the log filter directives.
pub const LOG_ENV: &str = "PLACEMENT_LOG";

/// Initialize logging for the dashboard.
///
/// Reads `PLACEMENT_LOG` (e.g. `PLACEMENT_LOG=placement_dashboard=debug`) and
/// falls back to `placement_dashboard=info`. Safe to call more than once.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV)
            .unwrap_or_else(|_| EnvFilter::new("placement_dashboard=info"));

        tracing_subscriber::registry()
            .with(fmt::layer().with_target(false))
            .with(filter)
            .init();
    });
}
