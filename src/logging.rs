//! Structured logging via `tracing`. The core itself never initializes a
//! subscriber implicitly — [`init_tracing`] is opt-in, called once by a
//! binary or test harness that wants formatted output.

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Installs a compact `tracing-subscriber` formatter as the global default.
/// Idempotent: later calls are no-ops.
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        use tracing_subscriber::fmt::format::FmtSpan;
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE)
                    .with_target(false)
                    .with_level(true)
                    .compact(),
            )
            .init();
    });
}
