//! Log setup for the `pr-review` binary.
//!
//! Logs always go to stderr: stdout carries the report paths, the summary and
//! the optional `--json` dump, and must stay parseable.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

/// HTTP stack targets that are noisy at debug level.
const QUIET_TARGETS: [&str; 3] = ["hyper", "reqwest", "h2"];

/// Filter directives used when `RUST_LOG` is unset: `level` for our own
/// events, warnings only from the HTTP client underneath the backend.
pub fn default_directives(level: Level) -> String {
    let mut directives = level.as_str().to_ascii_lowercase();
    for target in QUIET_TARGETS {
        directives.push_str(&format!(",{target}=warn"));
    }
    directives
}

fn env_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(level)))
}

/// Install the global subscriber. `json` switches to one JSON object per
/// line. A second call is a no-op.
pub fn init_tracing(json: bool, level: Level) {
    let filter = env_filter(level);
    let base = fmt::layer().with_target(false).with_writer(std::io::stderr);
    let layer: Box<dyn Layer<Registry> + Send + Sync> = if json {
        base.json().with_filter(filter).boxed()
    } else {
        base.with_filter(filter).boxed()
    };
    tracing_subscriber::registry().with(layer).try_init().ok();
}
