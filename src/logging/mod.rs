// Logging
// Tracing subscriber setup and the per-turn JSONL log
//
// Diagnostics go through `tracing` to stderr. The turn log is a separate,
// opt-in record of every completed turn for later review.

pub mod turn_logger;

pub use turn_logger::{TurnLogEntry, TurnLogger, TurnSource};

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "homerun_coach=info,homerun=info";
const VERBOSE_FILTER: &str = "homerun_coach=debug,homerun=debug";

/// Install the global subscriber. `RUST_LOG` overrides the default filter.
pub fn init_tracing(verbose: bool) {
    let default = if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // A subscriber may already be installed (tests, embedding callers)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filters_cover_library_and_binary() {
        for filter in [DEFAULT_FILTER, VERBOSE_FILTER] {
            assert!(filter.contains("homerun_coach="));
            assert!(filter.split(',').any(|d| d.starts_with("homerun=")));
            assert!(EnvFilter::try_new(filter).is_ok());
        }
    }
}
