//! Log subscriber setup for hosts embedding the application layer.

use tracing_subscriber::EnvFilter;

pub const DEFAULT_FILTER: &str = "info,amigo_core=debug,amigo_application=debug";

/// Installs a formatted subscriber. `RUST_LOG` wins over `default_filter`,
/// which in turn falls back to [`DEFAULT_FILTER`].
///
/// Returns false when a global subscriber is already set, which is not an
/// error for hosts that configure their own.
pub fn init_tracing(default_filter: Option<&str>) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter.unwrap_or(DEFAULT_FILTER)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_harmless() {
        init_tracing(Some("warn"));
        assert!(!init_tracing(None));
    }
}
