//! Tracing setup for the `tempviz` binary.
//!
//! The library only emits `tracing` events; installing a subscriber is left
//! to the entry point.

/// Default filter when `RUST_LOG` is unset.
pub fn default_filter() -> &'static str {
    if cfg!(feature = "dev") {
        "tempviz=debug,info"
    } else {
        "info"
    }
}

/// Install a compact `fmt` subscriber filtered by `RUST_LOG`.
///
/// Returns `false` if a global subscriber was already set.
pub fn init_tracing() -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter())),
        )
        .with_target(false)
        .compact()
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_refused() {
        init_tracing();
        assert!(!init_tracing());
    }

    #[test]
    fn test_default_filter_parses() {
        assert!(tracing_subscriber::EnvFilter::try_new(default_filter()).is_ok());
    }
}
