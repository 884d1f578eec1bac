//! Subscriber installation

use std::sync::Once;
use tracing_subscriber::{util::SubscriberInitExt, EnvFilter};

/// Output style of the process-wide subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable lines on stderr, `roster=debug`
    Development,
    /// JSON lines on stderr, `roster=info`
    Production,
    /// Bare registry; tests install their own capture layer
    Test,
}

static INSTALLED: Once = Once::new();

/// `RUST_LOG` if set, otherwise `default`
fn filter_or(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Install the subscriber for `profile`
///
/// Only the first call in a process has an effect; stdout stays free for
/// command output.
pub fn init(profile: Profile) {
    INSTALLED.call_once(|| match profile {
        Profile::Development => tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(filter_or("roster=debug"))
            .init(),
        Profile::Production => tracing_subscriber::fmt()
            .json()
            .with_writer(std::io::stderr)
            .with_env_filter(filter_or("roster=info"))
            .init(),
        Profile::Test => tracing_subscriber::registry().init(),
    });
}
