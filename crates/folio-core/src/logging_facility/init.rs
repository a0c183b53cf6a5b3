//! Process-wide subscriber installation

use std::sync::Once;
use tracing_subscriber::{util::SubscriberInitExt, EnvFilter};

/// Which subscriber [`init`] installs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Profile {
    /// Pretty text at debug level
    #[default]
    Development,
    /// One JSON object per event at info level
    Production,
    /// Bare registry; tests attach a capture layer themselves
    Test,
}

static INIT_ONCE: Once = Once::new();

/// `RUST_LOG` when set and valid, otherwise `fallback`
fn filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Install the global subscriber for `profile`
///
/// Only the first call has any effect. Events are written to stderr so
/// stdout stays free for command results.
///
/// ```
/// use folio_core::logging_facility::{init, Profile};
///
/// init(Profile::Development);
/// ```
pub fn init(profile: Profile) {
    INIT_ONCE.call_once(|| match profile {
        Profile::Development => tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(filter("folio=debug"))
            .init(),
        Profile::Production => tracing_subscriber::fmt()
            .json()
            .with_writer(std::io::stderr)
            .with_env_filter(filter("folio=info"))
            .init(),
        Profile::Test => tracing_subscriber::registry().init(),
    });
}

impl std::str::FromStr for Profile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "development" | "dev" => Ok(Profile::Development),
            "production" | "prod" => Ok(Profile::Production),
            "test" => Ok(Profile::Test),
            other => Err(format!("unknown log profile '{}'", other)),
        }
    }
}
