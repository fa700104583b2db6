use std::env;
use std::io;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Layer};

use crate::errors::{PlatformError, PlatformResult};

/// Environments that get machine-readable JSON logs.
const JSON_ENVIRONMENTS: [&str; 2] = ["prod", "staging"];

/// Knobs the binaries expose for their diagnostic output.
#[derive(Debug, Clone)]
pub struct LogOptions {
    /// Filter used when `RUST_LOG` is unset.
    pub default_filter: String,
    /// Forces `debug` regardless of `RUST_LOG`.
    pub verbose: bool,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            default_filter: "warn".to_string(),
            verbose: false,
        }
    }
}

impl LogOptions {
    fn filter(&self) -> PlatformResult<EnvFilter> {
        if self.verbose {
            return Ok(EnvFilter::new("debug"));
        }
        match EnvFilter::try_from_default_env() {
            Ok(filter) => Ok(filter),
            Err(_) => EnvFilter::try_new(&self.default_filter).map_err(|e| PlatformError::Filter {
                filter: self.default_filter.clone(),
                reason: e.to_string(),
            }),
        }
    }
}

/// Initialize structured logging on stderr.
///
/// Stdout is left to the tools' own reports, so diagnostics never interleave
/// with output a user might redirect to a file.
pub fn init_logging(service_name: &str, options: &LogOptions) -> PlatformResult<()> {
    let env_filter = options.filter()?;

    // Detect environment (dev, prod, staging)
    let environment = env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string());

    let result = if JSON_ENVIRONMENTS.contains(&environment.as_str()) {
        let json_layer = fmt::layer()
            .json()
            .with_writer(io::stderr)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .with_target(true)
            .with_current_span(true)
            .with_span_list(true)
            .with_file(true)
            .with_line_number(true)
            .with_filter(env_filter);

        tracing_subscriber::registry().with(json_layer).try_init()
    } else {
        // Use a more readable text formatter for development
        fmt()
            .with_env_filter(env_filter)
            .with_writer(io::stderr)
            .with_target(true)
            .with_file(false)
            .with_line_number(false)
            .with_thread_ids(false)
            .with_thread_names(false)
            .finish()
            .try_init()
    };
    result.map_err(|e| PlatformError::Logging(e.to_string()))?;

    tracing::debug!(
        service = %service_name,
        environment = %environment,
        "logging initialized"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_overrides_default_filter() {
        let options = LogOptions {
            default_filter: "error".to_string(),
            verbose: true,
        };
        let filter = options.filter().expect("verbose filter is always valid");
        assert_eq!(filter.to_string(), "debug");
    }

    #[test]
    fn invalid_default_filter_is_reported() {
        std::env::remove_var("RUST_LOG");
        let options = LogOptions {
            default_filter: "upps=loud".to_string(),
            verbose: false,
        };
        assert!(matches!(
            options.filter(),
            Err(PlatformError::Filter { .. })
        ));
    }
}
