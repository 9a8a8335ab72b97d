use crate::Environment;
use tracing::{debug, info};
use tracing_subscriber::{prelude::*, EnvFilter};

/// Default filter for production deployments when `RUST_LOG` is unset
const PRODUCTION_FILTER: &str = "info,tower_http=info,mongodb=warn";

/// Default filter for local development when `RUST_LOG` is unset
const DEVELOPMENT_FILTER: &str = "debug,mongodb=info,hyper=info";

/// Install color-eyre with the workspace defaults.
///
/// Call this first in `main()` so startup errors are rendered with location
/// sections. Calling it twice is harmless.
pub fn install_color_eyre() {
    let _ = color_eyre::config::HookBuilder::default()
        .display_location_section(true)
        .display_env_section(false)
        .install();
}

/// Resolve the log filter: `RUST_LOG` wins, otherwise an environment default.
pub fn env_filter(environment: &Environment) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if environment.is_production() {
            EnvFilter::new(PRODUCTION_FILTER)
        } else {
            EnvFilter::new(DEVELOPMENT_FILTER)
        }
    })
}

/// Initialize the global tracing subscriber.
///
/// - **Production** (`APP_ENV=production`): flattened JSON lines without
///   module targets, for log aggregation.
/// - **Development**: pretty multi-line output.
///
/// Both install `tracing_error::ErrorLayer` so `color-eyre` reports carry span
/// traces from `#[instrument]`ed repository and service calls.
///
/// Safe to call more than once; later calls are ignored (tests do this).
pub fn init_tracing(environment: &Environment) {
    let filter = env_filter(environment);

    let result = if environment.is_production() {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .flatten_event(true),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_file(false)
                    .with_line_number(false)
                    .pretty(),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init()
    };

    match result {
        Ok(_) => info!(?environment, "Tracing initialized"),
        Err(_) => debug!("Tracing already initialized, skipping re-initialization"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_development() {
        init_tracing(&Environment::Development);
    }

    #[test]
    fn test_init_tracing_production() {
        init_tracing(&Environment::Production);
    }

    #[test]
    fn test_init_tracing_multiple_calls() {
        let env = Environment::Development;
        init_tracing(&env);
        init_tracing(&env);
    }

    #[test]
    fn test_env_filter_prefers_rust_log() {
        temp_env::with_var("RUST_LOG", Some("warn"), || {
            let filter = env_filter(&Environment::Production);
            assert!(filter.to_string().contains("warn"));
        });
    }

    #[test]
    fn test_env_filter_defaults_per_environment() {
        temp_env::with_var_unset("RUST_LOG", || {
            let production = env_filter(&Environment::Production).to_string();
            assert!(production.contains("mongodb=warn"));

            let development = env_filter(&Environment::Development).to_string();
            assert!(development.contains("mongodb=info"));
        });
    }
}
