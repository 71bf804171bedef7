use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LogConfig;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured filter. Calling this again
/// after a subscriber is installed leaves the existing one in place.
pub fn init(config: &LogConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))?;

    if tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_err()
    {
        tracing::debug!("Tracing subscriber already installed");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_is_harmless() {
        let config = LogConfig {
            filter: "hangman_backend=info".to_string(),
        };

        assert!(init(&config).is_ok());
        assert!(init(&config).is_ok());
    }
}
