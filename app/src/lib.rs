//! Railwise application library

use std::path::PathBuf;

use anyhow::Context;
use railwise_api::{start_server, AppState};
use railwise_core::AppConfig;

/// Load the config at `path`, or the built-in defaults without one
pub fn load_config(path: Option<PathBuf>) -> anyhow::Result<AppConfig> {
    match path {
        Some(path) => AppConfig::load(&path)
            .with_context(|| format!("loading config from {}", path.display())),
        None => Ok(AppConfig::default()),
    }
}

/// Run the API server
///
/// Takes an optional path to a JSON config file.
pub async fn run(config_path: Option<PathBuf>) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("railwise=debug".parse()?)
                .add_directive("rails=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .init();

    tracing::info!("Starting Railwise");

    rails::validate_stage_windows().context("stage windows are inconsistent")?;

    let config = load_config(config_path)?;
    tracing::info!(
        port = config.api_port,
        rates_source = %config.rates_source,
        "Loaded configuration"
    );

    let port = config.api_port;
    start_server(AppState::with_config(config), port).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_path() {
        let config = load_config(None).unwrap();
        assert_eq!(config.api_port, 19080);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = load_config(Some(PathBuf::from("/nonexistent/railwise.json"))).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/railwise.json"));
    }
}
