//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::{Environment, RouterConfig};
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable that overrides `tenancy.environment`.
pub const ENVIRONMENT_VAR: &str = "TENANT_ROUTER_ENV";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
///
/// The [`ENVIRONMENT_VAR`] override is applied before validation.
pub fn load_config(path: &Path) -> Result<RouterConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let mut config: RouterConfig = toml::from_str(&content)?;
    apply_environment(&mut config, std::env::var(ENVIRONMENT_VAR).ok().as_deref());

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Parse and validate a TOML document without touching the environment.
pub fn parse_config(content: &str) -> Result<RouterConfig, ConfigError> {
    let config: RouterConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load from `path` when given, otherwise start from defaults.
pub fn load_or_default(path: Option<&Path>) -> Result<RouterConfig, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => {
            let mut config = RouterConfig::default();
            apply_environment(&mut config, std::env::var(ENVIRONMENT_VAR).ok().as_deref());
            Ok(config)
        }
    }
}

/// Apply an environment flag value, if present.
pub fn apply_environment(config: &mut RouterConfig, flag: Option<&str>) {
    if let Some(flag) = flag {
        config.tenancy.environment = Environment::from_flag(flag);
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn temp_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_config_from_file() {
        let file = temp_file(
            r#"
            [listener]
            bind_address = "127.0.0.1:9000"
            "#,
        );
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:9000");
    }

    #[test]
    fn test_load_config_rejects_invalid_file() {
        let file = temp_file("[upstream]\nurl = \"not a url\"\n");
        let err = load_config(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_parse_error() {
        let err = parse_config("listener = 5").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_validation_error_message() {
        let err = parse_config("[timeouts]\nconnect_secs = 0\nrequest_secs = 0\n").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation failed: timeouts.connect_secs must be greater than zero, \
             timeouts.request_secs must be greater than zero"
        );
    }

    #[test]
    fn test_apply_environment() {
        let mut config = RouterConfig::default();
        apply_environment(&mut config, None);
        assert_eq!(config.tenancy.environment, Environment::Development);

        apply_environment(&mut config, Some("production"));
        assert_eq!(config.tenancy.environment, Environment::Production);

        apply_environment(&mut config, Some("development"));
        assert_eq!(config.tenancy.environment, Environment::Development);
    }
}
