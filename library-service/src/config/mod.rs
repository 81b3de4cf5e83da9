use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

#[derive(Debug, Clone)]
pub struct LibraryConfig {
    pub common: core_config::Config,
    pub mongodb: MongoConfig,
}

#[derive(Debug, Clone)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
    pub collection: String,
}

impl LibraryConfig {
    pub fn load() -> Result<Self, AppError> {
        // Load common config (handles .env and APP__ prefix)
        let mut common = core_config::Config::load()?;

        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        if let Ok(port) = env::var("PORT") {
            common.port = port.parse().map_err(|e| {
                AppError::ConfigError(anyhow::anyhow!("Invalid PORT '{}': {}", port, e))
            })?;
        }

        Ok(LibraryConfig {
            common,
            mongodb: MongoConfig {
                uri: get_env("MONGO_URL", None, is_prod)?,
                database: get_env("MONGO_DATABASE", Some("library"), is_prod)?,
                collection: get_env("MONGO_COLLECTION", Some("library"), is_prod)?,
            },
        })
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) if !val.trim().is_empty() => Ok(val),
        _ => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is not defined in environment variables",
                    key
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_required_variable_is_a_config_error() {
        let err = get_env("LIBRARY_TEST_UNSET_REQUIRED", None, false).unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
        assert!(err.to_string().contains("LIBRARY_TEST_UNSET_REQUIRED"));
    }

    #[test]
    fn default_is_used_outside_production() {
        let value = get_env("LIBRARY_TEST_UNSET_DEFAULTED", Some("library"), false).unwrap();
        assert_eq!(value, "library");
    }

    #[test]
    fn production_requires_explicit_values() {
        let err = get_env("LIBRARY_TEST_UNSET_PROD", Some("library"), true).unwrap_err();
        assert!(err.to_string().contains("required in production"));
    }

    #[test]
    fn blank_values_count_as_unset() {
        env::set_var("LIBRARY_TEST_BLANK", "   ");
        assert!(get_env("LIBRARY_TEST_BLANK", None, false).is_err());
        env::remove_var("LIBRARY_TEST_BLANK");
    }
}
