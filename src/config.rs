use std::env;
use anyhow::{bail, Context, Result};

pub const DEFAULT_PORT: u16 = 3001;

/// Which [`ContactStore`](crate::store::ContactStore) backs the service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    Spanner(SpannerConfig),
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpannerConfig {
    pub emulator_host: Option<String>,
    pub project: String,
    pub instance: String,
    pub database: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub storage: StorageConfig,
    pub service_port: u16,
    pub service_host: String,
    pub static_dir: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let backend = env::var("STORAGE_BACKEND").unwrap_or_else(|_| "spanner".to_string());

        let storage = match backend.as_str() {
            "spanner" => StorageConfig::Spanner(SpannerConfig::from_env()?),
            "memory" => StorageConfig::Memory,
            other => bail!("STORAGE_BACKEND must be 'spanner' or 'memory', got '{}'", other),
        };

        let service_port = parse_port(env::var("PORT").ok().as_deref());

        let service_host = env::var("SERVICE_HOST")
            .unwrap_or_else(|_| "0.0.0.0".to_string());

        let static_dir = env::var("STATIC_DIR")
            .unwrap_or_else(|_| "build".to_string());

        Ok(Config {
            storage,
            service_port,
            service_host,
            static_dir,
        })
    }

    pub fn log_startup(&self) {
        tracing::info!("Configuration loaded:");
        match &self.storage {
            StorageConfig::Spanner(spanner) => {
                tracing::info!("  Storage: Spanner");
                tracing::info!("  Spanner emulator: {}",
                    spanner.emulator_host.as_deref().unwrap_or("disabled (using production)"));
                tracing::info!("  Spanner project: {}", spanner.project);
                tracing::info!("  Spanner instance: {}", spanner.instance);
                tracing::info!("  Spanner database: {}", spanner.database);
            }
            StorageConfig::Memory => {
                tracing::info!("  Storage: in-memory (contacts are lost on restart)");
            }
        }
        tracing::info!("  Static files: {}", self.static_dir);
        tracing::info!("  Service listening on: {}:{}", self.service_host, self.service_port);
    }
}

impl SpannerConfig {
    fn from_env() -> Result<Self> {
        let emulator_host = env::var("SPANNER_EMULATOR_HOST").ok();

        let project = env::var("SPANNER_PROJECT")
            .context("SPANNER_PROJECT environment variable is required")?;

        let instance = env::var("SPANNER_INSTANCE")
            .context("SPANNER_INSTANCE environment variable is required")?;

        let database = env::var("SPANNER_DATABASE")
            .context("SPANNER_DATABASE environment variable is required")?;

        Ok(SpannerConfig {
            emulator_host,
            project,
            instance,
            database,
        })
    }

    /// Fully qualified database path used by the data client
    pub fn database_path(&self) -> String {
        format!(
            "projects/{}/instances/{}/databases/{}",
            self.project, self.instance, self.database
        )
    }
}

/// Resolve the listening port, falling back to [`DEFAULT_PORT`]
fn parse_port(raw: Option<&str>) -> u16 {
    match raw {
        None => DEFAULT_PORT,
        Some(value) => match value.trim().parse::<u16>() {
            Ok(port) if port != 0 => port,
            _ => {
                tracing::warn!(
                    "PORT '{}' is not a valid port number, using {}",
                    value,
                    DEFAULT_PORT
                );
                DEFAULT_PORT
            }
        },
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, MutexGuard};

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    /// Serialise tests that touch process environment variables
    pub(crate) fn lock_env() -> MutexGuard<'static, ()> {
        ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn clear_env_vars() {
        unsafe {
            env::remove_var("STORAGE_BACKEND");
            env::remove_var("SPANNER_EMULATOR_HOST");
            env::remove_var("SPANNER_PROJECT");
            env::remove_var("SPANNER_INSTANCE");
            env::remove_var("SPANNER_DATABASE");
            env::remove_var("PORT");
            env::remove_var("SERVICE_HOST");
            env::remove_var("STATIC_DIR");
        }
    }

    fn set_required_vars() {
        unsafe {
            env::set_var("SPANNER_PROJECT", "test-project");
            env::set_var("SPANNER_INSTANCE", "test-instance");
            env::set_var("SPANNER_DATABASE", "test-database");
        }
    }

    #[test]
    fn test_config_with_all_vars() {
        let _guard = lock_env();
        clear_env_vars();
        set_required_vars();
        unsafe {
            env::set_var("SPANNER_EMULATOR_HOST", "localhost:9010");
            env::set_var("PORT", "8080");
            env::set_var("SERVICE_HOST", "127.0.0.1");
            env::set_var("STATIC_DIR", "dist");
        }

        let config = Config::from_env().unwrap();

        assert_eq!(
            config.storage,
            StorageConfig::Spanner(SpannerConfig {
                emulator_host: Some("localhost:9010".to_string()),
                project: "test-project".to_string(),
                instance: "test-instance".to_string(),
                database: "test-database".to_string(),
            })
        );
        assert_eq!(config.service_port, 8080);
        assert_eq!(config.service_host, "127.0.0.1");
        assert_eq!(config.static_dir, "dist");
        clear_env_vars();
    }

    #[test]
    fn test_config_with_defaults() {
        let _guard = lock_env();
        clear_env_vars();
        set_required_vars();

        let config = Config::from_env().unwrap();

        match &config.storage {
            StorageConfig::Spanner(spanner) => assert_eq!(spanner.emulator_host, None),
            other => panic!("expected spanner storage, got {:?}", other),
        }
        assert_eq!(config.service_port, 3001);
        assert_eq!(config.service_host, "0.0.0.0");
        assert_eq!(config.static_dir, "build");
        clear_env_vars();
    }

    #[test]
    fn test_memory_backend_needs_no_spanner_vars() {
        let _guard = lock_env();
        clear_env_vars();
        unsafe {
            env::set_var("STORAGE_BACKEND", "memory");
        }

        let config = Config::from_env().unwrap();
        assert_eq!(config.storage, StorageConfig::Memory);
        clear_env_vars();
    }

    #[test]
    fn test_unknown_backend() {
        let _guard = lock_env();
        clear_env_vars();
        unsafe {
            env::set_var("STORAGE_BACKEND", "postgres");
        }

        let error = Config::from_env().unwrap_err();
        assert!(error.to_string().contains("STORAGE_BACKEND"));
        clear_env_vars();
    }

    #[test]
    fn test_missing_required_var() {
        let _guard = lock_env();
        clear_env_vars();
        unsafe {
            env::set_var("SPANNER_PROJECT", "test-project");
            env::set_var("SPANNER_INSTANCE", "test-instance");
        }
        // Missing SPANNER_DATABASE

        let result = Config::from_env();
        assert!(result.is_err());
        let error = result.unwrap_err();
        assert!(format!("{:#}", error).contains("SPANNER_DATABASE"));
        clear_env_vars();
    }

    #[test]
    fn test_invalid_port_falls_back_to_default() {
        let _guard = lock_env();
        clear_env_vars();
        set_required_vars();
        unsafe {
            env::set_var("PORT", "not-a-number");
        }

        let config = Config::from_env().unwrap();
        assert_eq!(config.service_port, DEFAULT_PORT);
        clear_env_vars();
    }

    #[test]
    fn test_parse_port() {
        assert_eq!(parse_port(None), 3001);
        assert_eq!(parse_port(Some("4000")), 4000);
        assert_eq!(parse_port(Some("99999")), 3001);
        assert_eq!(parse_port(Some("0")), 3001);
        assert_eq!(parse_port(Some("")), 3001);
    }

    #[test]
    fn test_database_path() {
        let spanner = SpannerConfig {
            emulator_host: None,
            project: "p".to_string(),
            instance: "i".to_string(),
            database: "d".to_string(),
        };
        assert_eq!(spanner.database_path(), "projects/p/instances/i/databases/d");
    }
}
