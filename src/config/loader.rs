//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{DatabaseTarget, PostgreSQLConfig, RosterConfig};
use super::secret::secret_string;
use crate::domain::errors::RosterError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into RosterConfig
/// 4. Applies environment variable overrides (ROSTERFLOW_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - A referenced environment variable is not set
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use rosterflow::config::loader::load_config;
///
/// let config = load_config("rosterflow.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<RosterConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(RosterError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        RosterError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let config: RosterConfig = toml::from_str(&contents)
        .map_err(|e| RosterError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    finish(config)
}

/// Loads `path` if it exists, otherwise starts from built-in defaults
///
/// Environment overrides and validation apply in both cases.
pub fn load_config_or_default(path: impl AsRef<Path>) -> Result<RosterConfig> {
    let path = path.as_ref();
    if path.exists() {
        load_config(path)
    } else {
        tracing::debug!(path = %path.display(), "No configuration file, using defaults");
        finish(RosterConfig::default())
    }
}

fn finish(mut config: RosterConfig) -> Result<RosterConfig> {
    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        RosterError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| RosterError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(RosterError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Result<Option<T>> {
    match std::env::var(name) {
        Ok(val) => val.trim().parse().map(Some).map_err(|_| {
            RosterError::Configuration(format!("Environment variable {name} has invalid value '{val}'"))
        }),
        Err(_) => Ok(None),
    }
}

/// Applies environment variable overrides using ROSTERFLOW_* prefix
///
/// Environment variables follow the pattern: ROSTERFLOW_<SECTION>_<KEY>
/// For example: ROSTERFLOW_INGESTION_BATCH_SIZE, ROSTERFLOW_STORAGE_ROOT_PATH
fn apply_env_overrides(config: &mut RosterConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("ROSTERFLOW_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Some(dry_run) = parse_env("ROSTERFLOW_APPLICATION_DRY_RUN")? {
        config.application.dry_run = dry_run;
    }

    // Storage overrides
    if let Ok(val) = std::env::var("ROSTERFLOW_STORAGE_ROOT_PATH") {
        config.storage.root_path = val;
    }
    if let Ok(val) = std::env::var("ROSTERFLOW_STORAGE_EXCEL_FOLDER") {
        config.storage.excel_folder = val;
    }
    if let Ok(val) = std::env::var("ROSTERFLOW_STORAGE_CSV_FOLDER") {
        config.storage.csv_folder = val;
    }
    if let Ok(val) = std::env::var("ROSTERFLOW_STORAGE_REPORTS_FOLDER") {
        config.storage.reports_folder = val;
    }

    // Generation overrides
    if let Some(max) = parse_env("ROSTERFLOW_GENERATION_MAX_RECORDS")? {
        config.generation.max_records = max;
    }
    if let Some(threshold) = parse_env("ROSTERFLOW_GENERATION_AUTOFIT_THRESHOLD")? {
        config.generation.autofit_threshold = threshold;
    }
    if let Some(seed) = parse_env("ROSTERFLOW_GENERATION_SEED")? {
        config.generation.seed = Some(seed);
    }

    // Conversion overrides
    if let Some(interval) = parse_env("ROSTERFLOW_CONVERSION_FLUSH_INTERVAL")? {
        config.conversion.flush_interval = interval;
    }

    // Ingestion overrides
    if let Some(size) = parse_env("ROSTERFLOW_INGESTION_BATCH_SIZE")? {
        config.ingestion.batch_size = size;
    }
    if let Some(timeout) = parse_env("ROSTERFLOW_INGESTION_BATCH_TIMEOUT_SECONDS")? {
        config.ingestion.batch_timeout_seconds = timeout;
    }

    // Store overrides
    if let Ok(val) = std::env::var("ROSTERFLOW_DATABASE_TARGET") {
        config.database_target = match val.to_lowercase().as_str() {
            "postgresql" => DatabaseTarget::PostgreSQL,
            "memory" => DatabaseTarget::Memory,
            other => {
                return Err(RosterError::Configuration(format!(
                    "Invalid ROSTERFLOW_DATABASE_TARGET '{other}'. Must be one of: postgresql, memory"
                )))
            }
        };
    }
    if let Ok(val) = std::env::var("ROSTERFLOW_POSTGRESQL_CONNECTION_STRING") {
        match config.postgresql {
            Some(ref mut pg) => pg.connection_string = secret_string(val),
            None => {
                config.postgresql = Some(PostgreSQLConfig::new(secret_string(val)))
            }
        }
    }
    if let Some(ref mut pg) = config.postgresql {
        if let Some(max) = parse_env("ROSTERFLOW_POSTGRESQL_MAX_CONNECTIONS")? {
            pg.max_connections = max;
        }
    }

    // Logging overrides
    if let Some(enabled) = parse_env("ROSTERFLOW_LOGGING_LOCAL_ENABLED")? {
        config.logging.local_enabled = enabled;
    }
    if let Ok(val) = std::env::var("ROSTERFLOW_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::NamedTempFile;

    // Environment variables are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn write_config(content: &str) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(content.as_bytes()).unwrap();
        temp_file.flush().unwrap();
        temp_file
    }

    #[test]
    fn test_substitute_env_vars() {
        let _lock = ENV_MUTEX.lock().unwrap();
        std::env::set_var("ROSTER_TEST_VAR", "test_value");
        let input = "password = \"${ROSTER_TEST_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "password = \"test_value\"\n");
        std::env::remove_var("ROSTER_TEST_VAR");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        let _lock = ENV_MUTEX.lock().unwrap();
        std::env::remove_var("ROSTER_MISSING_VAR");
        let input = "password = \"${ROSTER_MISSING_VAR}\"";
        let err = substitute_env_vars(input).unwrap_err();
        assert!(err.to_string().contains("ROSTER_MISSING_VAR"));
    }

    #[test]
    fn test_substitute_skips_comments() {
        let _lock = ENV_MUTEX.lock().unwrap();
        std::env::remove_var("ROSTER_COMMENTED_VAR");
        let input = "# password = \"${ROSTER_COMMENTED_VAR}\"";
        assert!(substitute_env_vars(input).is_ok());
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent.toml");
        assert!(matches!(result, Err(RosterError::Configuration(_))));
    }

    #[test]
    fn test_load_config_valid() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let temp_file = write_config(
            r#"
database_target = "memory"

[application]
log_level = "debug"

[storage]
root_path = "/tmp/rosterflow"

[ingestion]
batch_size = 250
"#,
        );

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.application.log_level, "debug");
        assert_eq!(config.storage.root_path, "/tmp/rosterflow");
        assert_eq!(config.storage.csv_folder, "csv");
        assert_eq!(config.ingestion.batch_size, 250);
    }

    #[test]
    fn test_load_config_invalid_values() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let temp_file = write_config("[ingestion]\nbatch_size = 0\n");
        let err = load_config(temp_file.path()).unwrap_err();
        assert!(err.to_string().contains("batch_size"));
    }

    #[test]
    fn test_env_overrides() {
        let _lock = ENV_MUTEX.lock().unwrap();
        std::env::set_var("ROSTERFLOW_INGESTION_BATCH_SIZE", "42");
        std::env::set_var("ROSTERFLOW_APPLICATION_DRY_RUN", "true");

        let config = load_config_or_default("does-not-exist.toml");

        std::env::remove_var("ROSTERFLOW_INGESTION_BATCH_SIZE");
        std::env::remove_var("ROSTERFLOW_APPLICATION_DRY_RUN");

        let config = config.unwrap();
        assert_eq!(config.ingestion.batch_size, 42);
        assert!(config.application.dry_run);
    }

    #[test]
    fn test_env_override_invalid_number() {
        let _lock = ENV_MUTEX.lock().unwrap();
        std::env::set_var("ROSTERFLOW_INGESTION_BATCH_SIZE", "lots");
        let result = load_config_or_default("does-not-exist.toml");
        std::env::remove_var("ROSTERFLOW_INGESTION_BATCH_SIZE");

        assert!(result.is_err());
    }

    #[test]
    fn test_postgresql_connection_string_from_env() {
        let _lock = ENV_MUTEX.lock().unwrap();
        std::env::set_var("ROSTERFLOW_DATABASE_TARGET", "postgresql");
        std::env::set_var(
            "ROSTERFLOW_POSTGRESQL_CONNECTION_STRING",
            "postgresql://u:p@localhost/school",
        );

        let config = load_config_or_default("does-not-exist.toml");

        std::env::remove_var("ROSTERFLOW_DATABASE_TARGET");
        std::env::remove_var("ROSTERFLOW_POSTGRESQL_CONNECTION_STRING");

        let config = config.unwrap();
        assert_eq!(config.database_target, DatabaseTarget::PostgreSQL);
        let pg = config.postgresql.unwrap();
        assert_eq!(
            pg.connection_string.expose_secret().as_ref(),
            "postgresql://u:p@localhost/school"
        );
    }
}
