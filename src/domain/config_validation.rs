//! Configuration validation.
//!
//! Validates every recognised config key before a command touches storage.

use crate::domain::error::LedgerError;
use crate::ports::config_port::ConfigPort;

pub const BACKENDS: [&str; 2] = ["csv", "sqlite"];
pub const LOG_FORMATS: [&str; 2] = ["text", "json"];

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), LedgerError> {
    validate_backend(config)?;
    validate_pool_size(config)?;
    validate_log_format(config)?;
    validate_default_size(config)?;
    validate_paths(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> LedgerError {
    LedgerError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn validate_backend(config: &dyn ConfigPort) -> Result<(), LedgerError> {
    let backend = config.get_string_or("ledger", "backend", "csv").to_lowercase();
    if !BACKENDS.contains(&backend.as_str()) {
        return Err(invalid(
            "ledger",
            "backend",
            format!("unknown backend '{backend}' (expected csv or sqlite)"),
        ));
    }
    if backend == "sqlite" && !cfg!(feature = "sqlite") {
        return Err(invalid(
            "ledger",
            "backend",
            "sqlite backend requires the sqlite feature",
        ));
    }
    Ok(())
}

fn validate_pool_size(config: &dyn ConfigPort) -> Result<(), LedgerError> {
    let value = config.get_int("sqlite", "pool_size", 4);
    if value < 1 || value > i64::from(u32::MAX) {
        return Err(invalid(
            "sqlite",
            "pool_size",
            format!("pool_size must be between 1 and {}", u32::MAX),
        ));
    }
    Ok(())
}

fn validate_log_format(config: &dyn ConfigPort) -> Result<(), LedgerError> {
    let format = config.get_string_or("logging", "format", "text").to_lowercase();
    if !LOG_FORMATS.contains(&format.as_str()) {
        return Err(invalid(
            "logging",
            "format",
            format!("unknown log format '{format}' (expected text or json)"),
        ));
    }
    Ok(())
}

fn validate_default_size(config: &dyn ConfigPort) -> Result<(), LedgerError> {
    let size = config.get_double("watchlist", "default_size", 0.0);
    if !size.is_finite() || size < 0.0 {
        return Err(invalid(
            "watchlist",
            "default_size",
            format!("{size} is not a non-negative amount"),
        ));
    }
    Ok(())
}

fn validate_paths(config: &dyn ConfigPort) -> Result<(), LedgerError> {
    for (section, key) in [
        ("ledger", "path"),
        ("sqlite", "path"),
        ("watchlist", "path"),
        ("report", "output"),
    ] {
        if let Some(path) = config.get_string(section, key) {
            if path.ends_with('/') || path.ends_with('\\') {
                return Err(invalid(section, key, "path must name a file, not a directory"));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    fn config(ini: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(ini).unwrap()
    }

    #[test]
    fn empty_config_is_valid() {
        assert!(validate_config(&FileConfigAdapter::empty()).is_ok());
    }

    #[test]
    fn unknown_backend_rejected() {
        let err = validate_config(&config("[ledger]\nbackend = excel\n")).unwrap_err();
        assert!(matches!(err, LedgerError::ConfigInvalid { key, .. } if key == "backend"));
    }

    #[test]
    fn backend_is_case_insensitive() {
        assert!(validate_config(&config("[ledger]\nbackend = CSV\n")).is_ok());
    }

    #[test]
    fn zero_pool_size_rejected() {
        let err = validate_config(&config("[sqlite]\npool_size = 0\n")).unwrap_err();
        assert!(matches!(err, LedgerError::ConfigInvalid { key, .. } if key == "pool_size"));
    }

    #[test]
    fn oversized_pool_size_rejected() {
        let err = validate_config(&config("[sqlite]\npool_size = 5000000000\n")).unwrap_err();
        assert!(matches!(err, LedgerError::ConfigInvalid { key, .. } if key == "pool_size"));
        assert!(validate_config(&config("[sqlite]\npool_size = 16\n")).is_ok());
    }

    #[test]
    fn default_size_must_be_non_negative() {
        for value in ["-1", "inf"] {
            let ini = format!("[watchlist]\ndefault_size = {value}\n");
            let err = validate_config(&config(&ini)).unwrap_err();
            assert!(matches!(err, LedgerError::ConfigInvalid { key, .. } if key == "default_size"));
        }
        assert!(validate_config(&config("[watchlist]\ndefault_size = 250.5\n")).is_ok());
    }

    #[test]
    fn unknown_log_format_rejected() {
        let err = validate_config(&config("[logging]\nformat = xml\n")).unwrap_err();
        assert!(matches!(err, LedgerError::ConfigInvalid { section, .. } if section == "logging"));
    }

    #[test]
    fn directory_path_rejected() {
        let err = validate_config(&config("[ledger]\npath = data/\n")).unwrap_err();
        assert!(matches!(err, LedgerError::ConfigInvalid { key, .. } if key == "path"));
    }
}
