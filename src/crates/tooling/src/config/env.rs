//! Environment variable loading utilities

use crate::{Result, ToolingError};
use std::env;
use std::str::FromStr;

/// Load an environment variable as a string
///
/// * `Ok(Some(value))` if the variable exists
/// * `Ok(None)` if it doesn't
/// * `Err` if it exists but is not valid UTF-8
pub fn get_env(key: &str) -> Result<Option<String>> {
    match env::var(key) {
        Ok(val) => Ok(Some(val)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(env::VarError::NotUnicode(_)) => Err(ToolingError::Config(format!(
            "Environment variable {} contains invalid UTF-8",
            key
        ))),
    }
}

/// Like [`get_env`], but treats a blank value as absent.
pub fn get_env_nonempty(key: &str) -> Result<Option<String>> {
    Ok(get_env(key)?.filter(|v| !v.trim().is_empty()))
}

/// Load and parse an environment variable
///
/// ```rust,ignore
/// let port: Option<u16> = get_env_parse("PORT")?;
/// ```
pub fn get_env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match get_env_nonempty(key)? {
        Some(val) => {
            let parsed = val.trim().parse::<T>().map_err(|e| {
                ToolingError::Config(format!(
                    "Failed to parse environment variable {}: {}",
                    key, e
                ))
            })?;
            Ok(Some(parsed))
        }
        None => Ok(None),
    }
}

/// Load a whitespace-separated list, e.g. `MCP_SERVER_ARGS="mcp-server/index.js --quiet"`.
pub fn get_env_list(key: &str) -> Result<Option<Vec<String>>> {
    Ok(get_env_nonempty(key)?
        .map(|val| val.split_whitespace().map(str::to_string).collect()))
}
