//! Application configuration loaded from environment variables.
//!
//! - `TOKENCHART_API_URL`: base URL of the token price API
//! - `TOKENCHART_CONTRACT`: contract address of the charted token
//! - `TOKENCHART_REFRESH_SECS`: refresh cadence in seconds
//! - `TOKENCHART_CA_CERT`: optional PEM file pinning the API's CA
//! - `TOKENCHART_LOG_FILE`: where tracing output is written

use std::path::PathBuf;
use std::time::Duration;

/// Default API endpoint.
const DEFAULT_API_URL: &str = "http://localhost:3000";

/// Token charted when no contract is configured.
const DEFAULT_CONTRACT: &str = "0xCf52025D37f68dEdA9ef8307Ba4474eCbf15C33c";

/// Default refresh cadence.
const DEFAULT_REFRESH_SECS: u64 = 10;

/// Log file name used under the system temp directory.
const DEFAULT_LOG_FILE: &str = "tokenchart.log";

/// Top-level application configuration.
#[derive(Debug)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub refresh_interval: Duration,
    pub log_file: PathBuf,
}

/// Price API configuration values.
#[derive(Debug)]
pub struct ApiConfig {
    pub base_url: String,
    pub contract: String,
    pub ca_cert: Option<PathBuf>,
}

/// Loads the application configuration from environment variables.
///
/// Every variable is optional; empty values are treated as absent.
///
/// # Errors
///
/// Returns [`TokenChartError::Config`](crate::TokenChartError::Config) if
/// `TOKENCHART_REFRESH_SECS` is not a positive integer.
pub fn fetch_config() -> crate::Result<AppConfig> {
    let base_url = non_empty_var("TOKENCHART_API_URL")
        .unwrap_or_else(|| DEFAULT_API_URL.to_string())
        .trim_end_matches('/')
        .to_string();
    let contract =
        non_empty_var("TOKENCHART_CONTRACT").unwrap_or_else(|| DEFAULT_CONTRACT.to_string());

    let refresh_secs = match non_empty_var("TOKENCHART_REFRESH_SECS") {
        Some(raw) => match raw.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => secs,
            _ => {
                return Err(crate::TokenChartError::Config(format!(
                    "TOKENCHART_REFRESH_SECS must be a positive integer, got {raw:?}"
                )));
            }
        },
        None => DEFAULT_REFRESH_SECS,
    };

    let log_file = non_empty_var("TOKENCHART_LOG_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_LOG_FILE));

    Ok(AppConfig {
        api: ApiConfig {
            base_url,
            contract,
            ca_cert: non_empty_var("TOKENCHART_CA_CERT").map(PathBuf::from),
        },
        refresh_interval: Duration::from_secs(refresh_secs),
        log_file,
    })
}

/// Returns the value of an environment variable if it exists and is non-empty.
fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    /// Serialises tests that touch the process environment.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    /// Helper that temporarily sets env vars, runs `f`, then restores originals.
    fn with_env<F: FnOnce()>(vars: &[(&str, Option<&str>)], f: F) {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());

        let originals: Vec<(&str, Option<String>)> = vars
            .iter()
            .map(|(k, _)| (*k, std::env::var(k).ok()))
            .collect();

        for (k, v) in vars {
            // SAFETY: every env-mutating test holds ENV_LOCK.
            unsafe {
                match v {
                    Some(val) => std::env::set_var(k, val),
                    None => std::env::remove_var(k),
                }
            }
        }

        f();

        for (k, original) in originals {
            // SAFETY: restoring original values under the same lock.
            unsafe {
                match original {
                    Some(val) => std::env::set_var(k, val),
                    None => std::env::remove_var(k),
                }
            }
        }
    }

    const ALL_VARS: [&str; 5] = [
        "TOKENCHART_API_URL",
        "TOKENCHART_CONTRACT",
        "TOKENCHART_REFRESH_SECS",
        "TOKENCHART_CA_CERT",
        "TOKENCHART_LOG_FILE",
    ];

    fn cleared() -> Vec<(&'static str, Option<&'static str>)> {
        ALL_VARS.iter().map(|k| (*k, None)).collect()
    }

    #[test]
    fn defaults_without_env_vars() {
        with_env(&cleared(), || {
            let config = fetch_config().unwrap();
            assert_eq!(config.api.base_url, DEFAULT_API_URL);
            assert_eq!(config.api.contract, DEFAULT_CONTRACT);
            assert!(config.api.ca_cert.is_none());
            assert_eq!(config.refresh_interval, Duration::from_secs(10));
            assert!(config.log_file.ends_with(DEFAULT_LOG_FILE));
        });
    }

    #[test]
    fn overrides_from_env() {
        let mut vars = cleared();
        vars.extend([
            ("TOKENCHART_API_URL", Some("https://api.example.com/")),
            ("TOKENCHART_CONTRACT", Some("0xabc")),
            ("TOKENCHART_REFRESH_SECS", Some("30")),
            ("TOKENCHART_CA_CERT", Some("/etc/ca.pem")),
        ]);
        with_env(&vars, || {
            let config = fetch_config().unwrap();
            assert_eq!(config.api.base_url, "https://api.example.com");
            assert_eq!(config.api.contract, "0xabc");
            assert_eq!(config.refresh_interval, Duration::from_secs(30));
            assert_eq!(config.api.ca_cert, Some(PathBuf::from("/etc/ca.pem")));
        });
    }

    #[test]
    fn rejects_zero_refresh_interval() {
        let mut vars = cleared();
        vars.push(("TOKENCHART_REFRESH_SECS", Some("0")));
        with_env(&vars, || {
            let err = fetch_config().unwrap_err();
            assert!(err.to_string().contains("TOKENCHART_REFRESH_SECS"));
        });
    }

    #[test]
    fn rejects_non_numeric_refresh_interval() {
        let mut vars = cleared();
        vars.push(("TOKENCHART_REFRESH_SECS", Some("soon")));
        with_env(&vars, || {
            assert!(fetch_config().is_err());
        });
    }

    #[test]
    fn empty_values_treated_as_absent() {
        let vars: Vec<_> = ALL_VARS.iter().map(|k| (*k, Some(""))).collect();
        with_env(&vars, || {
            let config = fetch_config().unwrap();
            assert_eq!(config.api.base_url, DEFAULT_API_URL);
            assert_eq!(config.refresh_interval, Duration::from_secs(10));
            assert!(config.api.ca_cert.is_none());
        });
    }
}
