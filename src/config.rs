use std::collections::HashMap;
use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use crate::error::{config_error, Error};

pub const DEFAULT_GOOGLE_MAPS_API_BASE: &str = "https://maps.googleapis.com";
pub const DEFAULT_DISTANCE_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_SESSION_TTL_SECS: u64 = 30 * 60;

const VARS: [&str; 7] = [
    "BOOKING_API_BASE",
    "BOOKING_CSRF_TOKEN",
    "GOOGLE_MAPS_API_BASE",
    "GOOGLE_MAPS_API_KEY",
    "DISTANCE_TIMEOUT_SECS",
    "SESSION_TTL_SECS",
    "LISTEN_ADDR",
];

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub booking_api_base: String,
    pub csrf_token: Option<String>,
    pub google_maps_api_base: String,
    /// Without a key every distance comes from the fallback estimator.
    pub google_maps_api_key: Option<String>,
    pub distance_timeout: Duration,
    /// How long an untouched booking session is kept.
    pub session_ttl: Duration,
    pub listen_addr: SocketAddr,
}

impl Config {
    /// Reads the process environment. Call `dotenv::dotenv()` first to pick up `.env`.
    pub fn from_env() -> Result<Self, Error> {
        let mut vars = HashMap::new();

        for name in VARS {
            if let Some(value) = read_var(name)? {
                vars.insert(name, value);
            }
        }

        Self::from_lookup(|name| vars.get(name).cloned())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let booking_api_base = var("BOOKING_API_BASE")
            .ok_or_else(|| config_error("BOOKING_API_BASE", "is required"))?;

        let secs = |name: &str, default: u64| match var(name) {
            None => Ok(Duration::from_secs(default)),
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
                _ => Err(config_error(
                    name,
                    &format!("expected a positive number of seconds, got {:?}", raw),
                )),
            },
        };

        let distance_timeout = secs("DISTANCE_TIMEOUT_SECS", DEFAULT_DISTANCE_TIMEOUT_SECS)?;
        let session_ttl = secs("SESSION_TTL_SECS", DEFAULT_SESSION_TTL_SECS)?;

        let listen_addr = var("LISTEN_ADDR")
            .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|err| config_error("LISTEN_ADDR", &err.to_string()))?;

        Ok(Self {
            booking_api_base: booking_api_base.trim_end_matches('/').to_string(),
            csrf_token: var("BOOKING_CSRF_TOKEN"),
            google_maps_api_base: var("GOOGLE_MAPS_API_BASE")
                .unwrap_or_else(|| DEFAULT_GOOGLE_MAPS_API_BASE.to_string()),
            google_maps_api_key: var("GOOGLE_MAPS_API_KEY"),
            distance_timeout,
            session_ttl,
            listen_addr,
        })
    }
}

/// Unset is `None`. A value that is not valid unicode is an error.
fn read_var(name: &str) -> Result<Option<String>, Error> {
    match env::var(name) {
        Err(env::VarError::NotPresent) => Ok(None),
        value => Ok(Some(value?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CONFIG_ERROR;

    fn config(vars: &[(&str, &str)]) -> Result<Config, Error> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_only_backend_is_set() {
        let config = config(&[("BOOKING_API_BASE", "https://tours.example.in/")]).unwrap();

        assert_eq!(config.booking_api_base, "https://tours.example.in");
        assert_eq!(config.csrf_token, None);
        assert_eq!(config.google_maps_api_base, DEFAULT_GOOGLE_MAPS_API_BASE);
        assert_eq!(config.google_maps_api_key, None);
        assert_eq!(config.distance_timeout, Duration::from_secs(10));
        assert_eq!(config.session_ttl, Duration::from_secs(1800));
        assert_eq!(config.listen_addr, "127.0.0.1:3000".parse().unwrap());
    }

    #[test]
    fn backend_base_is_required() {
        let err = config(&[("GOOGLE_MAPS_API_KEY", "abc")]).unwrap_err();
        assert_eq!(err.code, CONFIG_ERROR);
        assert!(err.message.contains("BOOKING_API_BASE"));
    }

    #[test]
    fn blank_key_counts_as_absent() {
        let config = config(&[
            ("BOOKING_API_BASE", "http://localhost:8000"),
            ("GOOGLE_MAPS_API_KEY", "  "),
        ])
        .unwrap();

        assert_eq!(config.google_maps_api_key, None);
    }

    #[test]
    fn malformed_values_are_rejected() {
        let timeout = config(&[
            ("BOOKING_API_BASE", "http://localhost:8000"),
            ("DISTANCE_TIMEOUT_SECS", "ten"),
        ])
        .unwrap_err();
        assert_eq!(timeout.code, CONFIG_ERROR);

        let zero = config(&[
            ("BOOKING_API_BASE", "http://localhost:8000"),
            ("DISTANCE_TIMEOUT_SECS", "0"),
        ]);
        assert!(zero.is_err());

        let addr = config(&[
            ("BOOKING_API_BASE", "http://localhost:8000"),
            ("LISTEN_ADDR", "localhost"),
        ])
        .unwrap_err();
        assert_eq!(addr.code, CONFIG_ERROR);

        let ttl = config(&[
            ("BOOKING_API_BASE", "http://localhost:8000"),
            ("SESSION_TTL_SECS", "-5"),
        ])
        .unwrap_err();
        assert!(ttl.message.contains("SESSION_TTL_SECS"));
    }

    #[test]
    fn unset_variable_reads_as_absent() {
        assert_eq!(read_var("TONGA_CONFIG_TEST_UNSET").unwrap(), None);
    }

    #[cfg(unix)]
    #[test]
    fn non_unicode_variable_is_a_config_error() {
        use std::ffi::OsString;
        use std::os::unix::ffi::OsStringExt;

        env::set_var(
            "TONGA_CONFIG_TEST_NOT_UNICODE",
            OsString::from_vec(vec![0x70, 0x75, 0xff]),
        );

        let err = read_var("TONGA_CONFIG_TEST_NOT_UNICODE").unwrap_err();
        assert_eq!(err.code, CONFIG_ERROR);
        assert!(err.message.contains("not valid unicode"));
    }
}
