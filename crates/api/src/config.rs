use std::path::PathBuf;
use std::str::FromStr;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for running on the device itself.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `5000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Directory holding uploaded images (default: `uploads`).
    pub upload_dir: PathBuf,
    /// Directory holding the JSON side-files (default: `.`).
    pub data_dir: PathBuf,
    /// Upper bound on stored images (default: `100`).
    pub max_images: usize,
    /// Largest accepted upload request body in bytes (default: 32 MiB).
    pub max_upload_bytes: usize,
    /// Renderer executable, looked up on `PATH` when not absolute.
    pub renderer_bin: PathBuf,
    /// Grace period between SIGTERM and kill when stopping the renderer.
    pub renderer_stop_timeout_secs: u64,
    /// Idle seconds before an SSE `ping` is sent.
    pub sse_keepalive_secs: u64,
    /// Interval of the renderer liveness poll.
    pub state_poll_secs: u64,
}

/// A configuration variable that is set but cannot be parsed.
#[derive(Debug, thiserror::Error)]
#[error("{key} has invalid value '{value}'")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
}

fn var_or(key: &'static str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_var<T: FromStr>(key: &'static str, default: &str) -> Result<T, ConfigError> {
    let value = var_or(key, default);
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError { key, value })
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default                 |
    /// |------------------------------|-------------------------|
    /// | `HOST`                       | `0.0.0.0`               |
    /// | `PORT`                       | `5000`                  |
    /// | `CORS_ORIGINS`               | `http://localhost:5000` |
    /// | `REQUEST_TIMEOUT_SECS`       | `30`                    |
    /// | `UPLOAD_DIR`                 | `uploads`               |
    /// | `DATA_DIR`                   | `.`                     |
    /// | `MAX_IMAGES`                 | `100`                   |
    /// | `MAX_UPLOAD_MB`              | `32`                    |
    /// | `RENDERER_BIN`               | `slidekiosk-renderer`   |
    /// | `RENDERER_STOP_TIMEOUT_SECS` | `3`                     |
    /// | `SSE_KEEPALIVE_SECS`         | `15`                    |
    /// | `STATE_POLL_SECS`            | `2`                     |
    pub fn from_env() -> Result<Self, ConfigError> {
        let cors_origins: Vec<String> = var_or("CORS_ORIGINS", "http://localhost:5000")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            host: var_or("HOST", "0.0.0.0"),
            port: parse_var("PORT", "5000")?,
            cors_origins,
            request_timeout_secs: parse_var("REQUEST_TIMEOUT_SECS", "30")?,
            upload_dir: PathBuf::from(var_or("UPLOAD_DIR", "uploads")),
            data_dir: PathBuf::from(var_or("DATA_DIR", ".")),
            max_images: parse_var("MAX_IMAGES", "100")?,
            max_upload_bytes: parse_var::<usize>("MAX_UPLOAD_MB", "32")?.saturating_mul(1024 * 1024),
            renderer_bin: PathBuf::from(var_or("RENDERER_BIN", "slidekiosk-renderer")),
            renderer_stop_timeout_secs: parse_var("RENDERER_STOP_TIMEOUT_SECS", "3")?,
            sse_keepalive_secs: parse_var("SSE_KEEPALIVE_SECS", "15")?,
            state_poll_secs: parse_var("STATE_POLL_SECS", "2")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_var_uses_default_when_unset() {
        let port: u16 = parse_var("SLIDEKIOSK_TEST_UNSET_PORT", "5000").unwrap();
        assert_eq!(port, 5000);
    }

    #[test]
    fn parse_var_reports_key_on_bad_default() {
        let err = parse_var::<u16>("SLIDEKIOSK_TEST_UNSET_PORT", "not-a-port").unwrap_err();
        assert_eq!(err.key, "SLIDEKIOSK_TEST_UNSET_PORT");
        assert_eq!(err.value, "not-a-port");
    }
}
