//! Environment-driven configuration
//!
//! Every setting has a default; unparseable values fall back to it with a
//! warning rather than aborting startup.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// How strictly the engine checks a document when opening it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Require at least one page and a clean full rewrite
    Strict,
    /// Parse the document and read its page count
    #[default]
    Relaxed,
}

impl FromStr for ValidationMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(ValidationMode::Strict),
            "relaxed" => Ok(ValidationMode::Relaxed),
            other => Err(format!("unknown validation mode {:?}", other)),
        }
    }
}

/// Object-stream handling when compressing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectStreams {
    #[default]
    Generate,
    Preserve,
    Disable,
}

impl FromStr for ObjectStreams {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "generate" => Ok(ObjectStreams::Generate),
            "preserve" => Ok(ObjectStreams::Preserve),
            "disable" => Ok(ObjectStreams::Disable),
            other => Err(format!("unknown object stream mode {:?}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format {:?}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Default level for this crate when `RUST_LOG` is unset
    pub level: String,
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

/// Settings shared by every front end
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PdfConfig {
    pub validation_mode: ValidationMode,
    /// Parent for scratch directories; system temp dir when unset
    pub temp_dir: Option<PathBuf>,
    pub object_streams: ObjectStreams,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout: Duration,
    /// Maximum accepted request body, in bytes
    pub max_upload_size: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            request_timeout: Duration::from_secs(120),
            max_upload_size: 200 * 1024 * 1024, // 200MB
        }
    }
}

impl HttpConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct McpConfig {
    /// Directories tool paths must stay inside; empty disables the sandbox
    pub allowed_dirs: Vec<String>,
}

/// Complete runtime configuration
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Config {
    pub log: LogConfig,
    pub pdf: PdfConfig,
    pub http: HttpConfig,
    pub mcp: McpConfig,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let defaults = Config::default();

        let log = LogConfig {
            level: get("LOG_LEVEL")
                .map(|v| v.to_ascii_lowercase())
                .unwrap_or(defaults.log.level),
            format: parse_or("LOG_FORMAT", get("LOG_FORMAT"), defaults.log.format),
        };

        let pdf = PdfConfig {
            validation_mode: parse_or(
                "PDF_VALIDATION_MODE",
                get("PDF_VALIDATION_MODE"),
                defaults.pdf.validation_mode,
            ),
            temp_dir: get("PDF_TEMP_DIR").map(PathBuf::from),
            object_streams: parse_or(
                "PDF_OBJECT_STREAMS",
                get("PDF_OBJECT_STREAMS"),
                defaults.pdf.object_streams,
            ),
        };

        let http = HttpConfig {
            host: get("HTTP_HOST").unwrap_or(defaults.http.host),
            port: parse_or("HTTP_PORT", get("HTTP_PORT"), defaults.http.port),
            request_timeout: get("HTTP_REQUEST_TIMEOUT")
                .and_then(|v| match parse_duration(&v) {
                    Some(d) => Some(d),
                    None => {
                        tracing::warn!(key = "HTTP_REQUEST_TIMEOUT", value = %v, "invalid duration, using default");
                        None
                    }
                })
                .unwrap_or(defaults.http.request_timeout),
            max_upload_size: parse_or(
                "HTTP_MAX_UPLOAD_SIZE",
                get("HTTP_MAX_UPLOAD_SIZE"),
                defaults.http.max_upload_size,
            ),
        };

        let mcp = McpConfig {
            allowed_dirs: get("MCP_ALLOWED_DIRS")
                .map(|v| split_dirs(&v))
                .unwrap_or_default(),
        };

        Config {
            log,
            pdf,
            http,
            mcp,
        }
    }
}

fn parse_or<T: FromStr>(key: &str, raw: Option<String>, default: T) -> T {
    match raw {
        Some(v) => v.parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %v, "invalid value, using default");
            default
        }),
        None => default,
    }
}

/// Directory lists accept `,` or the platform path separator.
fn split_dirs(raw: &str) -> Vec<String> {
    let path_sep = if cfg!(windows) { ';' } else { ':' };
    raw.split(|c: char| c == ',' || c == path_sep)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Parse `"30s"`, `"500ms"`, `"2m"`, `"1h"` or bare seconds (`"45"`).
pub fn parse_duration(raw: &str) -> Option<Duration> {
    let raw = raw.trim();
    let (digits, unit) = match raw.find(|c: char| !c.is_ascii_digit()) {
        Some(idx) => raw.split_at(idx),
        None => (raw, "s"),
    };
    let value: u64 = digits.parse().ok()?;

    match unit.trim() {
        "ms" => Some(Duration::from_millis(value)),
        "s" => Some(Duration::from_secs(value)),
        "m" => Some(Duration::from_secs(value.checked_mul(60)?)),
        "h" => Some(Duration::from_secs(value.checked_mul(3600)?)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config, Config::default());
        assert_eq!(config.pdf.validation_mode, ValidationMode::Relaxed);
        assert_eq!(config.http.bind_addr(), "0.0.0.0:8080");
        assert_eq!(config.http.max_upload_size, 209_715_200);
        assert_eq!(config.http.request_timeout, Duration::from_secs(120));
        assert!(config.mcp.allowed_dirs.is_empty());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("LOG_LEVEL", "DEBUG"),
            ("LOG_FORMAT", "json"),
            ("PDF_VALIDATION_MODE", "strict"),
            ("PDF_TEMP_DIR", "/var/tmp/pdf"),
            ("PDF_OBJECT_STREAMS", "disable"),
            ("HTTP_HOST", "127.0.0.1"),
            ("HTTP_PORT", "9090"),
            ("HTTP_REQUEST_TIMEOUT", "30s"),
            ("HTTP_MAX_UPLOAD_SIZE", "1048576"),
            ("MCP_ALLOWED_DIRS", "/data/in, /data/out"),
        ]);

        assert_eq!(config.log.level, "debug");
        assert_eq!(config.log.format, LogFormat::Json);
        assert_eq!(config.pdf.validation_mode, ValidationMode::Strict);
        assert_eq!(config.pdf.temp_dir, Some(PathBuf::from("/var/tmp/pdf")));
        assert_eq!(config.pdf.object_streams, ObjectStreams::Disable);
        assert_eq!(config.http.bind_addr(), "127.0.0.1:9090");
        assert_eq!(config.http.request_timeout, Duration::from_secs(30));
        assert_eq!(config.http.max_upload_size, 1_048_576);
        assert_eq!(config.mcp.allowed_dirs, vec!["/data/in", "/data/out"]);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config_from(&[
            ("PDF_VALIDATION_MODE", "paranoid"),
            ("HTTP_PORT", "not-a-port"),
            ("HTTP_REQUEST_TIMEOUT", "soon"),
            ("LOG_FORMAT", "xml"),
            ("HTTP_HOST", "   "),
        ]);

        assert_eq!(config.pdf.validation_mode, ValidationMode::Relaxed);
        assert_eq!(config.http.port, 8080);
        assert_eq!(config.http.request_timeout, Duration::from_secs(120));
        assert_eq!(config.log.format, LogFormat::Text);
        assert_eq!(config.http.host, "0.0.0.0");
    }

    #[rstest]
    #[case::bare_seconds("45", Some(Duration::from_secs(45)))]
    #[case::seconds("30s", Some(Duration::from_secs(30)))]
    #[case::millis("500ms", Some(Duration::from_millis(500)))]
    #[case::minutes("2m", Some(Duration::from_secs(120)))]
    #[case::hours("1h", Some(Duration::from_secs(3600)))]
    #[case::unknown_unit("3d", None)]
    #[case::no_digits("s", None)]
    #[case::empty("", None)]
    fn test_parse_duration(#[case] raw: &str, #[case] want: Option<Duration>) {
        assert_eq!(parse_duration(raw), want);
    }
}
