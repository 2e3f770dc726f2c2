use serde::Deserialize;
use std::env;

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

fn parse_env_opt<T: std::str::FromStr>(var: &str) -> Option<T>
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Ignoring.", val, var, e);
                None
            }
        },
        Err(_) => None,
    }
}

pub const DEFAULT_API_URL: &str = "http://localhost:3000";
pub const DEFAULT_SEARCH_LIMIT: u32 = 10;
pub const DEFAULT_PREVIEW_CHARS: usize = 200;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub view: ViewConfig,
}

/// Where the backend lives and how requests are sent to it.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    /// No client-side timeout unless explicitly configured.
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ViewConfig {
    pub search_limit: u32,
    pub preview_chars: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{other}', expected pretty or json")),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout_secs: None,
        }
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            search_limit: DEFAULT_SEARCH_LIMIT,
            preview_chars: DEFAULT_PREVIEW_CHARS,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: env::var("DOCDASH_API_URL")
                    .ok()
                    .map(|url| url.trim().to_string())
                    .filter(|url| !url.is_empty())
                    .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
                timeout_secs: parse_env_opt("DOCDASH_TIMEOUT_SECS"),
            },
            view: ViewConfig {
                search_limit: match parse_env_or("DOCDASH_SEARCH_LIMIT", DEFAULT_SEARCH_LIMIT) {
                    0 => {
                        tracing::warn!("DOCDASH_SEARCH_LIMIT must be at least 1. Using default.");
                        DEFAULT_SEARCH_LIMIT
                    }
                    limit => limit,
                },
                preview_chars: parse_env_or("DOCDASH_PREVIEW_CHARS", DEFAULT_PREVIEW_CHARS),
            },
        }
    }
}

/// Log output format from `DOCDASH_LOG_FORMAT`.
///
/// Read before the subscriber exists, so an invalid value cannot be
/// reported here; [`Config::from_env`] warns about it once logging is up.
pub fn log_format() -> LogFormat {
    env::var("DOCDASH_LOG_FORMAT")
        .ok()
        .and_then(|val| val.parse().ok())
        .unwrap_or_default()
}

impl Config {
    pub fn from_env() -> Self {
        if let Ok(val) = env::var("DOCDASH_LOG_FORMAT") {
            if let Err(e) = val.parse::<LogFormat>() {
                tracing::warn!(
                    "Invalid value '{}' for DOCDASH_LOG_FORMAT: {}. Using default.",
                    val,
                    e
                );
            }
        }
        Self::default()
    }

    /// Replace the base URL, e.g. from a command-line flag.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.api.base_url = base_url.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());

    fn clear_env() {
        for var in [
            "DOCDASH_API_URL",
            "DOCDASH_TIMEOUT_SECS",
            "DOCDASH_SEARCH_LIMIT",
            "DOCDASH_PREVIEW_CHARS",
            "DOCDASH_LOG_FORMAT",
        ] {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_config_defaults() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        clear_env();

        let config = Config::default();
        assert_eq!(config.api.base_url, "http://localhost:3000");
        assert!(config.api.timeout_secs.is_none());
        assert_eq!(config.view.search_limit, 10);
        assert_eq!(config.view.preview_chars, 200);
        assert_eq!(log_format(), LogFormat::Pretty);
    }

    #[test]
    fn test_config_from_env() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        clear_env();

        std::env::set_var("DOCDASH_API_URL", " http://10.0.0.5:3000 ");
        std::env::set_var("DOCDASH_TIMEOUT_SECS", "45");
        std::env::set_var("DOCDASH_SEARCH_LIMIT", "25");
        std::env::set_var("DOCDASH_LOG_FORMAT", "json");

        let config = Config::from_env();
        assert_eq!(config.api.base_url, "http://10.0.0.5:3000");
        assert_eq!(config.api.timeout_secs, Some(45));
        assert_eq!(config.view.search_limit, 25);
        assert_eq!(log_format(), LogFormat::Json);

        clear_env();
    }

    #[test]
    fn test_invalid_values_fall_back_to_defaults() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        clear_env();

        std::env::set_var("DOCDASH_SEARCH_LIMIT", "lots");
        std::env::set_var("DOCDASH_TIMEOUT_SECS", "-1");
        std::env::set_var("DOCDASH_LOG_FORMAT", "xml");

        let config = Config::from_env();
        assert_eq!(config.view.search_limit, 10);
        assert!(config.api.timeout_secs.is_none());
        assert_eq!(log_format(), LogFormat::Pretty);

        clear_env();
    }

    #[test]
    fn test_zero_search_limit_uses_default() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        clear_env();

        std::env::set_var("DOCDASH_SEARCH_LIMIT", "0");
        let config = Config::from_env();
        assert_eq!(config.view.search_limit, DEFAULT_SEARCH_LIMIT);

        clear_env();
    }

    #[test]
    fn test_blank_api_url_uses_default() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        clear_env();

        std::env::set_var("DOCDASH_API_URL", "   ");
        let config = Config::from_env();
        assert_eq!(config.api.base_url, DEFAULT_API_URL);

        clear_env();
    }

    #[test]
    fn test_with_base_url_overrides() {
        let config = Config {
            api: ApiConfig::default(),
            view: ViewConfig::default(),
        }
        .with_base_url("http://example.test");
        assert_eq!(config.api.base_url, "http://example.test");
    }
}
