use anyhow::{Context, Result};

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub model: String,
    pub host: String,
    pub port: u16,
    /// Upper bound on a single completion call, in seconds.
    pub llm_timeout_secs: u64,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let require = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("Required environment variable '{key}' is not set"))
        };

        Ok(Config {
            openai_api_key: require("OPENAI_API_KEY")?,
            openai_base_url: lookup("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            model: lookup("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: lookup("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            llm_timeout_secs: lookup("LLM_TIMEOUT_SECS")
                .unwrap_or_else(|| "60".to_string())
                .parse::<u64>()
                .context("LLM_TIMEOUT_SECS must be a whole number of seconds")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_applied_when_only_key_set() {
        let config = Config::from_lookup(lookup_from(&[("OPENAI_API_KEY", "sk-test")])).unwrap();
        assert_eq!(config.openai_api_key, "sk-test");
        assert_eq!(config.openai_base_url, DEFAULT_OPENAI_BASE_URL);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.llm_timeout_secs, 60);
        assert_eq!(config.rust_log, "info");
    }

    #[test]
    fn test_missing_api_key_is_an_error() {
        let err = Config::from_lookup(lookup_from(&[("PORT", "9000")])).unwrap_err();
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_blank_api_key_is_an_error() {
        assert!(Config::from_lookup(lookup_from(&[("OPENAI_API_KEY", "  ")])).is_err());
    }

    #[test]
    fn test_invalid_port_is_an_error() {
        let result = Config::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("PORT", "not-a-port"),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn test_overrides_are_respected() {
        let config = Config::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_BASE_URL", "http://localhost:9999/v1"),
            ("OPENAI_MODEL", "gpt-4o-mini"),
            ("PORT", "8081"),
            ("LLM_TIMEOUT_SECS", "15"),
        ]))
        .unwrap();
        assert_eq!(config.openai_base_url, "http://localhost:9999/v1");
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.port, 8081);
        assert_eq!(config.llm_timeout_secs, 15);
    }
}
