//! Client configuration
//!
//! A [`ClientConfig`] names the API endpoint, the default project and region
//! and the HTTP policy. It is loaded from YAML or from `GCLOUD_*` environment
//! variables:
//!
//! ```yaml
//! api_url: https://api.gcore.com/cloud
//! project_id: 1
//! region_id: 76
//! api_token: "..."
//! http:
//!   timeout_secs: 30
//!   max_retries: 3
//!   backoff: exponential
//!   rate_limit:
//!     requests_per_second: 10
//!     burst_size: 10
//! ```

use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::types::{BackoffType, OptionStringExt};
use crate::validate::Validate;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Environment variable holding the API base URL
pub const ENV_API_URL: &str = "GCLOUD_API_URL";
/// Environment variable holding the API token
pub const ENV_API_TOKEN: &str = "GCLOUD_API_TOKEN";
/// Environment variable holding the default project id
pub const ENV_PROJECT_ID: &str = "GCLOUD_PROJECT_ID";
/// Environment variable holding the default region id
pub const ENV_REGION_ID: &str = "GCLOUD_REGION_ID";

// ============================================================================
// Client Config
// ============================================================================

/// Everything needed to talk to the cloud API
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the API, e.g. `https://api.gcore.com/cloud`
    pub api_url: String,

    /// Project used by regional resources
    #[serde(default)]
    pub project_id: Option<u64>,

    /// Region used by regional resources
    #[serde(default)]
    pub region_id: Option<u64>,

    /// API token, sent as `Authorization: APIKey <token>`
    #[serde(default, skip_serializing)]
    pub api_token: Option<String>,

    /// HTTP policy
    #[serde(default)]
    pub http: HttpSettings,
}

impl ClientConfig {
    /// Create a config for an endpoint with default HTTP settings
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            project_id: None,
            region_id: None,
            api_token: None,
            http: HttpSettings::default(),
        }
    }

    /// Set the default project
    #[must_use]
    pub fn project(mut self, project_id: u64) -> Self {
        self.project_id = Some(project_id);
        self
    }

    /// Set the default region
    #[must_use]
    pub fn region(mut self, region_id: u64) -> Self {
        self.region_id = Some(region_id);
        self
    }

    /// Set the API token
    #[must_use]
    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Load and validate a config from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read config {}: {e}", path.display()))
        })?;
        Self::from_yaml_str(&content)
    }

    /// Parse and validate a config from YAML text
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Build and validate a config from `GCLOUD_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build and validate a config from any key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup(ENV_API_URL)
            .none_if_empty()
            .ok_or_else(|| Error::missing_field(ENV_API_URL))?;

        let config = Self {
            api_url,
            project_id: parse_id(ENV_PROJECT_ID, lookup(ENV_PROJECT_ID).none_if_empty())?,
            region_id: parse_id(ENV_REGION_ID, lookup(ENV_REGION_ID).none_if_empty())?,
            api_token: lookup(ENV_API_TOKEN).none_if_empty(),
            http: HttpSettings::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Parsed API base URL
    pub fn base_url(&self) -> Result<Url> {
        Ok(Url::parse(&self.api_url)?)
    }

    /// HTTP client settings derived from this config
    pub fn to_http_config(&self) -> HttpClientConfig {
        let http = &self.http;
        let mut builder = HttpClientConfig::builder()
            .timeout(Duration::from_secs(http.timeout_secs))
            .max_retries(http.max_retries)
            .backoff(
                http.backoff,
                Duration::from_millis(http.initial_backoff_ms),
                Duration::from_millis(http.max_backoff_ms),
            );

        builder = match &http.rate_limit {
            Some(limit) => builder.rate_limit(limit.clone()),
            None => builder.no_rate_limit(),
        };
        if let Some(token) = &self.api_token {
            builder = builder.api_token(token);
        }
        if let Some(agent) = &http.user_agent {
            builder = builder.user_agent(agent);
        }
        builder.build()
    }
}

impl Validate for ClientConfig {
    fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.api_url)
            .map_err(|e| Error::config(format!("api_url '{}' is invalid: {e}", self.api_url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "api_url must use http or https, got '{}'",
                url.scheme()
            )));
        }
        if self.project_id == Some(0) {
            return Err(Error::config("project_id must be positive"));
        }
        if self.region_id == Some(0) {
            return Err(Error::config("region_id must be positive"));
        }
        if self.http.max_backoff_ms < self.http.initial_backoff_ms {
            return Err(Error::config(
                "http.max_backoff_ms must not be below http.initial_backoff_ms",
            ));
        }
        Ok(())
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_url", &self.api_url)
            .field("project_id", &self.project_id)
            .field("region_id", &self.region_id)
            .field("has_api_token", &self.api_token.is_some())
            .field("http", &self.http)
            .finish()
    }
}

fn parse_id(key: &str, raw: Option<String>) -> Result<Option<u64>> {
    raw.map(|value| {
        value
            .trim()
            .parse::<u64>()
            .map_err(|e| Error::config(format!("{key}='{value}' is not a valid id: {e}")))
    })
    .transpose()
}

// ============================================================================
// HTTP Settings
// ============================================================================

/// Retry, timeout and rate limit policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpSettings {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum number of retries
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Backoff between retries
    #[serde(default)]
    pub backoff: BackoffType,

    /// First backoff delay in milliseconds
    #[serde(default = "default_initial_ms")]
    pub initial_backoff_ms: u64,

    /// Backoff ceiling in milliseconds
    #[serde(default = "default_max_ms")]
    pub max_backoff_ms: u64,

    /// Client-side rate limit; `null` disables it
    #[serde(default = "default_rate_limit")]
    pub rate_limit: Option<RateLimiterConfig>,

    /// User agent override
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            max_retries: default_max_retries(),
            backoff: BackoffType::default(),
            initial_backoff_ms: default_initial_ms(),
            max_backoff_ms: default_max_ms(),
            rate_limit: default_rate_limit(),
            user_agent: None,
        }
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_initial_ms() -> u64 {
    100
}

fn default_max_ms() -> u64 {
    60000
}

fn default_rate_limit() -> Option<RateLimiterConfig> {
    Some(RateLimiterConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Stage;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_minimal_yaml() {
        let config = ClientConfig::from_yaml_str("api_url: https://api.example.com/cloud").unwrap();

        assert_eq!(config.api_url, "https://api.example.com/cloud");
        assert_eq!(config.project_id, None);
        assert_eq!(config.http, HttpSettings::default());
        assert_eq!(config.http.rate_limit, Some(RateLimiterConfig::new(10, 10)));
    }

    #[test]
    fn test_full_yaml() {
        let yaml = r#"
api_url: https://api.example.com/cloud
project_id: 1
region_id: 76
api_token: secret
http:
  timeout_secs: 5
  max_retries: 1
  backoff: linear
  initial_backoff_ms: 10
  max_backoff_ms: 50
  rate_limit: null
  user_agent: tests/1.0
"#;
        let config = ClientConfig::from_yaml_str(yaml).unwrap();

        assert_eq!(config.project_id, Some(1));
        assert_eq!(config.region_id, Some(76));
        assert_eq!(config.http.backoff, BackoffType::Linear);
        assert_eq!(config.http.rate_limit, None);

        let http = config.to_http_config();
        assert_eq!(http.timeout, Duration::from_secs(5));
        assert_eq!(http.max_retries, 1);
        assert_eq!(http.max_backoff, Duration::from_millis(50));
        assert_eq!(http.api_token.as_deref(), Some("secret"));
        assert_eq!(http.user_agent, "tests/1.0");
        assert!(http.rate_limit.is_none());
    }

    #[test]
    fn test_invalid_yaml() {
        let err = ClientConfig::from_yaml_str("api_url: [").unwrap_err();
        assert!(matches!(err, Error::YamlParse(_)));
    }

    #[test]
    fn test_validation_failures() {
        let err = ClientConfig::from_yaml_str("api_url: not a url").unwrap_err();
        assert!(err.to_string().contains("api_url"));

        let err = ClientConfig::from_yaml_str("api_url: ftp://example.com").unwrap_err();
        assert!(err.to_string().contains("http or https"));

        let err = ClientConfig::from_yaml_str("api_url: https://example.com\nregion_id: 0")
            .unwrap_err();
        assert!(err.to_string().contains("region_id"));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "api_url: https://api.example.com/cloud\nproject_id: 3").unwrap();

        let config = ClientConfig::from_file(file.path()).unwrap();
        assert_eq!(config.project_id, Some(3));
    }

    #[test]
    fn test_from_missing_file() {
        let err = ClientConfig::from_file("/nonexistent/gcorecloud.yaml").unwrap_err();
        assert_eq!(err.stage(), Stage::Config);
        assert!(err.to_string().contains("Failed to read config /nonexistent/gcorecloud.yaml"));
    }

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_from_lookup() {
        let config = ClientConfig::from_lookup(lookup(&[
            (ENV_API_URL, "https://api.example.com/cloud"),
            (ENV_API_TOKEN, "tok"),
            (ENV_PROJECT_ID, "7"),
            (ENV_REGION_ID, ""),
        ]))
        .unwrap();

        assert_eq!(config.project_id, Some(7));
        assert_eq!(config.region_id, None);
        assert_eq!(config.api_token.as_deref(), Some("tok"));
    }

    #[test]
    fn test_from_lookup_missing_url() {
        let err = ClientConfig::from_lookup(lookup(&[(ENV_PROJECT_ID, "7")])).unwrap_err();
        assert!(matches!(err, Error::MissingConfigField { ref field } if field == ENV_API_URL));
    }

    #[test]
    fn test_from_lookup_bad_id() {
        let err = ClientConfig::from_lookup(lookup(&[
            (ENV_API_URL, "https://api.example.com"),
            (ENV_REGION_ID, "luxembourg"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains(ENV_REGION_ID));
    }

    #[test]
    fn test_debug_hides_token() {
        let config = ClientConfig::new("https://api.example.com").api_token("secret");
        let debug = format!("{config:?}");
        assert!(!debug.contains("secret"));
        assert!(debug.contains("has_api_token: true"));
    }

    #[test]
    fn test_token_not_serialized() {
        let config = ClientConfig::new("https://api.example.com").api_token("secret");
        let yaml = serde_yaml::to_string(&config).unwrap();
        assert!(!yaml.contains("secret"));
    }
}
