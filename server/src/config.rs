//! Server configuration
//!
//! Configuration is loaded from environment variables; every value has a
//! working default so the server starts with no environment at all.

use std::env;
use std::time::Duration;

/// Image CDNs permitted as remote sources by default
const DEFAULT_ALLOWED_DOMAINS: &[&str] = &[
    "imagedelivery.net",
    "pbs.twimg.com",
    "warpcast.com",
    "res.cloudinary.com",
    "i.seadn.io",
];

/// Main server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Public base URL for link generation (optional)
    pub public_base_url: Option<String>,

    /// Hostnames permitted as remote image sources (exact or subdomain match)
    pub allowed_domains: Vec<String>,

    /// Remote fetch configuration
    pub fetch: FetchConfig,

    /// Output/emission configuration
    pub output: OutputConfig,
}

/// Remote image fetch configuration
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Per-request timeout for the upstream fetch
    pub timeout: Duration,
    /// Client identifier sent with upstream requests
    pub user_agent: String,
    /// Maximum accepted response body size in bytes
    pub max_body_bytes: usize,
}

/// Output emission configuration
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Cache-Control max-age for inline previews, in seconds
    pub preview_max_age_secs: u64,
    /// Prefix for generated attachment filenames
    pub filename_prefix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            public_base_url: None,
            allowed_domains: DEFAULT_ALLOWED_DOMAINS
                .iter()
                .map(|d| d.to_string())
                .collect(),
            fetch: FetchConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            user_agent: "Mozilla/5.0 (compatible; Tintframe/1.0)".to_string(),
            max_body_bytes: 20 * 1024 * 1024, // 20 MB
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            preview_max_age_secs: 60,
            filename_prefix: "tinted".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        // Server config
        if let Ok(host) = env::var("HOST") {
            config.host = host;
        }
        if let Ok(port) = env::var("PORT")
            && let Ok(p) = port.parse()
        {
            config.port = p;
        }
        if let Ok(url) = env::var("PUBLIC_BASE_URL")
            && !url.is_empty()
        {
            config.public_base_url = Some(url);
        }

        // Allow-list: comma-separated hostnames, replacing the defaults
        if let Ok(val) = env::var("ALLOWED_IMAGE_DOMAINS")
            && !val.is_empty()
        {
            config.allowed_domains = val
                .split(',')
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty())
                .collect();
        }

        // Fetch config
        if let Ok(val) = env::var("FETCH_TIMEOUT_SECS")
            && let Ok(secs) = val.parse::<u64>()
        {
            config.fetch.timeout = Duration::from_secs(secs);
        }
        if let Ok(val) = env::var("FETCH_USER_AGENT")
            && !val.is_empty()
        {
            config.fetch.user_agent = val;
        }
        if let Ok(val) = env::var("MAX_IMAGE_SIZE_MB")
            && let Ok(mb) = val.parse::<usize>()
        {
            config.fetch.max_body_bytes = mb * 1024 * 1024;
        }

        // Output config
        if let Ok(val) = env::var("PREVIEW_CACHE_SECS")
            && let Ok(secs) = val.parse::<u64>()
        {
            config.output.preview_max_age_secs = secs;
        }
        if let Ok(val) = env::var("FILENAME_PREFIX")
            && !val.is_empty()
        {
            config.output.filename_prefix = val;
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.allowed_domains.len(), 5);
        assert!(config.allowed_domains.contains(&"pbs.twimg.com".to_string()));
        assert_eq!(config.fetch.timeout, Duration::from_secs(10));
        assert_eq!(config.output.preview_max_age_secs, 60);
    }

    #[test]
    fn test_config_from_env() {
        // This test doesn't set env vars, so it should return defaults
        let config = Config::from_env();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.output.filename_prefix, "tinted");
    }
}
