use std::time::Duration;

use url::Url;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/";
pub const DEFAULT_API_PREFIX: &str = "/api/v1/";

/// Runtime configuration of the client.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Scheme, host and port of the survey API.
    pub api_base_url: Url,
    /// Versioned prefix joined onto the base URL, normalized to `/seg/`.
    pub api_prefix: String,
    /// `None` means no timeout; a hung call only stalls the view waiting on it.
    pub request_timeout: Option<Duration>,
    /// Development aid for self-signed API certificates.
    pub accept_invalid_certs: bool,
    pub routes: RouteConfig,
}

impl ClientConfig {
    /// URL that endpoint paths such as `sotw/42` are resolved against.
    pub fn api_root(&self) -> Result<Url, url::ParseError> {
        self.api_base_url.join(self.api_prefix.trim_start_matches('/'))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_base_url(),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            request_timeout: None,
            accept_invalid_certs: false,
            routes: RouteConfig::default(),
        }
    }
}

fn default_base_url() -> Url {
    match Url::parse(DEFAULT_API_BASE_URL) {
        Ok(url) => url,
        Err(_) => unreachable!("default base URL is a valid literal"),
    }
}

/// Well-known client-side paths the guard pipeline and response policy
/// redirect to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteConfig {
    pub home: String,
    pub login: String,
    pub not_found: String,
    pub forbidden: String,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            home: "/".to_string(),
            login: "/login".to_string(),
            not_found: "/404".to_string(),
            forbidden: "/403".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_root_joins_prefix() {
        let config = ClientConfig::default();
        assert_eq!(
            config.api_root().unwrap().as_str(),
            "http://localhost:8000/api/v1/"
        );
        assert_eq!(
            config.api_root().unwrap().join("sotw/42").unwrap().as_str(),
            "http://localhost:8000/api/v1/sotw/42"
        );
    }
}
