use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::Deserialize;
use url::Url;

use crate::error::ConfigError;
use crate::models::{ClientConfig, RouteConfig};
use crate::util::{normalize_prefix, normalize_route, parse_bool_value, parse_timeout};

pub const ENV_CONFIG_PATH: &str = "SOTW_CONFIG_PATH";
pub const ENV_API_BASE_URL: &str = "SOTW_API_BASE_URL";
pub const ENV_API_PREFIX: &str = "SOTW_API_PREFIX";
pub const ENV_REQUEST_TIMEOUT: &str = "SOTW_REQUEST_TIMEOUT";
pub const ENV_ACCEPT_INVALID_CERTS: &str = "SOTW_ACCEPT_INVALID_CERTS";

/// Environment variable lookup. Production reads the process environment
/// layered over `.env`; tests pass a closure over a map.
pub type EnvLookup<'a> = &'a dyn Fn(&str) -> Option<String>;

/// On-disk TOML layout. Every key is optional and overrides the default.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    api_base_url: Option<String>,
    api_prefix: Option<String>,
    request_timeout: Option<String>,
    accept_invalid_certs: Option<bool>,
    #[serde(default)]
    routes: FileRoutes,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileRoutes {
    home: Option<String>,
    login: Option<String>,
    not_found: Option<String>,
    forbidden: Option<String>,
}

/// Builds a [`ClientConfig`] from defaults, an optional TOML file, an
/// optional `.env` file and the environment, in that order of precedence.
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
    env_file: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Explicit TOML path; wins over `SOTW_CONFIG_PATH`.
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// `.env` file layered under the process environment. A missing file is
    /// skipped.
    pub fn with_env_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.env_file = Some(path.into());
        self
    }

    /// Load using the process environment (and the `.env` file, if set).
    pub fn load(&self) -> Result<ClientConfig, ConfigError> {
        let dotenv = match &self.env_file {
            Some(path) => read_env_file(path)?,
            None => HashMap::new(),
        };
        let lookup = |key: &str| {
            std::env::var(key)
                .ok()
                .or_else(|| dotenv.get(key).cloned())
        };
        self.load_with(&lookup)
    }

    pub fn load_with(&self, lookup: EnvLookup<'_>) -> Result<ClientConfig, ConfigError> {
        let mut config = ClientConfig::default();

        let path = self
            .config_path
            .clone()
            .or_else(|| non_empty(lookup(ENV_CONFIG_PATH)).map(PathBuf::from));
        if let Some(path) = path {
            let file = read_file_config(&path)?;
            apply_file(&mut config, file)?;
            info!("[Config] loaded {}", path.display());
        }

        if let Some(raw) = non_empty(lookup(ENV_API_BASE_URL)) {
            config.api_base_url = parse_base_url(&raw)?;
        }
        if let Some(raw) = non_empty(lookup(ENV_API_PREFIX)) {
            config.api_prefix = normalize_prefix(&raw);
        }
        if let Some(raw) = lookup(ENV_REQUEST_TIMEOUT) {
            config.request_timeout = parse_timeout(ENV_REQUEST_TIMEOUT, &raw)?;
        }
        if let Some(raw) = non_empty(lookup(ENV_ACCEPT_INVALID_CERTS)) {
            config.accept_invalid_certs = parse_bool_value(ENV_ACCEPT_INVALID_CERTS, &raw)?;
        }

        debug!(
            "[Config] api root {}{} timeout {:?}",
            config.api_base_url, config.api_prefix, config.request_timeout
        );
        Ok(config)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|raw| !raw.trim().is_empty())
}

fn read_env_file(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    if !path.exists() {
        debug!("[Config] no env file at {}", path.display());
        return Ok(HashMap::new());
    }

    let to_error = |source| ConfigError::EnvFile {
        path: path.to_path_buf(),
        source,
    };
    let mut map = HashMap::new();
    for entry in dotenvy::from_path_iter(path).map_err(to_error)? {
        let (key, value) = entry.map_err(to_error)?;
        map.insert(key, value);
    }
    Ok(map)
}

fn read_file_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn apply_file(config: &mut ClientConfig, file: FileConfig) -> Result<(), ConfigError> {
    if let Some(raw) = file.api_base_url {
        config.api_base_url = parse_base_url(&raw)?;
    }
    if let Some(raw) = file.api_prefix {
        config.api_prefix = normalize_prefix(&raw);
    }
    if let Some(raw) = file.request_timeout {
        config.request_timeout = parse_timeout("request_timeout", &raw)?;
    }
    if let Some(flag) = file.accept_invalid_certs {
        config.accept_invalid_certs = flag;
    }

    let RouteConfig {
        home,
        login,
        not_found,
        forbidden,
    } = &mut config.routes;
    let overrides = [
        (home, file.routes.home),
        (login, file.routes.login),
        (not_found, file.routes.not_found),
        (forbidden, file.routes.forbidden),
    ];
    for (slot, value) in overrides {
        if let Some(raw) = value {
            *slot = normalize_route(&raw);
        }
    }
    Ok(())
}

/// Parses the base URL, keeping only scheme, host and port plus any path
/// with a trailing slash so relative joins keep it.
fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let mut url = Url::parse(raw.trim()).map_err(|source| ConfigError::InvalidBaseUrl {
        value: raw.to_string(),
        source,
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::UnsupportedScheme(raw.to_string()));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}
