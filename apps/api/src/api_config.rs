use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use caseline_core::AppError;
use tracing_subscriber::EnvFilter;
use url::Url;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub frontend_url: String,
    pub api_host: String,
    pub api_port: u16,
    pub cookie_secure: bool,
    pub session_inactivity_minutes: i64,
    pub access_registry_path: Option<PathBuf>,
    pub data_api_url: Option<Url>,
    pub data_api_token: Option<String>,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let frontend_url =
            non_empty("FRONTEND_URL").unwrap_or_else(|| "http://localhost:3000".to_owned());
        let api_host = non_empty("API_HOST").unwrap_or_else(|| "127.0.0.1".to_owned());
        let api_port = non_empty("API_PORT")
            .map(|value| {
                value
                    .parse::<u16>()
                    .map_err(|error| AppError::Validation(format!("invalid API_PORT: {error}")))
            })
            .transpose()?
            .unwrap_or(3001);
        let cookie_secure = non_empty("SESSION_COOKIE_SECURE")
            .is_some_and(|value| value.eq_ignore_ascii_case("true"));
        let session_inactivity_minutes = non_empty("SESSION_INACTIVITY_MINUTES")
            .map(|value| {
                value
                    .parse::<i64>()
                    .ok()
                    .filter(|minutes| *minutes > 0)
                    .ok_or_else(|| {
                        AppError::Validation(format!(
                            "SESSION_INACTIVITY_MINUTES must be a positive integer, got '{value}'"
                        ))
                    })
            })
            .transpose()?
            .unwrap_or(30);

        let access_registry_path = non_empty("ACCESS_REGISTRY_PATH").map(PathBuf::from);
        let data_api_url = non_empty("DATA_API_URL")
            .map(|value| {
                Url::parse(value.as_str())
                    .map_err(|error| AppError::Validation(format!("invalid DATA_API_URL: {error}")))
            })
            .transpose()?;
        let data_api_token = non_empty("DATA_API_TOKEN");

        Ok(Self {
            frontend_url,
            api_host,
            api_port,
            cookie_secure,
            session_inactivity_minutes,
            access_registry_path,
            data_api_url,
            data_api_token,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use caseline_core::AppError;

    use super::ApiConfig;

    fn load(pairs: &[(&str, &str)]) -> Result<ApiConfig, AppError> {
        let values: HashMap<String, String> = pairs
            .iter()
            .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
            .collect();
        ApiConfig::from_lookup(|name| values.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let Ok(config) = load(&[]) else {
            panic!("empty environment should load");
        };
        assert_eq!(config.frontend_url, "http://localhost:3000");
        assert_eq!(config.api_port, 3001);
        assert!(!config.cookie_secure);
        assert_eq!(config.session_inactivity_minutes, 30);
        assert!(config.data_api_url.is_none());
        assert!(config.access_registry_path.is_none());
        assert_eq!(
            config.socket_address().map(|address| address.to_string()).ok(),
            Some("127.0.0.1:3001".to_owned())
        );
    }

    #[test]
    fn reads_remote_directory_settings() {
        let config = load(&[
            ("DATA_API_URL", "https://data.example.org/api/"),
            ("DATA_API_TOKEN", "secret"),
            ("SESSION_COOKIE_SECURE", "TRUE"),
            ("ACCESS_REGISTRY_PATH", "config/access.json"),
        ]);
        let Ok(config) = config else {
            panic!("configuration should load");
        };
        assert_eq!(
            config.data_api_url.map(|url| url.host_str().map(ToOwned::to_owned)),
            Some(Some("data.example.org".to_owned()))
        );
        assert_eq!(config.data_api_token.as_deref(), Some("secret"));
        assert!(config.cookie_secure);
        assert!(config.access_registry_path.is_some());
    }

    #[test]
    fn rejects_malformed_values() {
        assert!(matches!(
            load(&[("API_PORT", "http")]),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            load(&[("SESSION_INACTIVITY_MINUTES", "0")]),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            load(&[("DATA_API_URL", "not a url")]),
            Err(AppError::Validation(_))
        ));
    }
}
