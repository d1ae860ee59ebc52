use serde::{Deserialize, Serialize};

pub const DEFAULT_ENDPOINT: &str = "https://vision.googleapis.com/v1p2beta1/images:annotate";

pub const ENDPOINT_ENV: &str = "REVELIO_ENDPOINT";
pub const API_KEY_ENVS: [&str; 2] = ["REVELIO_API_KEY", "GOOGLE_API_KEY"];
pub const ACCESS_TOKEN_ENV: &str = "GOOGLE_OAUTH_ACCESS_TOKEN";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnnotatorConfig {
    pub url: Option<String>,
    pub api_key: Option<String>,
    pub access_token: Option<String>,
    /// Fall back to application default credentials when no key or token is set
    pub application_default: bool,
}

impl AnnotatorConfig {
    pub fn new() -> Self {
        Self {
            url: None,
            api_key: None,
            access_token: None,
            application_default: true,
        }
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable source; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Self {
            url: non_blank(ENDPOINT_ENV),
            api_key: API_KEY_ENVS.iter().find_map(|name| non_blank(*name)),
            access_token: non_blank(ACCESS_TOKEN_ENV),
            application_default: true,
        }
    }

    pub fn url(&self) -> &str {
        self.url.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }
}
