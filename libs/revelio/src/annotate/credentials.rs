use gcp_auth::TokenProvider;

use super::AnnotatorConfig;
use crate::common::{Result, RevelioError};

pub const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";

/// Where the credential for the annotate call comes from. Picking one never
/// touches the network; application default tokens are minted on first use.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Sent as the `key` query parameter
    ApiKey(String),
    /// Sent as a bearer token
    AccessToken(String),
    /// `GOOGLE_APPLICATION_CREDENTIALS`, the well-known ADC file, the metadata
    /// server or `gcloud`, resolved lazily by `gcp_auth`
    ApplicationDefault,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credentials::ApiKey(_) => write!(f, "ApiKey(<redacted>)"),
            Credentials::AccessToken(_) => write!(f, "AccessToken(<redacted>)"),
            Credentials::ApplicationDefault => write!(f, "ApplicationDefault"),
        }
    }
}

impl Credentials {
    pub fn discover(config: &AnnotatorConfig) -> Result<Self> {
        if let Some(key) = &config.api_key {
            log::debug!("Using API key credentials");
            return Ok(Credentials::ApiKey(key.clone()));
        }
        if let Some(token) = &config.access_token {
            log::debug!("Using access token from environment");
            return Ok(Credentials::AccessToken(token.clone()));
        }
        if config.application_default {
            log::debug!("Deferring to application default credentials");
            return Ok(Credentials::ApplicationDefault);
        }
        Err(RevelioError::Auth(
            "no API key or access token configured".to_string(),
        ))
    }
}

pub(crate) async fn application_default_token() -> Result<String> {
    let provider = gcp_auth::provider()
        .await
        .map_err(|e| RevelioError::Auth(e.to_string()))?;
    let token = provider
        .token(&[CLOUD_PLATFORM_SCOPE])
        .await
        .map_err(|e| RevelioError::Auth(e.to_string()))?;
    Ok(token.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_key_wins_over_token() {
        let config = AnnotatorConfig {
            api_key: Some("key".to_string()),
            access_token: Some("token".to_string()),
            ..AnnotatorConfig::new()
        };
        assert_eq!(
            Credentials::discover(&config).unwrap(),
            Credentials::ApiKey("key".to_string())
        );
    }

    #[test]
    fn test_token_used_without_key() {
        let config = AnnotatorConfig {
            access_token: Some("token".to_string()),
            ..AnnotatorConfig::new()
        };
        assert_eq!(
            Credentials::discover(&config).unwrap(),
            Credentials::AccessToken("token".to_string())
        );
    }

    #[test]
    fn test_falls_back_to_application_default() {
        assert_eq!(
            Credentials::discover(&AnnotatorConfig::new()).unwrap(),
            Credentials::ApplicationDefault
        );
    }

    #[test]
    fn test_nothing_configured_is_auth_error() {
        let config = AnnotatorConfig {
            application_default: false,
            ..AnnotatorConfig::new()
        };
        assert!(matches!(
            Credentials::discover(&config),
            Err(RevelioError::Auth(_))
        ));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let creds = Credentials::ApiKey("super-secret".to_string());
        assert!(!format!("{:?}", creds).contains("super-secret"));
    }
}
