use serde::Serialize;
use tracing::{info, warn};

use crate::{
    config::ClientConfig,
    github::{GitHubClient, IdentityApi},
};

pub use crate::github::Identity;

/// Result of a token check. A rejected call is a value here, never an error.
///
/// Serializes as `{"valid": bool, "identity"?: {..}, "error"?: ".."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "ValidationReport")]
pub enum TokenValidation {
    Valid(Identity),
    Invalid { error: String },
}

#[derive(Serialize)]
struct ValidationReport {
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    identity: Option<Identity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl From<TokenValidation> for ValidationReport {
    fn from(validation: TokenValidation) -> Self {
        match validation {
            TokenValidation::Valid(identity) => Self {
                valid: true,
                identity: Some(identity),
                error: None,
            },
            TokenValidation::Invalid { error } => Self {
                valid: false,
                identity: None,
                error: Some(error),
            },
        }
    }
}

impl TokenValidation {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }
}

/// Asks the identity endpoint who owns the token. One call, no retry.
pub async fn check_identity<A>(api: &A) -> TokenValidation
where
    A: IdentityApi + ?Sized,
{
    match api.authenticated_user().await {
        Ok(identity) => {
            info!("token belongs to {}", identity.login);
            TokenValidation::Valid(identity)
        }
        Err(e) => {
            warn!("token rejected: {}", e);
            TokenValidation::Invalid {
                error: e.to_string(),
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct TokenValidator {
    config: ClientConfig,
}

impl TokenValidator {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    pub async fn validate(&self, token: &str) -> TokenValidation {
        let token = token.trim();
        if token.is_empty() {
            return TokenValidation::Invalid {
                error: "Token is required".to_string(),
            };
        }
        match GitHubClient::new(&self.config, token) {
            Ok(client) => check_identity(&client).await,
            Err(e) => TokenValidation::Invalid {
                error: e.to_string(),
            },
        }
    }
}
