// Credential resolution for the Google Sheets client.
//
// Each way of obtaining a service-account key is a `CredentialResolver`.
// The resolvers are tried in order and the first one that has its inputs
// wins. A resolver that has its inputs but cannot turn them into a key stops
// the chain with an authentication error.

use async_trait::async_trait;
use serde::Deserialize;
use std::fmt;

use super::BonusError;

/// OAuth scope for read-only access to spreadsheets.
pub const SHEETS_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets.readonly";

/// Token endpoint used when a key file does not name one.
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// The parts of a service-account key needed to sign token requests.
///
/// Deserialises from the JSON key file Google Cloud hands out; the other
/// fields in that file are ignored.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    /// The service account email (used as issuer in JWT).
    pub client_email: String,

    /// The private key in PEM format.
    pub private_key: String,

    /// The token URI (where to exchange JWT for access token).
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl ServiceAccountKey {
    pub fn new(client_email: impl Into<String>, private_key: impl Into<String>) -> Self {
        Self {
            client_email: client_email.into(),
            private_key: private_key.into(),
            token_uri: default_token_uri(),
        }
    }
}

// Keeps the key material out of logs.
impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key", &"<redacted>")
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

/// Outcome of a single resolver.
#[derive(Debug)]
pub enum Resolution {
    Resolved(ServiceAccountKey),
    /// The resolver's inputs are not configured. Lists what is missing.
    Missing(Vec<String>),
}

#[async_trait]
pub trait CredentialResolver: Send + Sync {
    /// Short name used in logs.
    fn tier(&self) -> &'static str;

    /// Returns `Missing` when this tier is not configured, or an
    /// `Authentication` error when it is configured but unusable.
    async fn resolve(&self) -> Result<Resolution, BonusError>;
}

/// Runs the resolvers in order and returns the first key found.
pub async fn resolve_credentials(
    resolvers: &[Box<dyn CredentialResolver>],
) -> Result<ServiceAccountKey, BonusError> {
    let mut missing = Vec::new();

    for resolver in resolvers {
        match resolver.resolve().await? {
            Resolution::Resolved(key) => {
                tracing::info!(
                    tier = resolver.tier(),
                    client_email = %key.client_email,
                    "Resolved Google service account credentials"
                );
                return Ok(key);
            }
            Resolution::Missing(inputs) => {
                tracing::debug!(tier = resolver.tier(), ?inputs, "Credential tier not configured");
                missing.extend(inputs);
            }
        }
    }

    Err(BonusError::Configuration(format!(
        "either GOOGLE_APPLICATION_CREDENTIALS (path to a JSON key file) or both \
         GOOGLE_PRIVATE_KEY and GOOGLE_CLIENT_EMAIL must be set (missing: {})",
        missing.join(", ")
    )))
}

/// Cleans up a PEM key that was passed through an environment variable.
///
/// Environment files usually cannot hold real newlines, so keys are often
/// stored quoted with literal `\n` sequences. This strips one pair of
/// wrapping quotes and turns `\n` back into newlines.
pub fn normalize_private_key(raw: &str) -> String {
    let trimmed = raw.trim();
    let trimmed = trimmed
        .strip_prefix(['"', '\''])
        .unwrap_or(trimmed);
    let trimmed = trimmed
        .strip_suffix(['"', '\''])
        .unwrap_or(trimmed);

    trimmed.replace("\\n", "\n").trim().to_string()
}
