// =============================================================================
// SERVICE ACCOUNT AUTHENTICATION
// =============================================================================
//
// Exchanges a signed JWT for an OAuth2 access token, the flow Google uses for
// server-to-server calls:
//
// 1. Sign a JWT with the service account's private key (RS256).
// 2. POST it to the key's token URI with the jwt-bearer grant type.
// 3. Send the returned access token as a bearer token on API calls.
//
// Tokens live for an hour; we keep one cached and refresh it shortly before
// it expires.

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::RwLock;

use crate::core::bonuses::credentials::SHEETS_READONLY_SCOPE;
use crate::core::bonuses::{BonusError, ServiceAccountKey};

/// Lifetime requested for each signed assertion.
const ASSERTION_LIFETIME_SECS: u64 = 3600;

/// A cached token is refreshed once less than this much time is left.
const REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// Used when the token endpoint does not report `expires_in`.
const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(55 * 60);

/// Assertion sent to the token URI. Always asks for the read-only Sheets
/// scope on behalf of `iss`.
#[derive(Debug, Serialize)]
struct JwtClaims {
    iss: String,
    scope: String,
    aud: String,
    iat: u64,
    exp: u64,
}

/// Only the fields we use; `token_type` is always "Bearer".
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

/// `expires_at` comes from the endpoint's `expires_in`, or the default
/// lifetime when that is absent.
struct CachedToken {
    token: String,
    expires_at: SystemTime,
}

/// Holds the parsed signing key for one service account and the current
/// access token.
pub struct ServiceAccountAuth {
    client_email: String,
    token_uri: String,
    signing_key: EncodingKey,
    client: Client,
    cached_token: Arc<RwLock<Option<CachedToken>>>,
}

impl ServiceAccountAuth {
    /// Parses the key's PEM up front so a malformed key fails here rather
    /// than on the first request.
    pub fn new(key: ServiceAccountKey) -> Result<Self, BonusError> {
        let signing_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes()).map_err(|e| {
            BonusError::Authentication(format!("invalid service account private key: {}", e))
        })?;

        Ok(Self {
            client_email: key.client_email,
            token_uri: key.token_uri,
            signing_key,
            client: Client::new(),
            cached_token: Arc::new(RwLock::new(None)),
        })
    }

    pub fn client_email(&self) -> &str {
        &self.client_email
    }

    /// Returns the cached token while it has more than `REFRESH_MARGIN`
    /// left, otherwise exchanges a fresh assertion and caches the result.
    pub async fn access_token(&self) -> Result<String, BonusError> {
        {
            let cached = self.cached_token.read().await;
            if let Some(token) = cached.as_ref() {
                if token.expires_at > SystemTime::now() + REFRESH_MARGIN {
                    return Ok(token.token.clone());
                }
            }
        }

        let (token, lifetime) = self.fetch_new_token().await?;

        {
            let mut cached = self.cached_token.write().await;
            *cached = Some(CachedToken {
                token: token.clone(),
                expires_at: SystemTime::now() + lifetime,
            });
        }

        Ok(token)
    }

    fn claims(&self, now: u64) -> JwtClaims {
        JwtClaims {
            iss: self.client_email.clone(),
            scope: SHEETS_READONLY_SCOPE.to_string(),
            aud: self.token_uri.clone(),
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        }
    }

    fn signed_assertion(&self) -> Result<String, BonusError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| BonusError::Integration(format!("system clock error: {}", e)))?
            .as_secs();

        encode(
            &Header::new(Algorithm::RS256),
            &self.claims(now),
            &self.signing_key,
        )
        .map_err(|e| BonusError::Authentication(format!("failed to sign token request: {}", e)))
    }

    /// One jwt-bearer exchange. Rejected or unreadable responses are
    /// integration errors.
    async fn fetch_new_token(&self) -> Result<(String, Duration), BonusError> {
        let jwt = self.signed_assertion()?;

        tracing::debug!(client_email = %self.client_email, "Requesting Google access token");

        let response = self
            .client
            .post(&self.token_uri)
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", jwt.as_str()),
            ])
            .send()
            .await
            .map_err(|e| BonusError::Integration(format!("token request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(BonusError::Integration(format!(
                "token exchange failed ({}): {}",
                status, text
            )));
        }

        let token_response: TokenResponse = response
            .json()
            .await
            .map_err(|e| BonusError::Integration(format!("invalid token response: {}", e)))?;

        let lifetime = token_response
            .expires_in
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TOKEN_LIFETIME);

        Ok((token_response.access_token, lifetime))
    }
}
