use async_trait::async_trait;
use std::path::PathBuf;

use crate::core::bonuses::credentials::normalize_private_key;
use crate::core::bonuses::{BonusError, CredentialResolver, Resolution, ServiceAccountKey};

/// Reads a service-account JSON key file (`GOOGLE_APPLICATION_CREDENTIALS`).
///
/// Preferred over the inline pair because the key keeps its real newlines.
pub struct FileCredentialResolver {
    path: Option<PathBuf>,
}

impl FileCredentialResolver {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }
}

#[async_trait]
impl CredentialResolver for FileCredentialResolver {
    fn tier(&self) -> &'static str {
        "credentials-file"
    }

    async fn resolve(&self) -> Result<Resolution, BonusError> {
        let Some(path) = &self.path else {
            return Ok(Resolution::Missing(vec![
                "GOOGLE_APPLICATION_CREDENTIALS".to_string(),
            ]));
        };

        if !tokio::fs::try_exists(path).await.unwrap_or(false) {
            tracing::warn!(
                path = %path.display(),
                "GOOGLE_APPLICATION_CREDENTIALS points to a missing file, skipping"
            );
            return Ok(Resolution::Missing(vec![
                "GOOGLE_APPLICATION_CREDENTIALS (file not found)".to_string(),
            ]));
        }

        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            BonusError::Authentication(format!("failed to read credentials file: {}", e))
        })?;
        let key: ServiceAccountKey = serde_json::from_str(&content).map_err(|e| {
            BonusError::Authentication(format!("invalid credentials file: {}", e))
        })?;

        Ok(Resolution::Resolved(key))
    }
}

/// Builds a key from `GOOGLE_PRIVATE_KEY` and `GOOGLE_CLIENT_EMAIL`.
pub struct InlineKeyResolver {
    private_key: Option<String>,
    client_email: Option<String>,
}

impl InlineKeyResolver {
    pub fn new(private_key: Option<String>, client_email: Option<String>) -> Self {
        Self {
            private_key,
            client_email,
        }
    }
}

#[async_trait]
impl CredentialResolver for InlineKeyResolver {
    fn tier(&self) -> &'static str {
        "inline-key"
    }

    async fn resolve(&self) -> Result<Resolution, BonusError> {
        match (&self.private_key, &self.client_email) {
            (Some(private_key), Some(client_email)) => Ok(Resolution::Resolved(
                ServiceAccountKey::new(client_email.as_str(), normalize_private_key(private_key)),
            )),
            (private_key, client_email) => {
                let mut missing = Vec::new();
                if private_key.is_none() {
                    missing.push("GOOGLE_PRIVATE_KEY".to_string());
                }
                if client_email.is_none() {
                    missing.push("GOOGLE_CLIENT_EMAIL".to_string());
                }
                Ok(Resolution::Missing(missing))
            }
        }
    }
}
