use anyhow::{Context, Result};
use async_trait::async_trait;
use google_cloud_auth::{
    credentials::CredentialsFile,
    project::{create_token_source_from_credentials, Config},
    token_source::TokenSource,
};
use std::{fmt, path::Path};
use tracing::info;

/// OAuth scope granting read/write access to spreadsheets.
pub static SHEETS_SCOPES: [&str; 1] = ["https://www.googleapis.com/auth/spreadsheets"];

/// Source of bearer tokens for the Sheets API.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    async fn access_token(&self) -> Result<String>;
}

/// Tokens minted from a service account JSON key.
/// The underlying token source caches and refreshes on expiry.
pub struct ServiceAccountTokens {
    source: Box<dyn TokenSource>,
}

impl fmt::Debug for ServiceAccountTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountTokens").finish_non_exhaustive()
    }
}

impl ServiceAccountTokens {
    #[tracing::instrument(level = "info", skip(key_file), fields(key = %key_file.display()))]
    pub async fn from_key_file(key_file: &Path) -> Result<Self> {
        let credentials = CredentialsFile::new_from_file(key_file.display().to_string())
            .await
            .with_context(|| format!("reading service account key {}", key_file.display()))?;
        let config = Config::default().with_scopes(&SHEETS_SCOPES);
        let source = create_token_source_from_credentials(&credentials, &config)
            .await
            .context("creating token source from service account key")?;
        info!("service account loaded");
        Ok(Self { source })
    }
}

#[async_trait]
impl AccessTokenProvider for ServiceAccountTokens {
    async fn access_token(&self) -> Result<String> {
        let token = self
            .source
            .token()
            .await
            .context("fetching Sheets access token")?;
        Ok(token.access_token)
    }
}

/// Fixed token, for callers that obtain one elsewhere.
#[derive(Debug, Clone)]
pub struct StaticToken(pub String);

#[async_trait]
impl AccessTokenProvider for StaticToken {
    async fn access_token(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}
