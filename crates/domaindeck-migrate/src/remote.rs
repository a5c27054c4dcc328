use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use tracing::debug;
use url::Url;

use domaindeck_common::{Error, Result};

use crate::credentials::CredentialProvider;

/// Executes one SQL statement at a time against a remote endpoint.
///
/// The runner only depends on this seam, so the transport stays pluggable.
#[async_trait]
pub trait SqlExecutor: Send + Sync {
    /// Execute a single statement, returning the decoded response payload
    /// on success and the failure text otherwise.
    async fn execute(&self, sql: &str) -> Result<Value>;
}

/// Connection settings for the hosted database's SQL-over-HTTP endpoint.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    pub endpoint: Url,
    pub request_timeout: Duration,
}

impl RemoteConfig {
    pub fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// `SqlExecutor` over HTTP: POSTs each statement as JSON with a bearer
/// token, one request per statement.
pub struct HttpSqlExecutor {
    client: Client,
    config: RemoteConfig,
    token: String,
}

impl HttpSqlExecutor {
    /// Build the executor, resolving the credential up front so a missing
    /// key fails before any statement is attempted.
    pub fn new(config: RemoteConfig, credentials: &CredentialProvider) -> Result<Self> {
        let token = credentials.resolve()?;

        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| Error::Config(format!("failed to build http client: {e}")))?;

        Ok(Self {
            client,
            config,
            token,
        })
    }
}

#[async_trait]
impl SqlExecutor for HttpSqlExecutor {
    async fn execute(&self, sql: &str) -> Result<Value> {
        debug!("POST {} ({} chars)", self.config.endpoint, sql.len());

        let response = self
            .client
            .post(self.config.endpoint.clone())
            .bearer_auth(&self.token)
            .json(&json!({ "query": sql }))
            .send()
            .await
            .map_err(|e| Error::Remote(format!("request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Remote(format!("failed to read response body: {e}")))?;

        if !status.is_success() {
            return Err(Error::Remote(format!(
                "endpoint returned {status}: {}",
                body.trim()
            )));
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&body)
            .map_err(|e| Error::Remote(format!("invalid response json: {e}")))
    }
}
