use std::sync::Mutex;

use domaindeck_common::{Error, Result};

enum Source {
    Explicit(String),
    Env(String),
}

/// Source of the bearer credential for the remote endpoint.
///
/// An owned provider is handed to the executor at construction instead of
/// a process-global cache. `invalidate` clears the cached value so the
/// next `resolve` re-reads the source.
pub struct CredentialProvider {
    source: Source,
    cached: Mutex<Option<String>>,
}

impl CredentialProvider {
    /// Use an explicitly supplied token, e.g. from a CLI flag.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            source: Source::Explicit(token.into()),
            cached: Mutex::new(None),
        }
    }

    /// Resolve the token from the named environment variable on first use.
    pub fn from_env(var: impl Into<String>) -> Self {
        Self {
            source: Source::Env(var.into()),
            cached: Mutex::new(None),
        }
    }

    /// Return the credential, reading the source on first call and the
    /// cache afterwards. A missing or empty credential is an error.
    pub fn resolve(&self) -> Result<String> {
        let mut cached = self
            .cached
            .lock()
            .map_err(|_| Error::Credential("credential cache lock poisoned".into()))?;

        if let Some(token) = cached.as_ref() {
            return Ok(token.clone());
        }

        let raw = match &self.source {
            Source::Explicit(token) => token.clone(),
            Source::Env(var) => std::env::var(var)
                .map_err(|_| Error::Credential(format!("{var} is not set")))?,
        };

        let token = raw.trim().to_string();
        if token.is_empty() {
            return Err(Error::Credential("credential is empty".into()));
        }

        *cached = Some(token.clone());
        Ok(token)
    }

    /// Drop the cached value so the next `resolve` re-reads the source.
    pub fn invalidate(&self) {
        if let Ok(mut cached) = self.cached.lock() {
            *cached = None;
        }
    }
}
