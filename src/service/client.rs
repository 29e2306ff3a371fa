// SPDX-License-Identifier: PMPL-1.0-or-later
//! Client for a remote suggestion service
//!
//! Edits come back computed against the text that was sent. The document may
//! have changed while the request was in flight, so results are revalidated
//! against the caller's current text before they are returned.

use super::{GenerateRequest, GenerateResponse};
use crate::config::SuggestionConfig;
use crate::edit::TextEdit;
use crate::error::{A11yError, Result};
use crate::position::LineEndings;
use crate::resolver::revalidate;
use crate::rules::Syntax;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

/// HTTP client for `POST /generate`
pub struct SuggestionClient {
    client: Client,
    base_url: String,
    syntax: Syntax,
}

impl SuggestionClient {
    /// Create a client for the service at `base_url`
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            syntax: Syntax::default(),
        })
    }

    /// Dialect sent with every request
    pub fn with_syntax(mut self, syntax: Syntax) -> Self {
        self.syntax = syntax;
        self
    }

    /// Create a client from the `[suggestions]` config section
    pub fn from_config(config: &SuggestionConfig) -> Result<Self> {
        let url = config
            .url
            .as_deref()
            .ok_or_else(|| A11yError::Config("suggestions.url is not set".to_string()))?;
        Self::new(url, Duration::from_secs(config.timeout_secs))
    }

    /// Request suggestions for `code`, propagating any failure
    pub async fn request_edits(&self, code: &str, mode: &str) -> Result<GenerateResponse> {
        let url = format!("{}/generate", self.base_url);
        debug!(%url, bytes = code.len(), "requesting suggestions");

        let response = self
            .client
            .post(&url)
            .json(&GenerateRequest::new(code, mode).with_syntax(self.syntax))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(A11yError::Service(format!("{}: {}", status, body)));
        }

        Ok(response.json().await?)
    }

    /// Request suggestions for `code` and clamp them to `current`, the text
    /// as it is now. Failures are logged and yield no edits.
    pub async fn suggest(&self, code: &str, mode: &str, current: &str, endings: LineEndings) -> Vec<TextEdit> {
        match self.request_edits(code, mode).await {
            Ok(response) => {
                for warning in &response.warnings {
                    debug!("service warning: {}", warning);
                }
                revalidate(current, &response.edits, endings)
            }
            Err(e) => {
                warn!("suggestion service unavailable: {}", e);
                Vec::new()
            }
        }
    }
}
