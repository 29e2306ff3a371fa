// SPDX-License-Identifier: PMPL-1.0-or-later
//! Error types for a11y-fixer

use thiserror::Error;

/// Main error type for a11y-fixer
///
/// Analysis and edit resolution never fail; these errors only come from the
/// outer surfaces (files, configuration, the suggestion service).
#[derive(Error, Debug)]
pub enum A11yError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Suggestion service error: {0}")]
    Service(String),
}

pub type Result<T> = std::result::Result<T, A11yError>;
