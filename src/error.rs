//! Unified client error model.
//! Fatal errors abort the current workflow and carry a user-facing message;
//! isolated per-record errors are only ever logged and replaced by defaults.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ClientError {
    /// No candidate path in the login response carried a token.
    #[error("missing_token: no access token found in the login response")]
    MissingToken,
    /// The primary list fetch of an aggregation failed; no partial output exists.
    #[error("primary_fetch: {message}")]
    PrimaryFetch { message: String },
    /// One record's secondary fetch failed. Swallowed by the fan-out combinator.
    #[error("secondary_fetch: record {record_id}: {message}")]
    SecondaryFetch { record_id: String, message: String },
    /// Not authenticated. An expected state, not a crash.
    #[error("session_absent: no session token present")]
    SessionAbsent,
    #[error("invalid_input: {message}")]
    InvalidInput { message: String },
    #[error("remote: HTTP {status}: {message}")]
    Remote { status: u16, message: String },
    #[error("transport: {message}")]
    Transport { message: String },
    #[error("persistence: {message}")]
    Persistence { message: String },
}

impl ClientError {
    pub fn code_str(&self) -> &'static str {
        match self {
            ClientError::MissingToken => "missing_token",
            ClientError::PrimaryFetch { .. } => "primary_fetch",
            ClientError::SecondaryFetch { .. } => "secondary_fetch",
            ClientError::SessionAbsent => "session_absent",
            ClientError::InvalidInput { .. } => "invalid_input",
            ClientError::Remote { .. } => "remote",
            ClientError::Transport { .. } => "transport",
            ClientError::Persistence { .. } => "persistence",
        }
    }

    /// Message suitable for showing to the person using the portal.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::MissingToken => "Connexion impossible : aucun jeton d'accès dans la réponse du serveur.".to_string(),
            ClientError::PrimaryFetch { message } => message.clone(),
            ClientError::SecondaryFetch { .. } => "Evaluation in progress".to_string(),
            ClientError::SessionAbsent => "Veuillez vous connecter".to_string(),
            ClientError::InvalidInput { message } => message.clone(),
            ClientError::Remote { message, .. } => message.clone(),
            ClientError::Transport { message } => message.clone(),
            ClientError::Persistence { message } => message.clone(),
        }
    }

    /// Whether the error aborts the operation that raised it.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, ClientError::SecondaryFetch { .. } | ClientError::SessionAbsent)
    }

    pub fn invalid_input<S: Into<String>>(msg: S) -> Self { ClientError::InvalidInput { message: msg.into() } }
    pub fn primary_fetch<S: Into<String>>(msg: S) -> Self { ClientError::PrimaryFetch { message: msg.into() } }
    pub fn persistence<S: Into<String>>(msg: S) -> Self { ClientError::Persistence { message: msg.into() } }
}

pub type ClientResult<T> = Result<T, ClientError>;

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => ClientError::Remote { status: status.as_u16(), message: err.to_string() },
            None => ClientError::Transport { message: err.to_string() },
        }
    }
}

impl From<anyhow::Error> for ClientError {
    fn from(err: anyhow::Error) -> Self {
        // Only the session backends speak anyhow
        ClientError::Persistence { message: format!("{:#}", err) }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
