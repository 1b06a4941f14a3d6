// Copyright 2026 The Filterstream Project
// SPDX-License-Identifier: Apache-2.0

// Credentials and the Authorization header.
//
// A session carries exactly one credential kind, chosen at construction:
// an app-only bearer token (v2 API) or OAuth1 user keys (legacy stream).

pub mod oauth1;

pub use oauth1::OAuth1Keys;

use reqwest::header::{HeaderValue, InvalidHeaderValue};
use reqwest::Method;
use std::fmt;

use crate::endpoint::Operation;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("credential cannot be used in an HTTP header: {0}")]
    InvalidHeader(#[from] InvalidHeaderValue),

    #[error("cannot sign request for invalid URL \"{url}\": {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },

    #[error("failed to sign request: {0}")]
    Signing(String),

    #[error("{operation} requires {required} credentials, session has {actual}")]
    WrongKind {
        operation: Operation,
        required: &'static str,
        actual: &'static str,
    },
}

#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    Bearer { token: String },
    OAuth1(OAuth1Keys),
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::Bearer { .. } => f
                .debug_struct("Bearer")
                .field("token", &"<redacted>")
                .finish(),
            Credentials::OAuth1(keys) => f.debug_tuple("OAuth1").field(keys).finish(),
        }
    }
}

impl Credentials {
    pub fn bearer(token: impl Into<String>) -> Self {
        Credentials::Bearer {
            token: token.into(),
        }
    }

    pub fn oauth1(keys: OAuth1Keys) -> Self {
        Credentials::OAuth1(keys)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Credentials::Bearer { .. } => "bearer",
            Credentials::OAuth1(_) => "oauth1",
        }
    }

    /// `Authorization` header for a request. OAuth1 signs `method` and the
    /// full `url` including its query string.
    pub fn authorization(&self, method: &Method, url: &str) -> Result<HeaderValue, AuthError> {
        let raw = match self {
            Credentials::Bearer { token } => format!("Bearer {token}"),
            Credentials::OAuth1(keys) => oauth1::authorization_header(keys, method, url)?,
        };
        let mut value = HeaderValue::from_str(&raw)?;
        value.set_sensitive(true);
        Ok(value)
    }

    /// Fail unless these credentials are of the `required` kind.
    pub fn require(&self, operation: Operation, required: &'static str) -> Result<(), AuthError> {
        if self.kind() == required {
            Ok(())
        } else {
            Err(AuthError::WrongKind {
                operation,
                required,
                actual: self.kind(),
            })
        }
    }
}
