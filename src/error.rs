// Copyright 2026 The Filterstream Project
// SPDX-License-Identifier: Apache-2.0

use reqwest::StatusCode;

use crate::auth::AuthError;
use crate::endpoint::Operation;
use crate::transport::HttpError;

/// Errors returned by every session operation.
///
/// Nothing is retried internally. Partial success (some rules created, some
/// rejected) is not an error: it is reported in the decoded response.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Transport(#[from] HttpError),

    #[error("{operation}: unexpected HTTP status {status}: {body}")]
    UnexpectedStatus {
        operation: Operation,
        status: StatusCode,
        body: String,
    },

    #[error("{operation}: response body does not match the expected shape: {source}")]
    Decode {
        operation: Operation,
        source: serde_json::Error,
        body: String,
    },

    #[error("failed to encode request body: {0}")]
    Encode(serde_json::Error),

    #[error("stream line is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl ClientError {
    /// HTTP status of an `UnexpectedStatus` error.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// 401 or 403: the credentials were rejected.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self.status(),
            Some(StatusCode::UNAUTHORIZED) | Some(StatusCode::FORBIDDEN)
        )
    }

    pub fn is_rate_limited(&self) -> bool {
        self.status() == Some(StatusCode::TOO_MANY_REQUESTS)
    }
}
