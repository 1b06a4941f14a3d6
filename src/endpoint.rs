// Copyright 2026 The Filterstream Project
// SPDX-License-Identifier: Apache-2.0

// Endpoint table: every operation maps to one method, one path and the single
// status code that counts as success. Nothing else in the crate spells paths.

use reqwest::{Method, StatusCode};
use std::fmt;

pub const DEFAULT_API_BASE: &str = "https://api.twitter.com/2";
pub const DEFAULT_LEGACY_STREAM_URL: &str = "https://stream.twitter.com/1.1/statuses/filter.json";

pub const RULES_PATH: &str = "/tweets/search/stream/rules";
pub const VALIDATE_RULES_PATH: &str = "/tweets/search/stream/rules?dry_run=true";
pub const STREAM_PATH: &str = "/tweets/search/stream";

/// Remote operations exposed by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    AddRules,
    DeleteRules,
    ValidateRules,
    ListRules,
    OpenStream,
    /// OAuth1-signed `statuses/filter` stream. Addressed by absolute URL.
    OpenLegacyStream,
}

impl Operation {
    pub fn method(self) -> Method {
        match self {
            Operation::AddRules | Operation::DeleteRules | Operation::ValidateRules => Method::POST,
            Operation::ListRules | Operation::OpenStream | Operation::OpenLegacyStream => {
                Method::GET
            }
        }
    }

    /// Path relative to the API base. `None` for the legacy stream.
    pub fn path(self) -> Option<&'static str> {
        match self {
            Operation::AddRules | Operation::DeleteRules | Operation::ListRules => {
                Some(RULES_PATH)
            }
            Operation::ValidateRules => Some(VALIDATE_RULES_PATH),
            Operation::OpenStream => Some(STREAM_PATH),
            Operation::OpenLegacyStream => None,
        }
    }

    pub fn success_status(self) -> StatusCode {
        match self {
            Operation::AddRules | Operation::ValidateRules => StatusCode::CREATED,
            Operation::DeleteRules
            | Operation::ListRules
            | Operation::OpenStream
            | Operation::OpenLegacyStream => StatusCode::OK,
        }
    }

    pub fn is_streaming(self) -> bool {
        matches!(self, Operation::OpenStream | Operation::OpenLegacyStream)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Operation::AddRules => "add rules",
            Operation::DeleteRules => "delete rules",
            Operation::ValidateRules => "validate rules",
            Operation::ListRules => "list rules",
            Operation::OpenStream => "open stream",
            Operation::OpenLegacyStream => "open legacy stream",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Base URLs the session resolves operations against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiEndpoints {
    pub base_url: String,
    pub legacy_stream_url: String,
}

impl Default for ApiEndpoints {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            legacy_stream_url: DEFAULT_LEGACY_STREAM_URL.to_string(),
        }
    }
}

impl ApiEndpoints {
    /// Absolute URL for an operation, without caller-supplied query parameters.
    pub fn url_for(&self, operation: Operation) -> String {
        match operation.path() {
            Some(path) => format!("{}{}", self.base_url.trim_end_matches('/'), path),
            None => self.legacy_stream_url.clone(),
        }
    }
}
