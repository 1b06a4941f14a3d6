// Copyright 2026 The Filterstream Project
// SPDX-License-Identifier: Apache-2.0

use crate::auth::Credentials;
use crate::endpoint::ApiEndpoints;

/// Parsed and validated client config.
#[derive(Debug, Clone)]
pub struct Config {
    /// Config format version. Always "v1".
    pub version: String,
    pub endpoints: ApiEndpoints,
    /// Exactly one credential kind, with `${VAR}` references resolved.
    pub credentials: Credentials,
}
