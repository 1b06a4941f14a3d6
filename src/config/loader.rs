// Copyright 2026 The Filterstream Project
// SPDX-License-Identifier: Apache-2.0

use crate::auth::{Credentials, OAuth1Keys};
use crate::endpoint::ApiEndpoints;

use super::error::ConfigError;
use super::interpolation::resolve_variables;
use super::raw;
use super::source::ConfigSource;
use super::types::Config;

const SUPPORTED_VERSION: &str = "v1";

/// Load and validate client config from the given source.
///
/// Steps:
/// 1. Read raw YAML from the source
/// 2. Parse into raw deserialization types
/// 3. Check the format version
/// 4. Resolve `${VAR}` references in URLs and credentials
/// 5. Require exactly one credential kind
pub fn load_config(source: &dyn ConfigSource) -> Result<Config, ConfigError> {
    let raw_yaml = source.load()?;
    let raw: raw::RawConfig = serde_yaml::from_str(&raw_yaml)?;

    if raw.filterstream != SUPPORTED_VERSION {
        return Err(ConfigError::Validation(format!(
            "unsupported config version \"{}\", expected \"{SUPPORTED_VERSION}\"",
            raw.filterstream
        )));
    }

    let endpoints = build_endpoints(raw.api)?;
    let credentials = build_credentials(raw.auth)?;

    tracing::debug!(
        source = %source.describe(),
        base_url = %endpoints.base_url,
        auth = credentials.kind(),
        "config loaded"
    );

    Ok(Config {
        version: raw.filterstream,
        endpoints,
        credentials,
    })
}

fn build_endpoints(raw: Option<raw::RawApiConfig>) -> Result<ApiEndpoints, ConfigError> {
    let mut endpoints = ApiEndpoints::default();
    let Some(raw) = raw else {
        return Ok(endpoints);
    };

    if let Some(base_url) = raw.base_url {
        endpoints.base_url = checked_url("api.base_url", &resolve_variables(&base_url)?)?;
    }
    if let Some(legacy) = raw.legacy_stream_url {
        endpoints.legacy_stream_url =
            checked_url("api.legacy_stream_url", &resolve_variables(&legacy)?)?;
    }
    Ok(endpoints)
}

fn checked_url(field: &str, value: &str) -> Result<String, ConfigError> {
    let url = url::Url::parse(value)
        .map_err(|e| ConfigError::Validation(format!("{field}: invalid URL \"{value}\": {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Validation(format!(
            "{field}: unsupported scheme \"{}\", expected http or https",
            url.scheme()
        )));
    }
    if url.query().is_some() {
        return Err(ConfigError::Validation(format!(
            "{field}: must not carry a query string"
        )));
    }
    Ok(value.to_string())
}

fn build_credentials(raw: Option<raw::RawAuthConfig>) -> Result<Credentials, ConfigError> {
    let raw = raw.ok_or_else(|| {
        ConfigError::Validation("missing auth section: set auth.bearer_token or auth.oauth1".into())
    })?;

    match (raw.bearer_token, raw.oauth1) {
        (Some(token), None) => {
            let token = non_empty("auth.bearer_token", resolve_variables(&token)?)?;
            Ok(Credentials::bearer(token))
        }
        (None, Some(keys)) => Ok(Credentials::oauth1(OAuth1Keys {
            consumer_key: non_empty("auth.oauth1.consumer_key", resolve_variables(&keys.consumer_key)?)?,
            consumer_secret: non_empty(
                "auth.oauth1.consumer_secret",
                resolve_variables(&keys.consumer_secret)?,
            )?,
            access_token: non_empty("auth.oauth1.access_token", resolve_variables(&keys.access_token)?)?,
            access_token_secret: non_empty(
                "auth.oauth1.access_token_secret",
                resolve_variables(&keys.access_token_secret)?,
            )?,
        })),
        (Some(_), Some(_)) => Err(ConfigError::Validation(
            "auth.bearer_token and auth.oauth1 are mutually exclusive".into(),
        )),
        (None, None) => Err(ConfigError::Validation(
            "auth section is empty: set auth.bearer_token or auth.oauth1".into(),
        )),
    }
}

fn non_empty(field: &str, value: String) -> Result<String, ConfigError> {
    if value.trim().is_empty() {
        Err(ConfigError::Validation(format!("{field} must not be empty")))
    } else {
        Ok(value)
    }
}
