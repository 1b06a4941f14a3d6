// Copyright 2026 The Filterstream Project
// SPDX-License-Identifier: Apache-2.0

// Raw YAML deserialization types (internal).
// Interpolation and validation happen between these and the public `Config`.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfig {
    pub filterstream: String,
    pub api: Option<RawApiConfig>,
    pub auth: Option<RawAuthConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawApiConfig {
    pub base_url: Option<String>,
    pub legacy_stream_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawAuthConfig {
    pub bearer_token: Option<String>,
    pub oauth1: Option<RawOAuth1Config>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawOAuth1Config {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_token: String,
    pub access_token_secret: String,
}
