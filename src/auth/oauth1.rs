// Copyright 2026 The Filterstream Project
// SPDX-License-Identifier: Apache-2.0

// OAuth 1.0a request signing (HMAC-SHA1), used by the legacy
// `statuses/filter` stream.
//
// Signing is done by `oauth1_request`. This module only adapts a request
// URL to what the signer expects: the base URI without its query, plus the
// query pairs as request parameters in sorted order.

use oauth1_request::serializer::{Serializer, SerializerExt};
use oauth1_request::{Builder, Request, Token, HMAC_SHA1};
use rand::distributions::Alphanumeric;
use rand::Rng;
use reqwest::Method;
use std::fmt;
use std::num::NonZeroU64;
use url::Url;

use super::AuthError;

const NONCE_LEN: usize = 32;

/// Consumer and access key pairs for the OAuth1 scheme.
#[derive(Clone, PartialEq, Eq)]
pub struct OAuth1Keys {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_token: String,
    pub access_token_secret: String,
}

impl fmt::Debug for OAuth1Keys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuth1Keys")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"<redacted>")
            .field("access_token", &self.access_token)
            .field("access_token_secret", &"<redacted>")
            .finish()
    }
}

/// Query pairs of the request URL, decoded and sorted.
struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    fn from_url(url: &Url) -> Self {
        let mut pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        pairs.sort();
        QueryParams(pairs)
    }
}

impl Request for QueryParams {
    fn serialize<S: Serializer>(&self, mut serializer: S) -> S::Output {
        // oauth_* protocol params sit at their sorted position among the rest.
        let mut oauth_written = false;
        for (key, value) in &self.0 {
            if !oauth_written && key.as_str() >= "oauth_" {
                serializer.serialize_oauth_parameters();
                oauth_written = true;
            }
            serializer.serialize_parameter(key, value);
        }
        if !oauth_written {
            serializer.serialize_oauth_parameters();
        }
        serializer.end()
    }
}

/// `scheme://host[:port]/path`. `Url` already omits default ports.
fn base_uri(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{}://{}:{}{}", url.scheme(), host, port, url.path()),
        None => format!("{}://{}{}", url.scheme(), host, url.path()),
    }
}

/// Sign a request with a caller-chosen nonce and timestamp and return the
/// full `Authorization` header value.
pub fn sign(
    keys: &OAuth1Keys,
    method: &Method,
    url: &str,
    nonce: &str,
    timestamp: u64,
) -> Result<String, AuthError> {
    let parsed = Url::parse(url).map_err(|source| AuthError::InvalidUrl {
        url: url.to_string(),
        source,
    })?;
    let timestamp = NonZeroU64::new(timestamp)
        .ok_or_else(|| AuthError::Signing("timestamp must be positive".into()))?;

    let token = Token::from_parts(
        keys.consumer_key.as_str(),
        keys.consumer_secret.as_str(),
        keys.access_token.as_str(),
        keys.access_token_secret.as_str(),
    );
    let mut builder = Builder::with_token(token, HMAC_SHA1);
    builder.nonce(nonce).timestamp(timestamp).version(true);

    Ok(builder.authorize(method.as_str(), base_uri(&parsed), &QueryParams::from_url(&parsed)))
}

/// Sign a request with a fresh nonce and the current time.
pub fn authorization_header(keys: &OAuth1Keys, method: &Method, url: &str) -> Result<String, AuthError> {
    let nonce: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(NONCE_LEN)
        .map(char::from)
        .collect();
    let now = u64::try_from(chrono::Utc::now().timestamp())
        .map_err(|e| AuthError::Signing(format!("system clock before epoch: {e}")))?;
    sign(keys, method, url, &nonce, now)
}
