// Copyright 2026 The Filterstream Project
// SPDX-License-Identifier: Apache-2.0

// HTTP transport seam.
//
// The session never talks to reqwest directly: it builds an `HttpRequest` and
// hands it to an injected `HttpSender`. Tests swap in a capturing sender to
// assert on request shape without a network.

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures_util::stream::{Stream, StreamExt, TryStreamExt};
use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use std::pin::Pin;

// ---------------------------------------------------------------------------
// Transport types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
    /// Return the body as a byte stream instead of buffering it.
    pub stream: bool,
}

pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, HttpError>> + Send>>;

pub enum HttpBody {
    Full(Bytes),
    Stream(ByteStream),
}

impl HttpBody {
    /// Buffer the whole body. Used for error bodies on streaming requests.
    pub async fn into_bytes(self) -> Result<Bytes, HttpError> {
        match self {
            HttpBody::Full(bytes) => Ok(bytes),
            HttpBody::Stream(mut stream) => {
                let mut buf = BytesMut::new();
                while let Some(chunk) = stream.next().await {
                    buf.extend_from_slice(&chunk?);
                }
                Ok(buf.freeze())
            }
        }
    }

    pub fn into_stream(self) -> ByteStream {
        match self {
            HttpBody::Full(bytes) => {
                let once = futures_util::stream::once(async move { Ok::<_, HttpError>(bytes) });
                Box::pin(once)
            }
            HttpBody::Stream(stream) => stream,
        }
    }
}

impl std::fmt::Debug for HttpBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HttpBody::Full(bytes) => f.debug_tuple("Full").field(&bytes.len()).finish(),
            HttpBody::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

#[derive(Debug)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: HttpBody,
}

#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("request timed out: {0}")]
    Timeout(String),
}

// ---------------------------------------------------------------------------
// Interface
// ---------------------------------------------------------------------------

/// Sends HTTP requests to the platform API.
#[async_trait]
pub trait HttpSender: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError>;
}

// ---------------------------------------------------------------------------
// Reqwest HTTP sender
// ---------------------------------------------------------------------------

/// Default sender. Transport settings (TLS, pooling, timeouts) are whatever
/// the supplied `reqwest::Client` was built with.
pub struct ReqwestHttpSender {
    client: reqwest::Client,
}

impl ReqwestHttpSender {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for ReqwestHttpSender {
    fn default() -> Self {
        Self::new(reqwest::Client::new())
    }
}

fn map_reqwest_error(e: reqwest::Error) -> HttpError {
    if e.is_timeout() {
        HttpError::Timeout(e.to_string())
    } else {
        HttpError::Transport(e.to_string())
    }
}

#[async_trait]
impl HttpSender for ReqwestHttpSender {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        let mut req = self
            .client
            .request(request.method, &request.url)
            .headers(request.headers);

        if let Some(body) = request.body {
            req = req.body(body);
        }

        let resp = req.send().await.map_err(map_reqwest_error)?;

        let status = resp.status();
        let headers = resp.headers().clone();

        if request.stream {
            let stream = resp.bytes_stream().map_err(map_reqwest_error);
            Ok(HttpResponse {
                status,
                headers,
                body: HttpBody::Stream(Box::pin(stream)),
            })
        } else {
            let body = resp.bytes().await.map_err(map_reqwest_error)?;
            Ok(HttpResponse {
                status,
                headers,
                body: HttpBody::Full(body),
            })
        }
    }
}
