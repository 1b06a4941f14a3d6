// Copyright 2026 The Filterstream Project
// SPDX-License-Identifier: Apache-2.0

// Session: credentials + endpoints + HTTP sender.
//
// Rule operations are single request/response round trips. Stream operations
// return an owned `LineReader`; the session itself never holds a connection,
// so one session can be shared across tasks.

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::{AuthError, Credentials};
use crate::config::Config;
use crate::endpoint::{ApiEndpoints, Operation};
use crate::error::ClientError;
use crate::rules::{
    AddRulesRequest, AddRulesResponse, DeleteRulesRequest, DeleteRulesResponse,
    ListRulesResponse, Rule, ValidateRulesResponse,
};
use crate::stream::LineReader;
use crate::transport::{HttpRequest, HttpResponse, HttpSender, ReqwestHttpSender};

pub struct Session {
    credentials: Credentials,
    endpoints: ApiEndpoints,
    http: Arc<dyn HttpSender>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("credentials", &self.credentials)
            .field("endpoints", &self.endpoints)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Session against the public API with a default `reqwest::Client`.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            endpoints: ApiEndpoints::default(),
            http: Arc::new(ReqwestHttpSender::default()),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.credentials.clone()).with_endpoints(config.endpoints.clone())
    }

    pub fn with_endpoints(mut self, endpoints: ApiEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn with_sender(mut self, http: Arc<dyn HttpSender>) -> Self {
        self.http = http;
        self
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn endpoints(&self) -> &ApiEndpoints {
        &self.endpoints
    }

    // -----------------------------------------------------------------------
    // Rule management
    // -----------------------------------------------------------------------

    /// Create rules. Expects 201. Rules the server refuses are reported in
    /// `errors`, not as an `Err`.
    pub async fn add_rules(&self, rules: &[Rule]) -> Result<AddRulesResponse, ClientError> {
        let body = encode(&AddRulesRequest { add: rules })?;
        self.round_trip(Operation::AddRules, Some(body)).await
    }

    /// Delete rules by id. Expects 200.
    pub async fn delete_rules(&self, ids: &[String]) -> Result<DeleteRulesResponse, ClientError> {
        let body = encode(&DeleteRulesRequest::new(ids))?;
        self.round_trip(Operation::DeleteRules, Some(body)).await
    }

    /// Dry-run an add. Same body as `add_rules`, sent to `?dry_run=true`, so
    /// live rules are never touched. Expects 201.
    pub async fn validate_rules(&self, rules: &[Rule]) -> Result<ValidateRulesResponse, ClientError> {
        let body = encode(&AddRulesRequest { add: rules })?;
        self.round_trip(Operation::ValidateRules, Some(body)).await
    }

    pub async fn list_rules(&self) -> Result<ListRulesResponse, ClientError> {
        self.round_trip(Operation::ListRules, None).await
    }

    // -----------------------------------------------------------------------
    // Streaming
    // -----------------------------------------------------------------------

    /// Open the filtered stream. No timeout is applied; the reader stays open
    /// until the server closes it or the caller drops it.
    pub async fn open_stream(&self) -> Result<LineReader, ClientError> {
        let url = self.endpoints.url_for(Operation::OpenStream);
        self.open(Operation::OpenStream, url).await
    }

    /// Open the OAuth1-signed `statuses/filter` stream with form parameters
    /// such as `track`, `follow` or `locations`.
    pub async fn open_legacy_stream<K, V>(&self, params: &[(K, V)]) -> Result<LineReader, ClientError>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.credentials
            .require(Operation::OpenLegacyStream, "oauth1")?;

        let base = self.endpoints.url_for(Operation::OpenLegacyStream);
        let mut url = url::Url::parse(&base).map_err(|source| AuthError::InvalidUrl {
            url: base.clone(),
            source,
        })?;
        if !params.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(params.iter().map(|(k, v)| (k.as_ref(), v.as_ref())));
        }
        self.open(Operation::OpenLegacyStream, url.into()).await
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    async fn round_trip<T: DeserializeOwned>(
        &self,
        operation: Operation,
        body: Option<Bytes>,
    ) -> Result<T, ClientError> {
        let url = self.endpoints.url_for(operation);
        let response = self.dispatch(operation, url, body).await?;
        let status = response.status;
        let bytes = response.body.into_bytes().await?;

        if status != operation.success_status() {
            return Err(unexpected_status(operation, status, &bytes));
        }

        serde_json::from_slice(&bytes).map_err(|source| ClientError::Decode {
            operation,
            source,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }

    async fn open(&self, operation: Operation, url: String) -> Result<LineReader, ClientError> {
        let response = self.dispatch(operation, url, None).await?;
        let status = response.status;

        if status != operation.success_status() {
            let bytes = response.body.into_bytes().await?;
            return Err(unexpected_status(operation, status, &bytes));
        }

        tracing::info!(operation = %operation, "stream open");
        Ok(LineReader::from_body(response.body))
    }

    async fn dispatch(
        &self,
        operation: Operation,
        url: String,
        body: Option<Bytes>,
    ) -> Result<HttpResponse, ClientError> {
        let method = operation.method();
        let request_id = Uuid::new_v4().to_string();

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, self.credentials.authorization(&method, &url)?);
        if body.is_some() {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        tracing::debug!(
            %request_id,
            operation = %operation,
            %method,
            %url,
            auth = self.credentials.kind(),
            "sending request"
        );

        let response = self
            .http
            .send(HttpRequest {
                method,
                url,
                headers,
                body,
                stream: operation.is_streaming(),
            })
            .await
            .map_err(|e| {
                tracing::warn!(%request_id, operation = %operation, error = %e, "transport failure");
                ClientError::Transport(e)
            })?;

        tracing::debug!(
            %request_id,
            operation = %operation,
            status = response.status.as_u16(),
            "response received"
        );

        Ok(response)
    }
}

fn encode<T: Serialize>(value: &T) -> Result<Bytes, ClientError> {
    serde_json::to_vec(value)
        .map(Bytes::from)
        .map_err(ClientError::Encode)
}

fn unexpected_status(operation: Operation, status: reqwest::StatusCode, body: &[u8]) -> ClientError {
    let body = String::from_utf8_lossy(body).into_owned();
    tracing::warn!(
        operation = %operation,
        status = status.as_u16(),
        expected = operation.success_status().as_u16(),
        "unexpected status"
    );
    ClientError::UnexpectedStatus {
        operation,
        status,
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::OAuth1Keys;
    use crate::transport::{HttpBody, HttpError};
    use async_trait::async_trait;
    use reqwest::{Method, StatusCode};
    use serde_json::json;
    use std::sync::Mutex;

    // -----------------------------------------------------------------------
    // Test doubles
    // -----------------------------------------------------------------------

    /// Records every request and answers with a fixed status and body.
    struct CapturingSender {
        status: StatusCode,
        body: Bytes,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl CapturingSender {
        fn new(status: StatusCode, body: &str) -> Arc<Self> {
            Arc::new(Self {
                status,
                body: Bytes::copy_from_slice(body.as_bytes()),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn last(&self) -> HttpRequest {
            self.requests.lock().unwrap().last().cloned().expect("no request sent")
        }

        fn last_json(&self) -> serde_json::Value {
            let body = self.last().body.expect("request had no body");
            serde_json::from_slice(&body).unwrap()
        }
    }

    #[async_trait]
    impl HttpSender for CapturingSender {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
            let stream = request.stream;
            self.requests.lock().unwrap().push(request);
            let body = if stream {
                let chunks: Vec<Result<Bytes, HttpError>> = self
                    .body
                    .chunks(3)
                    .map(|c| Ok(Bytes::copy_from_slice(c)))
                    .collect();
                HttpBody::Stream(Box::pin(futures_util::stream::iter(chunks)))
            } else {
                HttpBody::Full(self.body.clone())
            };
            Ok(HttpResponse {
                status: self.status,
                headers: HeaderMap::new(),
                body,
            })
        }
    }

    struct RefusingSender;

    #[async_trait]
    impl HttpSender for RefusingSender {
        async fn send(&self, _request: HttpRequest) -> Result<HttpResponse, HttpError> {
            Err(HttpError::Transport("connection refused".into()))
        }
    }

    fn session(sender: Arc<dyn HttpSender>) -> Session {
        Session::new(Credentials::bearer("test-token")).with_sender(sender)
    }

    fn oauth_session(sender: Arc<dyn HttpSender>) -> Session {
        Session::new(Credentials::oauth1(OAuth1Keys {
            consumer_key: "ck".into(),
            consumer_secret: "cs".into(),
            access_token: "at".into(),
            access_token_secret: "ats".into(),
        }))
        .with_sender(sender)
    }

    const ADD_OK: &str = r#"{"data":[{"value":"cat","tag":"cats","id":"101"}],
        "meta":{"sent":"2021-02-01T17:15:16.587Z",
                "summary":{"created":1,"not_created":0,"valid":1,"invalid":0}}}"#;

    // -----------------------------------------------------------------------
    // Add
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn add_rules_sends_add_envelope() {
        let sender = CapturingSender::new(StatusCode::CREATED, ADD_OK);
        let s = session(sender.clone());

        let resp = s.add_rules(&[Rule::new("cat", "cats")]).await.unwrap();
        assert_eq!(resp.meta.summary.created, 1);
        assert_eq!(resp.data[0].id, "101");

        let req = sender.last();
        assert_eq!(req.method, Method::POST);
        assert_eq!(req.url, "https://api.twitter.com/2/tweets/search/stream/rules");
        assert_eq!(req.headers[AUTHORIZATION], "Bearer test-token");
        assert_eq!(req.headers[CONTENT_TYPE], "application/json");
        assert!(!req.stream);
        assert_eq!(sender.last_json(), json!({"add": [{"value": "cat", "tag": "cats"}]}));
    }

    #[tokio::test]
    async fn add_rules_403_keeps_status_and_body() {
        let body = r#"{"title":"Forbidden","detail":"client-not-enrolled"}"#;
        let s = session(CapturingSender::new(StatusCode::FORBIDDEN, body));

        let err = s.add_rules(&[Rule::new("cat", "")]).await.unwrap_err();
        match &err {
            ClientError::UnexpectedStatus {
                operation,
                status,
                body: got,
            } => {
                assert_eq!(*operation, Operation::AddRules);
                assert_eq!(*status, StatusCode::FORBIDDEN);
                assert_eq!(got, body);
            }
            other => panic!("expected UnexpectedStatus, got {other:?}"),
        }
        assert!(err.is_auth_failure());
    }

    #[tokio::test]
    async fn add_rules_200_is_not_success() {
        let s = session(CapturingSender::new(StatusCode::OK, ADD_OK));
        let err = s.add_rules(&[Rule::new("cat", "")]).await.unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::OK));
    }

    #[tokio::test]
    async fn add_rules_non_json_is_decode_error() {
        let s = session(CapturingSender::new(StatusCode::CREATED, "<html>oops</html>"));
        let err = s.add_rules(&[Rule::new("cat", "")]).await.unwrap_err();
        match err {
            ClientError::Decode { operation, body, .. } => {
                assert_eq!(operation, Operation::AddRules);
                assert_eq!(body, "<html>oops</html>");
            }
            other => panic!("expected Decode, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn transport_failure_propagates() {
        let s = session(Arc::new(RefusingSender));
        let err = s.list_rules().await.unwrap_err();
        assert!(matches!(err, ClientError::Transport(HttpError::Transport(_))));
    }

    // -----------------------------------------------------------------------
    // Delete / validate / list
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn delete_rules_sends_delete_envelope() {
        let sender = CapturingSender::new(
            StatusCode::OK,
            r#"{"meta":{"sent":"2021-02-01T17:15:16.587Z","summary":{"deleted":2,"not_deleted":0}}}"#,
        );
        let s = session(sender.clone());

        let ids = vec!["101".to_string(), "102".to_string()];
        let resp = s.delete_rules(&ids).await.unwrap();
        assert_eq!(resp.meta.summary.deleted, 2);

        let req = sender.last();
        assert_eq!(req.method, Method::POST);
        assert!(req.url.ends_with("/tweets/search/stream/rules"));
        assert_eq!(sender.last_json(), json!({"delete": {"ids": ["101", "102"]}}));
    }

    #[tokio::test]
    async fn validate_rules_targets_dry_run() {
        let sender = CapturingSender::new(StatusCode::CREATED, ADD_OK);
        let s = session(sender.clone());

        let resp = s.validate_rules(&[Rule::new("cat", "cats")]).await.unwrap();
        assert_eq!(resp.data[0].value, "cat");

        let req = sender.last();
        assert_eq!(req.method, Method::POST);
        let url = url::Url::parse(&req.url).unwrap();
        assert_eq!(url.path(), "/2/tweets/search/stream/rules");
        assert_eq!(url.query(), Some("dry_run=true"));
        assert_eq!(sender.last_json(), json!({"add": [{"value": "cat", "tag": "cats"}]}));
    }

    #[tokio::test]
    async fn list_rules_is_a_bodyless_get() {
        let sender = CapturingSender::new(
            StatusCode::OK,
            r#"{"data":[{"id":"101","value":"cat","tag":"cats"}],"meta":{"sent":"2021-02-01T17:15:16.587Z","result_count":1}}"#,
        );
        let s = session(sender.clone());

        let resp = s.list_rules().await.unwrap();
        assert_eq!(resp.data, vec![Rule { id: "101".into(), value: "cat".into(), tag: "cats".into() }]);

        let req = sender.last();
        assert_eq!(req.method, Method::GET);
        assert!(req.body.is_none());
        assert!(req.headers.get(CONTENT_TYPE).is_none());
    }

    #[tokio::test]
    async fn custom_endpoints_are_used() {
        let sender = CapturingSender::new(StatusCode::OK, r#"{"meta":{}}"#);
        let s = session(sender.clone()).with_endpoints(ApiEndpoints {
            base_url: "http://127.0.0.1:9/2".into(),
            ..ApiEndpoints::default()
        });
        s.list_rules().await.unwrap();
        assert_eq!(sender.last().url, "http://127.0.0.1:9/2/tweets/search/stream/rules");
    }

    // -----------------------------------------------------------------------
    // Streams
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn open_stream_returns_line_reader() {
        let sender = CapturingSender::new(StatusCode::OK, "{\"a\":1}\r\n\r\n{\"b\":2}\r\n");
        let s = session(sender.clone());

        let mut reader = s.open_stream().await.unwrap();
        let mut lines = Vec::new();
        while let Some(line) = reader.next_line().await.unwrap() {
            lines.push(line);
        }
        assert_eq!(lines, vec![r#"{"a":1}"#, "", r#"{"b":2}"#]);

        let req = sender.last();
        assert_eq!(req.method, Method::GET);
        assert_eq!(req.url, "https://api.twitter.com/2/tweets/search/stream");
        assert!(req.stream);
        assert!(req.body.is_none());
        assert_eq!(req.headers[AUTHORIZATION], "Bearer test-token");
    }

    #[tokio::test]
    async fn open_stream_rejects_non_200() {
        let body = r#"{"title":"ConnectionException","detail":"This stream is currently at the maximum allowed connection limit."}"#;
        let s = session(CapturingSender::new(StatusCode::TOO_MANY_REQUESTS, body));
        let err = s.open_stream().await.unwrap_err();
        assert!(err.is_rate_limited());
        assert!(err.to_string().contains("maximum allowed connection limit"));
    }

    #[tokio::test]
    async fn legacy_stream_requires_oauth1() {
        let sender = CapturingSender::new(StatusCode::OK, "");
        let s = session(sender.clone());
        let err = s.open_legacy_stream(&[("track", "rust")]).await.unwrap_err();
        assert!(matches!(err, ClientError::Auth(_)));
        assert!(sender.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn legacy_stream_is_signed_with_params_in_query() {
        let sender = CapturingSender::new(StatusCode::OK, "{\"text\":\"hi\"}\r\n");
        let s = oauth_session(sender.clone());

        let mut reader = s
            .open_legacy_stream(&[("track", "rust lang"), ("language", "en")])
            .await
            .unwrap();
        assert_eq!(reader.next_line().await.unwrap().as_deref(), Some(r#"{"text":"hi"}"#));

        let req = sender.last();
        assert_eq!(
            req.url,
            "https://stream.twitter.com/1.1/statuses/filter.json?track=rust+lang&language=en"
        );
        let auth = req.headers[AUTHORIZATION].to_str().unwrap();
        assert!(auth.starts_with("OAuth "), "got: {auth}");
        assert!(auth.contains(r#"oauth_consumer_key="ck""#));
    }

    #[tokio::test]
    async fn legacy_stream_params_extend_existing_query() {
        let sender = CapturingSender::new(StatusCode::OK, "");
        let s = oauth_session(sender.clone()).with_endpoints(ApiEndpoints {
            legacy_stream_url: "https://stream.example.com/1.1/statuses/filter.json?delimited=length"
                .into(),
            ..ApiEndpoints::default()
        });

        s.open_legacy_stream(&[("track", "rust")]).await.unwrap();
        assert_eq!(
            sender.last().url,
            "https://stream.example.com/1.1/statuses/filter.json?delimited=length&track=rust"
        );

        s.open_legacy_stream::<&str, &str>(&[]).await.unwrap();
        assert_eq!(
            sender.last().url,
            "https://stream.example.com/1.1/statuses/filter.json?delimited=length"
        );
    }

    #[tokio::test]
    async fn legacy_stream_with_unparseable_url_sends_nothing() {
        let sender = CapturingSender::new(StatusCode::OK, "");
        let s = oauth_session(sender.clone()).with_endpoints(ApiEndpoints {
            legacy_stream_url: "not a url".into(),
            ..ApiEndpoints::default()
        });
        let err = s.open_legacy_stream(&[("track", "rust")]).await.unwrap_err();
        assert!(matches!(err, ClientError::Auth(AuthError::InvalidUrl { .. })), "got {err:?}");
        assert!(sender.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn session_is_shareable_across_tasks() {
        let sender = CapturingSender::new(StatusCode::OK, r#"{"meta":{"result_count":0}}"#);
        let s = Arc::new(session(sender.clone()));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let s = s.clone();
            handles.push(tokio::spawn(async move { s.list_rules().await.map(|r| r.meta.result_count) }));
        }
        for h in handles {
            assert_eq!(h.await.unwrap().unwrap(), 0);
        }
        assert_eq!(sender.requests.lock().unwrap().len(), 8);
    }
}
