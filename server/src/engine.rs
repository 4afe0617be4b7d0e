use axum::http::header::{self, HeaderMap, HeaderValue};
use axum::http::uri::InvalidUri;
use axum::http::{Method, Request, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use serde::de::IgnoredAny;
use thiserror::Error;
use tracing::error;

pub const KEYPRESS_PATH: &str = "/tetris/keypress";
pub const BOARD_PATH: &str = "/tetris/board";

/// Headers copied from the engine's board response onto ours.
pub const MIRRORED_CACHE_HEADERS: [header::HeaderName; 2] = [header::AGE, header::CACHE_CONTROL];

#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("invalid engine url `{url}`: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: InvalidUri,
    },
    #[error("failed to build engine request: {0}")]
    Build(#[from] axum::http::Error),
    #[error("engine request failed: {0}")]
    Request(#[from] hyper_util::client::legacy::Error),
    #[error("failed to read engine response: {0}")]
    Body(#[from] hyper::Error),
    #[error("engine responded with {0}")]
    Status(StatusCode),
    #[error("engine response is not JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

impl IntoResponse for ForwardError {
    fn into_response(self) -> Response {
        error!(error = %self, "engine call failed");
        (StatusCode::BAD_GATEWAY, self.to_string()).into_response()
    }
}

/// A successful engine response: its body, already checked to be JSON, and
/// the headers it came with.
#[derive(Debug, Clone)]
pub struct Forwarded {
    pub body: Bytes,
    pub headers: HeaderMap,
}

impl Forwarded {
    /// The engine's body byte for byte, labelled as JSON.
    pub fn into_json_response(self, extra_headers: HeaderMap) -> Response {
        (
            extra_headers,
            [(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))],
            self.body,
        )
            .into_response()
    }

    pub fn cache_headers(&self) -> HeaderMap {
        let mut mirrored = HeaderMap::new();
        for name in MIRRORED_CACHE_HEADERS {
            if let Some(value) = self.headers.get(&name) {
                mirrored.insert(name, value.clone());
            }
        }
        mirrored
    }
}

/// HTTP client for the Tetris engine. No retries and no timeouts beyond the
/// client defaults.
#[derive(Clone)]
pub struct EngineClient {
    base_url: String,
    client: Client<HttpConnector, Full<Bytes>>,
}

impl EngineClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: Client::builder(TokioExecutor::new()).build_http(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Uri, ForwardError> {
        let url = format!("{}{}", self.base_url, path);
        url.parse()
            .map_err(|source| ForwardError::InvalidUrl { url, source })
    }

    /// POSTs `body` to the engine's keypress endpoint as-is.
    pub async fn forward_keypress(&self, body: Bytes) -> Result<Forwarded, ForwardError> {
        let request = Request::builder()
            .method(Method::POST)
            .uri(self.endpoint(KEYPRESS_PATH)?)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Full::new(body))?;
        let response = self.client.request(request).await?;
        read_json(response).await
    }

    pub async fn load_board(&self) -> Result<Forwarded, ForwardError> {
        let request = Request::builder()
            .method(Method::GET)
            .uri(self.endpoint(BOARD_PATH)?)
            .body(Full::new(Bytes::new()))?;
        let response = self.client.request(request).await?;
        read_json(response).await
    }
}

async fn read_json(
    response: axum::http::Response<hyper::body::Incoming>,
) -> Result<Forwarded, ForwardError> {
    let (parts, body) = response.into_parts();
    let bytes = body.collect().await?.to_bytes();
    if !parts.status.is_success() {
        return Err(ForwardError::Status(parts.status));
    }
    serde_json::from_slice::<IgnoredAny>(&bytes)?;
    Ok(Forwarded {
        body: bytes,
        headers: parts.headers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_drops_trailing_slash() {
        let client = EngineClient::new("http://127.0.0.1:8000/");
        assert_eq!(client.base_url(), "http://127.0.0.1:8000");
        assert_eq!(
            client.endpoint(KEYPRESS_PATH).unwrap(),
            "http://127.0.0.1:8000/tetris/keypress"
        );
    }

    #[test]
    fn unparsable_base_url_is_reported() {
        let client = EngineClient::new("http://bad host");
        assert!(matches!(
            client.endpoint(BOARD_PATH),
            Err(ForwardError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn cache_headers_keep_only_age_and_cache_control() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AGE, HeaderValue::from_static("3"));
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("max-age=10"));
        headers.insert(header::SERVER, HeaderValue::from_static("uvicorn"));
        let forwarded = Forwarded {
            body: Bytes::new(),
            headers,
        };

        let mirrored = forwarded.cache_headers();
        assert_eq!(mirrored.len(), 2);
        assert_eq!(mirrored[header::AGE], "3");
        assert_eq!(mirrored[header::CACHE_CONTROL], "max-age=10");
    }

    #[test]
    fn json_response_keeps_body_bytes_and_extra_headers() {
        let forwarded = Forwarded {
            body: Bytes::from_static(br#"{"z":1,"a":2}"#),
            headers: HeaderMap::new(),
        };
        let mut extra = HeaderMap::new();
        extra.insert(header::AGE, HeaderValue::from_static("1"));

        let response = forwarded.into_json_response(extra);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
        assert_eq!(response.headers()[header::AGE], "1");
    }

    #[test]
    fn status_errors_become_bad_gateway() {
        let response = ForwardError::Status(StatusCode::INTERNAL_SERVER_ERROR).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
