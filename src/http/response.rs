//! `ReqwestHttpResponse`: a `reqwest::Response` behind the toolkit's response contract.

use std::io;

use futures_util::TryStreamExt;
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::{StatusCode, Url};
use tokio_util::io::StreamReader;

use crate::client::{HttpResponse, ResponseBody};

const DEFAULT_CHARSET: &str = "UTF-8";

/// Response of a [`crate::http::ReqwestHttpClient`] call.
///
/// Status and headers are copied out up front; the body stays with the
/// wrapped response until [`HttpResponse::response_stream`] opens it.
pub struct ReqwestHttpResponse {
    status: StatusCode,
    headers: HeaderMap,
    url: Url,
    response: Option<reqwest::Response>,
    body: Option<ResponseBody>,
}

impl ReqwestHttpResponse {
    pub(crate) fn new(response: reqwest::Response) -> Self {
        Self {
            status: response.status(),
            headers: response.headers().clone(),
            url: response.url().clone(),
            response: Some(response),
            body: None,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Final URL of the response.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Release the body and the connection behind it.
    pub fn dispose(self) {
        tracing::trace!(
            url = %self.url,
            status = self.status.as_u16(),
            body_opened = self.body.is_some(),
            "Disposing response"
        );
    }
}

impl HttpResponse for ReqwestHttpResponse {
    fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    fn response_header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    fn response_stream(&mut self) -> &mut ResponseBody {
        let response = self.response.take();
        self.body.get_or_insert_with(|| -> ResponseBody {
            match response {
                Some(response) => Box::pin(StreamReader::new(
                    response.bytes_stream().map_err(io::Error::other),
                )),
                None => Box::pin(tokio::io::empty()),
            }
        })
    }

    fn response_charset(&self) -> String {
        self.headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(charset_of)
            .unwrap_or_else(|| DEFAULT_CHARSET.to_string())
    }

    fn dispose(self: Box<Self>) {
        ReqwestHttpResponse::dispose(*self)
    }
}

impl std::fmt::Debug for ReqwestHttpResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestHttpResponse")
            .field("status", &self.status)
            .field("url", &self.url.as_str())
            .field("body_opened", &self.body.is_some())
            .finish()
    }
}

/// `charset` parameter of a media type, e.g. `text/xml; charset="ISO-8859-1"`.
fn charset_of(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        if !key.trim().eq_ignore_ascii_case("charset") {
            return None;
        }
        let value = value.trim().trim_matches('"');
        (!value.is_empty()).then(|| value.to_uppercase())
    })
}
