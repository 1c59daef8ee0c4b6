//! Toolkit-facing contracts: `HttpClient`, `ConnectionPooling`, `HttpProxy`, `HttpResponse`.
//!
//! The surrounding toolkit programs against these traits only. Implementations
//! plug a concrete HTTP library in behind them (see [`crate::http`]).

use std::collections::HashMap;
use std::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use tokio::io::AsyncRead;

use crate::error::HttpError;

/// Body of a response, readable at most once.
pub type ResponseBody = Pin<Box<dyn AsyncRead + Send>>;

/// A pluggable HTTP client.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// GET `url` without extra headers.
    async fn get(&self, url: &Url) -> Result<Box<dyn HttpResponse>, HttpError> {
        self.get_with_headers(url, &HashMap::new()).await
    }

    /// GET `url`, adding `headers` to the request.
    async fn get_with_headers(
        &self,
        url: &Url,
        headers: &HashMap<String, String>,
    ) -> Result<Box<dyn HttpResponse>, HttpError>;

    /// POST everything read from `content` to `url` as `content_type`.
    async fn post(
        &self,
        url: &Url,
        content: &mut (dyn AsyncRead + Send + Unpin),
        content_type: &str,
    ) -> Result<Box<dyn HttpResponse>, HttpError>;

    fn user(&self) -> Option<&str>;

    fn set_user(&mut self, user: Option<&str>) -> Result<(), HttpError>;

    fn password(&self) -> Option<&str>;

    fn set_password(&mut self, password: Option<&str>) -> Result<(), HttpError>;

    fn connect_timeout(&self) -> Duration;

    fn set_connect_timeout(&mut self, timeout: Duration) -> Result<(), HttpError>;

    fn read_timeout(&self) -> Duration;

    fn set_read_timeout(&mut self, timeout: Duration) -> Result<(), HttpError>;

    /// Whether responses may be transparently gzip-compressed.
    fn try_gzip(&self) -> bool;

    fn set_try_gzip(&mut self, try_gzip: bool) -> Result<(), HttpError>;

    /// Release the client. Responses already handed out stay readable.
    fn close(&mut self) -> Result<(), HttpError>;
}

/// A client backed by a connection pool of configurable size.
pub trait ConnectionPooling: HttpClient {
    fn max_connections(&self) -> usize;

    fn set_max_connections(&mut self, max_connections: usize) -> Result<(), HttpError>;
}

/// A client that routes requests through the configured proxy, honoring the
/// no-proxy host list.
pub trait HttpProxy: HttpClient {}

/// Response handed back by an [`HttpClient`].
///
/// The caller owns the response and must release it, either through
/// [`HttpResponse::dispose`] or by dropping it, so the underlying connection
/// goes back to the pool.
pub trait HttpResponse: Send {
    fn status_code(&self) -> u16;

    /// Value of the first `name` header, if present and valid text.
    fn response_header(&self, name: &str) -> Option<&str>;

    fn content_type(&self) -> Option<&str> {
        self.response_header("Content-Type")
    }

    /// The body stream. Opened on first call; later calls return the same stream.
    fn response_stream(&mut self) -> &mut ResponseBody;

    /// Charset named by the content type, `UTF-8` when absent.
    fn response_charset(&self) -> String;

    fn dispose(self: Box<Self>);
}
