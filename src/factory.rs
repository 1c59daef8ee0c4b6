//! Client factory and the logging decorator it can wrap clients in.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use tokio::io::AsyncRead;

use crate::client::{ConnectionPooling, HttpClient, HttpResponse};
use crate::error::HttpError;
use crate::http::ReqwestHttpClient;

/// Optional capabilities a caller can require from a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpBehavior {
    ConnectionPooling,
    Proxy,
}

/// Creates clients for the toolkit.
pub trait HttpClientFactory {
    /// Names of the clients this factory creates.
    fn client_names(&self) -> &[&'static str];

    fn supports(&self, behaviors: &[HttpBehavior]) -> bool;

    /// Whether this factory should serve a request for `requested` (any client
    /// when `None`) with the given behaviors.
    fn can_process(&self, requested: Option<&str>, behaviors: &[HttpBehavior]) -> bool {
        let known = |name: &str| self.client_names().iter().any(|n| *n == name);
        requested.map_or(true, known) && self.supports(behaviors)
    }

    fn create_client(
        &self,
        behaviors: &[HttpBehavior],
    ) -> Result<Box<dyn ConnectionPooling>, HttpError>;

    fn create_logging(&self, client: Box<dyn ConnectionPooling>) -> Box<dyn ConnectionPooling>;

    fn create(
        &self,
        behaviors: &[HttpBehavior],
        logging: bool,
    ) -> Result<Box<dyn ConnectionPooling>, HttpError> {
        let client = self.create_client(behaviors)?;
        Ok(if logging {
            self.create_logging(client)
        } else {
            client
        })
    }
}

/// Factory for [`ReqwestHttpClient`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ReqwestHttpClientFactory;

impl HttpClientFactory for ReqwestHttpClientFactory {
    fn client_names(&self) -> &[&'static str] {
        &[ReqwestHttpClient::NAME]
    }

    fn supports(&self, behaviors: &[HttpBehavior]) -> bool {
        behaviors.iter().all(|behavior| {
            matches!(
                behavior,
                HttpBehavior::ConnectionPooling | HttpBehavior::Proxy
            )
        })
    }

    fn create_client(
        &self,
        _behaviors: &[HttpBehavior],
    ) -> Result<Box<dyn ConnectionPooling>, HttpError> {
        Ok(Box::new(ReqwestHttpClient::new()?))
    }

    fn create_logging(&self, client: Box<dyn ConnectionPooling>) -> Box<dyn ConnectionPooling> {
        Box::new(LoggingHttpClient::new(client))
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Logging decorator
// ═════════════════════════════════════════════════════════════════════════════

/// Logs every request and response summary, delegating the work.
pub struct LoggingHttpClient {
    delegate: Box<dyn ConnectionPooling>,
}

impl LoggingHttpClient {
    pub fn new(delegate: Box<dyn ConnectionPooling>) -> Self {
        Self { delegate }
    }

    pub fn into_inner(self) -> Box<dyn ConnectionPooling> {
        self.delegate
    }
}

fn log_response(
    method: &str,
    url: &Url,
    result: &Result<Box<dyn HttpResponse>, HttpError>,
) {
    match result {
        Ok(response) => tracing::info!(
            method,
            %url,
            status = response.status_code(),
            content_type = response.content_type().unwrap_or(""),
            "HTTP response"
        ),
        Err(e) => tracing::info!(method, %url, error = %e, "HTTP request failed"),
    }
}

#[async_trait]
impl HttpClient for LoggingHttpClient {
    async fn get_with_headers(
        &self,
        url: &Url,
        headers: &HashMap<String, String>,
    ) -> Result<Box<dyn HttpResponse>, HttpError> {
        tracing::info!(%url, headers = ?headers, "GET");
        let result = self.delegate.get_with_headers(url, headers).await;
        log_response("GET", url, &result);
        result
    }

    async fn post(
        &self,
        url: &Url,
        content: &mut (dyn AsyncRead + Send + Unpin),
        content_type: &str,
    ) -> Result<Box<dyn HttpResponse>, HttpError> {
        tracing::info!(%url, content_type, "POST");
        let result = self.delegate.post(url, content, content_type).await;
        log_response("POST", url, &result);
        result
    }

    fn user(&self) -> Option<&str> {
        self.delegate.user()
    }

    fn set_user(&mut self, user: Option<&str>) -> Result<(), HttpError> {
        self.delegate.set_user(user)
    }

    fn password(&self) -> Option<&str> {
        self.delegate.password()
    }

    fn set_password(&mut self, password: Option<&str>) -> Result<(), HttpError> {
        self.delegate.set_password(password)
    }

    fn connect_timeout(&self) -> Duration {
        self.delegate.connect_timeout()
    }

    fn set_connect_timeout(&mut self, timeout: Duration) -> Result<(), HttpError> {
        self.delegate.set_connect_timeout(timeout)
    }

    fn read_timeout(&self) -> Duration {
        self.delegate.read_timeout()
    }

    fn set_read_timeout(&mut self, timeout: Duration) -> Result<(), HttpError> {
        self.delegate.set_read_timeout(timeout)
    }

    fn try_gzip(&self) -> bool {
        self.delegate.try_gzip()
    }

    fn set_try_gzip(&mut self, try_gzip: bool) -> Result<(), HttpError> {
        self.delegate.set_try_gzip(try_gzip)
    }

    fn close(&mut self) -> Result<(), HttpError> {
        self.delegate.close()
    }
}

impl ConnectionPooling for LoggingHttpClient {
    fn max_connections(&self) -> usize {
        self.delegate.max_connections()
    }

    fn set_max_connections(&mut self, max_connections: usize) -> Result<(), HttpError> {
        self.delegate.set_max_connections(max_connections)
    }
}
