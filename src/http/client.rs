//! `ReqwestHttpClient`: the toolkit's client contracts on top of `reqwest`.
//!
//! Connection pooling, TLS, proxy tunneling and HTTP framing are left to
//! `reqwest`. This type only builds requests, answers `401` challenges through
//! the configured authenticator, and wraps responses.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT_ENCODING, AUTHORIZATION, CONTENT_TYPE, USER_AGENT,
};
use reqwest::{Client, Method, StatusCode, Url};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::auth::{AuthChallenge, Authentication, Authenticator, BasicAuthenticator};
use crate::client::{ConnectionPooling, HttpClient, HttpProxy, HttpResponse};
use crate::error::HttpError;
use crate::http::config::{HttpClientConfig, ProxyConfig, ProxySettings};
use crate::http::response::ReqwestHttpResponse;
use crate::network::{user_agent, MAX_FOLLOW_UPS};

/// HTTP client backed by a pooled `reqwest::Client`.
///
/// Settings that `reqwest` fixes at build time (timeouts, pool, gzip, proxy)
/// rebuild the inner client when changed.
///
/// The connect timeout bounds establishing a connection and the read timeout
/// bounds every wait for data from the server, the response head included.
/// The write timeout bounds how long sent data may stay unacknowledged.
pub struct ReqwestHttpClient {
    config: HttpClientConfig,
    authentication: Authentication,
    client: Client,
    user_agent: HeaderValue,
}

impl ReqwestHttpClient {
    /// Name announced in the `User-Agent` header and used by the factory.
    pub const NAME: &'static str = "ReqwestHttpClient";

    pub fn new() -> Result<Self, HttpError> {
        Self::with_config(HttpClientConfig::default())
    }

    pub fn with_config(config: HttpClientConfig) -> Result<Self, HttpError> {
        let user_agent = HeaderValue::from_str(&user_agent(Self::NAME))
            .map_err(|e| HttpError::invalid_header(USER_AGENT.as_str(), e))?;

        Ok(Self {
            client: build_client(&config)?,
            config,
            authentication: Authentication::None,
            user_agent,
        })
    }

    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    pub fn authentication(&self) -> &Authentication {
        &self.authentication
    }

    /// Answer `401` challenges with `authenticator`, replacing any Basic credentials.
    pub fn set_authenticator(&mut self, authenticator: impl Authenticator + 'static) {
        self.authentication = Authentication::Custom(Arc::new(authenticator));
    }

    pub fn clear_authenticator(&mut self) {
        self.authentication = Authentication::None;
    }

    pub fn write_timeout(&self) -> Duration {
        self.config.write_timeout
    }

    pub fn set_write_timeout(&mut self, timeout: Duration) -> Result<(), HttpError> {
        self.config.write_timeout = timeout;
        self.rebuild()
    }

    pub fn set_proxy(&mut self, proxy: ProxySettings) -> Result<(), HttpError> {
        self.config.proxy = proxy;
        self.rebuild()
    }

    fn rebuild(&mut self) -> Result<(), HttpError> {
        self.client = build_client(&self.config)?;
        tracing::debug!(config = ?self.config, "Rebuilt HTTP client");
        Ok(())
    }

    fn set_basic(&mut self, user: Option<&str>, password: Option<&str>) {
        self.authentication = Authentication::Basic(BasicAuthenticator::new(user, password));
    }

    fn request_headers(&self, extra: &HashMap<String, String>) -> Result<HeaderMap, HttpError> {
        let mut headers = HeaderMap::new();

        if !self.config.try_gzip {
            headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("identity"));
        }

        for (name, value) in extra {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| HttpError::invalid_header(name, e))?;
            let header_value =
                HeaderValue::from_str(value).map_err(|e| HttpError::invalid_header(name, e))?;
            headers.append(header_name, header_value);
        }

        // Always ours, whatever the caller asked for.
        headers.insert(USER_AGENT, self.user_agent.clone());
        Ok(headers)
    }

    /// Send the request, re-sending it while the authenticator answers `401`s.
    async fn execute(
        &self,
        method: Method,
        url: &Url,
        mut headers: HeaderMap,
        body: Option<Vec<u8>>,
    ) -> Result<ReqwestHttpResponse, HttpError> {
        let mut follow_ups = 0;

        loop {
            let response = self.dispatch(&method, url, &headers, body.clone()).await?;
            if response.status() != StatusCode::UNAUTHORIZED {
                return Ok(ReqwestHttpResponse::new(response));
            }

            let Some(authenticator) = self.authentication.authenticator() else {
                return Ok(ReqwestHttpResponse::new(response));
            };

            let credential = authenticator.authenticate(&AuthChallenge {
                method: &method,
                url,
                request_headers: &headers,
                status: response.status(),
                response_headers: response.headers(),
            });

            match credential {
                Some(credential) if follow_ups < MAX_FOLLOW_UPS => {
                    follow_ups += 1;
                    tracing::debug!(
                        %method,
                        %url,
                        follow_up = follow_ups,
                        "Retrying request with credentials"
                    );
                    headers.insert(AUTHORIZATION, credential);
                }
                Some(_) => {
                    tracing::warn!(%url, follow_ups, "Too many authentication follow-ups");
                    return Err(HttpError::TooManyFollowUps {
                        url: url.to_string(),
                        follow_ups,
                    });
                }
                None => return Ok(ReqwestHttpResponse::new(response)),
            }
        }
    }

    async fn dispatch(
        &self,
        method: &Method,
        url: &Url,
        headers: &HeaderMap,
        body: Option<Vec<u8>>,
    ) -> Result<reqwest::Response, HttpError> {
        let mut request = self
            .client
            .request(method.clone(), url.clone())
            .headers(headers.clone());
        if let Some(body) = body {
            request = request.body(body);
        }

        Ok(request.send().await?)
    }
}

impl std::fmt::Debug for ReqwestHttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestHttpClient")
            .field("config", &self.config)
            .field("authentication", &self.authentication)
            .finish()
    }
}

fn build_client(config: &HttpClientConfig) -> Result<Client, HttpError> {
    let mut builder = Client::builder()
        .connect_timeout(config.connect_timeout)
        .read_timeout(config.read_timeout)
        .pool_max_idle_per_host(config.max_connections)
        .pool_idle_timeout(config.keep_alive)
        .gzip(config.try_gzip)
        // Proxies come from `config.proxy` only.
        .no_proxy();

    #[cfg(any(target_os = "android", target_os = "fuchsia", target_os = "linux"))]
    {
        builder = builder.tcp_user_timeout(config.write_timeout);
    }

    let routes = config.proxy.resolve()?;
    for (scheme, proxy) in [("http", routes.http), ("https", routes.https)] {
        if let Some(proxy) = proxy {
            builder = builder.proxy(routing_proxy(scheme, proxy));
        }
    }

    Ok(builder.build()?)
}

/// A `reqwest::Proxy` for `scheme` targets that skips hosts on the no-proxy list.
fn routing_proxy(scheme: &'static str, config: ProxyConfig) -> reqwest::Proxy {
    let ProxyConfig {
        url: proxy_url,
        username,
        password,
        no_proxy,
    } = config;

    let proxy = reqwest::Proxy::custom(move |url: &Url| {
        if url.scheme() != scheme {
            return None;
        }
        match url.host_str() {
            Some(host) if !no_proxy.matches(host) => Some(proxy_url.clone()),
            _ => None,
        }
    });

    match (username, password) {
        (Some(username), Some(password)) => proxy.basic_auth(&username, &password),
        _ => proxy,
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get_with_headers(
        &self,
        url: &Url,
        headers: &HashMap<String, String>,
    ) -> Result<Box<dyn HttpResponse>, HttpError> {
        let headers = self.request_headers(headers)?;
        let response = self.execute(Method::GET, url, headers, None).await?;
        Ok(Box::new(response))
    }

    async fn post(
        &self,
        url: &Url,
        content: &mut (dyn AsyncRead + Send + Unpin),
        content_type: &str,
    ) -> Result<Box<dyn HttpResponse>, HttpError> {
        // Buffered so the body can be replayed after an auth challenge.
        let mut body = Vec::new();
        content.read_to_end(&mut body).await?;

        let mut headers = self.request_headers(&HashMap::new())?;
        let content_type = HeaderValue::from_str(content_type)
            .map_err(|e| HttpError::invalid_header(CONTENT_TYPE.as_str(), e))?;
        headers.insert(CONTENT_TYPE, content_type);

        let response = self.execute(Method::POST, url, headers, Some(body)).await?;
        Ok(Box::new(response))
    }

    fn user(&self) -> Option<&str> {
        self.authentication.basic().and_then(BasicAuthenticator::user)
    }

    fn set_user(&mut self, user: Option<&str>) -> Result<(), HttpError> {
        let password = self.password().map(str::to_string);
        self.set_basic(user, password.as_deref());
        Ok(())
    }

    fn password(&self) -> Option<&str> {
        self.authentication
            .basic()
            .and_then(BasicAuthenticator::password)
    }

    fn set_password(&mut self, password: Option<&str>) -> Result<(), HttpError> {
        let user = self.user().map(str::to_string);
        self.set_basic(user.as_deref(), password);
        Ok(())
    }

    fn connect_timeout(&self) -> Duration {
        self.config.connect_timeout
    }

    fn set_connect_timeout(&mut self, timeout: Duration) -> Result<(), HttpError> {
        self.config.connect_timeout = timeout;
        self.rebuild()
    }

    fn read_timeout(&self) -> Duration {
        self.config.read_timeout
    }

    fn set_read_timeout(&mut self, timeout: Duration) -> Result<(), HttpError> {
        self.config.read_timeout = timeout;
        self.rebuild()
    }

    fn try_gzip(&self) -> bool {
        self.config.try_gzip
    }

    fn set_try_gzip(&mut self, try_gzip: bool) -> Result<(), HttpError> {
        self.config.try_gzip = try_gzip;
        self.rebuild()
    }

    fn close(&mut self) -> Result<(), HttpError> {
        tracing::debug!("Closing HTTP client");
        Ok(())
    }
}

impl ConnectionPooling for ReqwestHttpClient {
    fn max_connections(&self) -> usize {
        self.config.max_connections
    }

    fn set_max_connections(&mut self, max_connections: usize) -> Result<(), HttpError> {
        self.config.max_connections = max_connections;
        self.rebuild()
    }
}

impl HttpProxy for ReqwestHttpClient {}
