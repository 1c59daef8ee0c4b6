//! # gt-http-reqwest
//!
//! A `reqwest`-backed implementation of the GeoTools pluggable HTTP client.
//!
//! ## Architecture
//!
//! The crate is organized in layers:
//!
//! 1. **Contracts**: `HttpClient`, `ConnectionPooling`, `HttpProxy`, `HttpResponse`
//! 2. **Auth**: `Authenticator` callbacks answering `401` challenges, Basic credentials
//! 3. **reqwest adapter**: `ReqwestHttpClient` + config, proxy routing, response wrapper
//! 4. **Factory**: `ReqwestHttpClientFactory` with an optional logging decorator
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use gt_http_reqwest::prelude::*;
//!
//! let mut client = ReqwestHttpClient::new()?;
//! client.set_user(Some("admin"))?;
//! client.set_password(Some("geoserver"))?;
//!
//! let url = Url::parse("http://localhost:8080/geoserver/wms?request=GetCapabilities")?;
//! let mut response = client.get(&url).await?;
//! let mut body = String::new();
//! response.response_stream().read_to_string(&mut body).await?;
//! response.dispose();
//! ```

// ── Layer 1: Contracts ───────────────────────────────────────────────────────

/// Toolkit-facing client and response traits.
pub mod client;

/// Adapter error types.
pub mod error;

/// Defaults and the `User-Agent` value.
pub mod network;

// ── Layer 2: Auth ────────────────────────────────────────────────────────────

/// Challenge parsing, authenticator callbacks, Basic credentials.
pub mod auth;

// ── Layer 3: reqwest adapter ─────────────────────────────────────────────────

/// `ReqwestHttpClient`, configuration, proxy routing, response wrapper.
pub mod http;

// ── Layer 4: Factory ─────────────────────────────────────────────────────────

/// Client factory and logging decorator.
pub mod factory;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    // Contracts
    pub use crate::client::{ConnectionPooling, HttpClient, HttpProxy, HttpResponse, ResponseBody};

    // Errors
    pub use crate::error::HttpError;

    // Auth
    pub use crate::auth::{
        basic_credential, AuthChallenge, Authentication, Authenticator, BasicAuthenticator,
        Challenge,
    };

    // reqwest adapter
    pub use crate::http::{
        HttpClientConfig, NoProxyList, ProxyConfig, ProxyRoutes, ProxySettings,
        ReqwestHttpClient, ReqwestHttpResponse,
    };

    // Factory
    pub use crate::factory::{
        HttpBehavior, HttpClientFactory, LoggingHttpClient, ReqwestHttpClientFactory,
    };

    pub use reqwest::header::HeaderValue;
    pub use reqwest::Url;
}
