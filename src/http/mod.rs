//! reqwest adapter: `ReqwestHttpClient`, its configuration and response wrapper.

pub mod client;
pub mod config;
pub mod response;

pub use client::ReqwestHttpClient;
pub use config::{
    HttpClientConfig, HttpClientConfigBuilder, NoProxyList, ProxyConfig, ProxyRoutes,
    ProxySettings,
};
pub use response::ReqwestHttpResponse;
