//! Defaults shared by the client and its configuration.

use std::time::Duration;

/// Product name announced in the `User-Agent` header.
pub const PRODUCT_NAME: &str = "GeoTools";

/// Default connect, read and write timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default size of the connection pool.
pub const DEFAULT_MAX_CONNECTIONS: usize = 5;

/// How long an idle pooled connection is kept alive.
pub const DEFAULT_KEEP_ALIVE: Duration = Duration::from_secs(5 * 60);

/// Maximum number of authentication follow-ups for a single call.
pub const MAX_FOLLOW_UPS: usize = 20;

/// `User-Agent` value for a client implementation.
pub fn user_agent(client_name: &str) -> String {
    format!(
        "{}/{} ({})",
        PRODUCT_NAME,
        env!("CARGO_PKG_VERSION"),
        client_name
    )
}
