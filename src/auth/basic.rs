//! HTTP Basic authentication.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::HeaderValue;

use super::{AuthChallenge, Authenticator};

/// `Basic <base64(user:password)>` header value.
pub fn basic_credential(user: &str, password: &str) -> String {
    let encoded = STANDARD.encode(format!("{}:{}", user, password));
    format!("Basic {}", encoded)
}

/// Answers challenges with a Basic credential built from user and password.
///
/// Either half may be missing while the client is being configured; no
/// credential is offered until both are set.
#[derive(Clone, Default)]
pub struct BasicAuthenticator {
    user: Option<String>,
    password: Option<String>,
    credential: Option<HeaderValue>,
}

impl BasicAuthenticator {
    pub fn new(user: Option<&str>, password: Option<&str>) -> Self {
        let credential = match (user, password) {
            (Some(user), Some(password)) => {
                HeaderValue::from_str(&basic_credential(user, password))
                    .ok()
                    .map(|mut value| {
                        value.set_sensitive(true);
                        value
                    })
            }
            _ => None,
        };

        Self {
            user: user.map(str::to_string),
            password: password.map(str::to_string),
            credential,
        }
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    /// Whether both user and password are set.
    pub fn is_complete(&self) -> bool {
        self.credential.is_some()
    }
}

impl Authenticator for BasicAuthenticator {
    fn authenticate(&self, challenge: &AuthChallenge<'_>) -> Option<HeaderValue> {
        if challenge.has_authorization() {
            // Already tried these credentials.
            return None;
        }

        tracing::debug!(
            url = %challenge.url(),
            status = challenge.status().as_u16(),
            "Authenticating for response"
        );
        for c in challenge.challenges() {
            tracing::debug!(challenge = %c, "Challenge");
        }

        self.credential.clone()
    }
}

impl fmt::Debug for BasicAuthenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuthenticator")
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}
