//! Authentication: challenge view, authenticator callback, credential slot.
//!
//! ## Challenge flow
//!
//! When a response comes back `401 Unauthorized` and an authenticator is
//! configured, the client hands it an [`AuthChallenge`] describing the request
//! that was sent and the response that refused it. The authenticator returns
//! the `Authorization` value to retry with, or `None` to give up and let the
//! 401 through to the caller.
//!
//! Authenticators should give up when the challenged request already carried
//! an `Authorization` header, otherwise the client keeps retrying until the
//! follow-up cap is hit.

pub mod basic;

use std::fmt;
use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, WWW_AUTHENTICATE};
use reqwest::{Method, StatusCode, Url};

pub use basic::{basic_credential, BasicAuthenticator};

// ============================================================================
// Authenticator
// ============================================================================

/// Callback answering a `401` challenge.
pub trait Authenticator: Send + Sync {
    /// Returns the `Authorization` header value to retry with, or `None` to give up.
    fn authenticate(&self, challenge: &AuthChallenge<'_>) -> Option<HeaderValue>;
}

impl<F> Authenticator for F
where
    F: Fn(&AuthChallenge<'_>) -> Option<HeaderValue> + Send + Sync,
{
    fn authenticate(&self, challenge: &AuthChallenge<'_>) -> Option<HeaderValue> {
        self(challenge)
    }
}

/// The request that was challenged and the response that challenged it.
#[derive(Debug, Clone, Copy)]
pub struct AuthChallenge<'a> {
    pub(crate) method: &'a Method,
    pub(crate) url: &'a Url,
    pub(crate) request_headers: &'a HeaderMap,
    pub(crate) status: StatusCode,
    pub(crate) response_headers: &'a HeaderMap,
}

impl<'a> AuthChallenge<'a> {
    pub fn method(&self) -> &Method {
        self.method
    }

    pub fn url(&self) -> &Url {
        self.url
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn request_headers(&self) -> &HeaderMap {
        self.request_headers
    }

    pub fn response_headers(&self) -> &HeaderMap {
        self.response_headers
    }

    /// Whether the challenged request already carried credentials.
    pub fn has_authorization(&self) -> bool {
        self.request_headers.contains_key(AUTHORIZATION)
    }

    /// Challenges announced through `WWW-Authenticate`, in header order.
    pub fn challenges(&self) -> Vec<Challenge> {
        self.response_headers
            .get_all(WWW_AUTHENTICATE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(Challenge::parse_all)
            .collect()
    }
}

// ============================================================================
// Challenge parsing
// ============================================================================

/// One `WWW-Authenticate` challenge: a scheme plus its auth parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    pub scheme: String,
    /// Parameter names are lowercased; values are unquoted.
    pub params: Vec<(String, String)>,
}

impl Challenge {
    /// Parse the first challenge of a header value such as
    /// `Basic realm="Maps", charset="UTF-8"`.
    pub fn parse(value: &str) -> Option<Self> {
        Self::parse_all(value).into_iter().next()
    }

    /// Parse every challenge of a header value.
    ///
    /// A bare token starting a comma-separated element opens a new challenge,
    /// so `Basic realm="a", Bearer` yields two. A bare token right after the
    /// scheme is a token68 blob and is skipped.
    pub fn parse_all(value: &str) -> Vec<Self> {
        let mut challenges: Vec<Self> = Vec::new();
        let mut chars = value.chars().peekable();
        let mut new_element = true;

        loop {
            while let Some(&c) = chars.peek() {
                if c == ',' {
                    new_element = true;
                } else if !c.is_whitespace() {
                    break;
                }
                chars.next();
            }

            let mut token = String::new();
            while let Some(&c) = chars.peek() {
                if c == '=' || c == ',' || c.is_whitespace() {
                    break;
                }
                token.push(c);
                chars.next();
            }
            if token.is_empty() {
                // stray '=' with no name
                if chars.next().is_none() {
                    break;
                }
                continue;
            }

            while matches!(chars.peek(), Some(c) if c.is_whitespace()) {
                chars.next();
            }

            if chars.peek() == Some(&'=') {
                chars.next();
                let value = param_value(&mut chars);
                if let Some(current) = challenges.last_mut() {
                    current.params.push((token.to_ascii_lowercase(), value));
                }
            } else if new_element || challenges.is_empty() {
                challenges.push(Self {
                    scheme: token,
                    params: Vec::new(),
                });
            }
            new_element = false;
        }

        challenges
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn realm(&self) -> Option<&str> {
        self.param("realm")
    }
}

impl fmt::Display for Challenge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.scheme)?;
        for (i, (key, value)) in self.params.iter().enumerate() {
            let sep = if i == 0 { " " } else { ", " };
            write!(f, "{}{}=\"{}\"", sep, key, value)?;
        }
        Ok(())
    }
}

fn param_value(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    while matches!(chars.peek(), Some(c) if c.is_whitespace()) {
        chars.next();
    }

    let mut value = String::new();
    if chars.peek() == Some(&'"') {
        chars.next();
        while let Some(c) = chars.next() {
            match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        value.push(escaped);
                    }
                }
                '"' => break,
                _ => value.push(c),
            }
        }
    } else {
        while let Some(&c) = chars.peek() {
            if c == ',' {
                break;
            }
            value.push(c);
            chars.next();
        }
        value = value.trim_end().to_string();
    }
    value
}

// ============================================================================
// Credential slot
// ============================================================================

/// Which authenticator, if any, answers `401` challenges.
#[derive(Clone, Default)]
pub enum Authentication {
    #[default]
    None,
    Basic(BasicAuthenticator),
    Custom(Arc<dyn Authenticator>),
}

impl Authentication {
    pub fn authenticator(&self) -> Option<&dyn Authenticator> {
        match self {
            Self::None => None,
            Self::Basic(basic) => Some(basic as &dyn Authenticator),
            Self::Custom(custom) => Some(custom.as_ref()),
        }
    }

    pub fn basic(&self) -> Option<&BasicAuthenticator> {
        match self {
            Self::Basic(basic) => Some(basic),
            _ => None,
        }
    }
}

impl fmt::Debug for Authentication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Basic(basic) => f.debug_tuple("Basic").field(basic).finish(),
            Self::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}
