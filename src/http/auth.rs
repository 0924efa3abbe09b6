//! Pluggable token sources for request authentication
//!
//! The client attaches `Authorization: Bearer <token>` to outgoing requests
//! whenever its token provider yields one. [`NoAuth`] is the default:
//! requests go out unauthenticated until a real source is wired in.

use std::env;

/// Source of bearer tokens for outgoing requests.
///
/// Implementations are queried once per request, so a provider backed by a
/// rotating credential store always supplies the current token.
pub trait TokenProvider: Send + Sync {
    /// The current token, or `None` when unauthenticated.
    fn token(&self) -> Option<String>;
}

/// Token source that never yields a token.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAuth;

impl TokenProvider for NoAuth {
    fn token(&self) -> Option<String> {
        None
    }
}

/// Fixed token known at construction time.
#[derive(Debug, Clone)]
pub struct StaticToken {
    token: String,
}

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl TokenProvider for StaticToken {
    fn token(&self) -> Option<String> {
        Some(self.token.clone())
    }
}

/// Reads the token from an environment variable on every request.
#[derive(Debug, Clone)]
pub struct EnvToken {
    var: String,
}

impl EnvToken {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl TokenProvider for EnvToken {
    fn token(&self) -> Option<String> {
        env::var(&self.var).ok().filter(|token| !token.is_empty())
    }
}
