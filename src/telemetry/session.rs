//! Bearer-token session.
//!
//! The token is opaque: nothing here decodes it or tracks its lifetime. It is
//! kept until the service rejects it, at which point the uplink calls
//! [`Session::invalidate`] and the next [`Session::ensure_authenticated`]
//! logs in again.

use super::Api;
use crate::config::Credentials;
use crate::network::Connect;
use crate::network::application::http::{Header, MAX_BODY_LEN, Method, Request};
use crate::network::error::Error;
use core::fmt;
use heapless::{String, Vec};
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};

/// Login path of the service.
pub const LOGIN_PATH: &str = "/api/auth/login/employee";
/// Longest token that can be stored.
pub const MAX_TOKEN_LEN: usize = 512;

const MAX_LOGIN_BODY_LEN: usize = 256;

/// Why a login did not produce a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    /// The login exchange failed at the connection or HTTP level.
    Connection(Error),
    /// The credentials did not fit into the request body.
    Encode,
    /// The reply was not the expected JSON.
    Malformed,
    /// The service answered `"success": false`.
    Rejected,
    /// The service answered `"success": true` without `data.token`.
    MissingToken,
    /// The token is longer than [`MAX_TOKEN_LEN`].
    TokenTooLong,
}

#[cfg(feature = "defmt")]
impl defmt::Format for AuthError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            AuthError::Connection(e) => defmt::write!(f, "Connection({})", e),
            AuthError::Encode => defmt::write!(f, "Encode"),
            AuthError::Malformed => defmt::write!(f, "Malformed"),
            AuthError::Rejected => defmt::write!(f, "Rejected"),
            AuthError::MissingToken => defmt::write!(f, "MissingToken"),
            AuthError::TokenTooLong => defmt::write!(f, "TokenTooLong"),
        }
    }
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginReply {
    success: bool,
    #[serde(default)]
    data: Option<LoginData>,
}

#[derive(Deserialize)]
struct LoginData {
    #[serde(default)]
    token: Option<Token>,
}

/// `data.token` after JSON unescaping.
enum Token {
    Fits(String<MAX_TOKEN_LEN>),
    TooLong,
}

impl<'de> Deserialize<'de> for Token {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TokenVisitor;

        impl Visitor<'_> for TokenVisitor {
            type Value = Token;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a token string")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Token, E> {
                Ok(String::try_from(v).map_or(Token::TooLong, Token::Fits))
            }
        }

        deserializer.deserialize_str(TokenVisitor)
    }
}

/// Owns the bearer token and the credentials used to obtain it.
pub struct Session<'a> {
    credentials: Credentials<'a>,
    token: Option<String<MAX_TOKEN_LEN>>,
}

impl<'a> Session<'a> {
    /// A session without a token.
    pub const fn new(credentials: Credentials<'a>) -> Self {
        Self {
            credentials,
            token: None,
        }
    }

    /// The current token, if any.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Whether a token is held. Says nothing about whether the service still
    /// accepts it.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Forgets the token. Calling it without a token is a no-op.
    pub fn invalidate(&mut self) {
        if self.token.take().is_some() {
            debug!("session token discarded");
        }
    }

    /// Logs in unless a token is already held.
    ///
    /// On failure the session is left without a token.
    pub fn ensure_authenticated<C: Connect>(&mut self, api: &mut Api<'_, C>) -> Result<(), AuthError> {
        if self.token.is_some() {
            return Ok(());
        }

        match self.login(api) {
            Ok(token) => {
                info!("logged in as {}", self.credentials.username);
                self.token = Some(token);
                Ok(())
            }
            Err(e) => {
                warn!("login as {} failed: {:?}", self.credentials.username, e);
                Err(e)
            }
        }
    }

    fn login<C: Connect>(&self, api: &mut Api<'_, C>) -> Result<String<MAX_TOKEN_LEN>, AuthError> {
        let body: Vec<u8, MAX_LOGIN_BODY_LEN> = serde_json_core::to_vec(&LoginRequest {
            username: self.credentials.username,
            password: self.credentials.password,
        })
        .map_err(|_| AuthError::Encode)?;

        let headers = [Header::new("Content-Type", "application/json")];
        let request = Request {
            method: Method::Post,
            path: LOGIN_PATH,
            headers: &headers,
            body: Some(body.as_slice()),
        };
        let response = api.exchange(&request).map_err(AuthError::Connection)?;

        // Escaped strings are unescaped into this buffer; the body bounds it.
        let mut unescaped = [0u8; MAX_BODY_LEN];
        let (reply, _) =
            serde_json_core::from_slice_escaped::<LoginReply>(&response.body, &mut unescaped)
                .map_err(|_| AuthError::Malformed)?;
        if !reply.success {
            return Err(AuthError::Rejected);
        }
        match reply.data.and_then(|data| data.token) {
            Some(Token::Fits(token)) if !token.is_empty() => Ok(token),
            Some(Token::TooLong) => Err(AuthError::TokenTooLong),
            _ => Err(AuthError::MissingToken),
        }
    }
}

impl core::fmt::Debug for Session<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Session")
            .field("username", &self.credentials.username)
            .field("authenticated", &self.token.is_some())
            .finish()
    }
}
