//! HTTP authentication collaborator.
//!
//! Holds the credentials supplied by the caller and the scheme learned from
//! a `WWW-Authenticate` challenge. The engine retries a challenged request
//! at most once per exchange; the `retried` flag here is what bounds it.

use base64ct::{Base64, Encoding as B64Encoding};
use heapless::String;

use crate::error::Error;

/// Maximum length of a username or password.
pub const MAX_CREDENTIAL_LEN: usize = 64;

/// Caller-supplied credentials for authenticated requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// The user name.
    pub username: String<MAX_CREDENTIAL_LEN>,
    /// The password, if any.
    pub password: Option<String<MAX_CREDENTIAL_LEN>>,
}

/// Authentication scheme negotiated with the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    /// No scheme negotiated; a 401 will not be retried.
    None,
    /// HTTP Basic authentication.
    Basic,
}

#[cfg(feature = "defmt")]
impl defmt::Format for Scheme {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Scheme::None => defmt::write!(f, "None"),
            Scheme::Basic => defmt::write!(f, "Basic"),
        }
    }
}

/// Authentication state carried by the session.
#[derive(Debug)]
pub(crate) struct Auth {
    pub credentials: Option<Credentials>,
    pub scheme: Scheme,
    /// Set when a 401 has already triggered a resend this exchange.
    pub retried: bool,
}

impl Auth {
    pub fn new() -> Self {
        Self {
            credentials: None,
            scheme: Scheme::None,
            retried: false,
        }
    }

    /// Record the scheme from a `WWW-Authenticate` challenge value.
    ///
    /// Only `Basic` is supported; any other scheme leaves the state at
    /// `None`, which in turn suppresses the authentication retry.
    pub fn on_challenge(&mut self, value: &str) {
        let scheme = value.trim_start().split_whitespace().next().unwrap_or("");
        if scheme.eq_ignore_ascii_case("basic") {
            self.scheme = Scheme::Basic;
        } else {
            self.scheme = Scheme::None;
        }
    }

    /// Whether a 401 response is worth retrying with credentials attached.
    pub fn can_retry(&self) -> bool {
        self.credentials.is_some() && self.scheme != Scheme::None && !self.retried
    }

    /// Build the value of the `Authorization` header for the current
    /// credentials, e.g. `Basic dXNlcjpwYXNz`.
    pub fn authorization_value(&self) -> Result<String<192>, Error> {
        let creds = self.credentials.as_ref().ok_or(Error::InvalidHeader)?;

        let mut userinfo: String<{ 2 * MAX_CREDENTIAL_LEN + 1 }> = String::new();
        userinfo
            .push_str(creds.username.as_str())
            .map_err(|_| Error::BufferFull)?;
        userinfo.push(':').map_err(|_| Error::BufferFull)?;
        if let Some(password) = creds.password.as_ref() {
            userinfo
                .push_str(password.as_str())
                .map_err(|_| Error::BufferFull)?;
        }

        let mut encoded = [0u8; 180];
        let encoded = Base64::encode(userinfo.as_bytes(), &mut encoded)
            .map_err(|_| Error::BufferFull)?;

        let mut value: String<192> = String::new();
        value.push_str("Basic ").map_err(|_| Error::BufferFull)?;
        value.push_str(encoded).map_err(|_| Error::BufferFull)?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn challenge_selects_basic() {
        let mut auth = Auth::new();
        auth.on_challenge("Basic realm=\"x\"");
        assert_eq!(auth.scheme, Scheme::Basic);
    }

    #[test]
    fn unknown_scheme_disables_retry() {
        let mut auth = Auth::new();
        auth.credentials = Some(Credentials {
            username: String::try_from("user").unwrap(),
            password: None,
        });
        auth.on_challenge("Digest realm=\"x\", nonce=\"y\"");
        assert_eq!(auth.scheme, Scheme::None);
        assert!(!auth.can_retry());
    }

    #[test]
    fn authorization_value_encodes_userinfo() {
        let mut auth = Auth::new();
        auth.credentials = Some(Credentials {
            username: String::try_from("user").unwrap(),
            password: Some(String::try_from("pass").unwrap()),
        });
        auth.on_challenge("Basic realm=\"x\"");
        let value = auth.authorization_value().unwrap();
        assert_eq!(value.as_str(), "Basic dXNlcjpwYXNz");
    }

    #[test]
    fn missing_password_still_has_colon() {
        let mut auth = Auth::new();
        auth.credentials = Some(Credentials {
            username: String::try_from("u").unwrap(),
            password: None,
        });
        let value = auth.authorization_value().unwrap();
        // "u:" in base64
        assert_eq!(value.as_str(), "Basic dTo=");
    }
}
