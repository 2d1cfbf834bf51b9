//! Minimal URL handling for redirect targets.
//!
//! Just enough parsing to carry a `Location` header value to the connector:
//! scheme, host, optional port, path. Userinfo, query fragments and IPv6
//! literals are not modeled. An unparseable value yields `None`, which the
//! dispatcher treats as a missing redirect target.

use core::fmt::Write as _;

use heapless::String;

/// Maximum length of a URL host.
pub const MAX_HOST_LEN: usize = 128;
/// Maximum length of a URL path.
pub const MAX_PATH_LEN: usize = 128;

/// A parsed absolute `http`/`https` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Url {
    /// Host name or address literal.
    pub host: String<MAX_HOST_LEN>,
    /// TCP port, defaulted from the scheme when absent.
    pub port: u16,
    /// Absolute path, `/` when the URL has none.
    pub path: String<MAX_PATH_LEN>,
    /// Whether the scheme was `https`.
    pub is_tls: bool,
}

impl Url {
    /// Parse an absolute URL. Returns `None` for anything that is not a
    /// well-formed `http://` or `https://` URL that fits the capacity
    /// limits.
    pub fn parse(text: &str) -> Option<Url> {
        let text = text.trim();
        let (rest, is_tls) = if let Some(rest) = text.strip_prefix("http://") {
            (rest, false)
        } else if let Some(rest) = text.strip_prefix("https://") {
            (rest, true)
        } else {
            return None;
        };

        let (authority, path) = match rest.find('/') {
            Some(i) => (&rest[..i], &rest[i..]),
            None => (rest, "/"),
        };
        if authority.is_empty() {
            return None;
        }

        let (host, port) = match authority.rsplit_once(':') {
            Some((host, port)) => (host, port.parse::<u16>().ok()?),
            None => (authority, if is_tls { 443 } else { 80 }),
        };
        if host.is_empty() {
            return None;
        }

        Some(Url {
            host: String::try_from(host).ok()?,
            port,
            path: String::try_from(path).ok()?,
            is_tls,
        })
    }

    /// `host:port`, the remote string handed to the connector.
    pub fn authority(&self) -> String<{ MAX_HOST_LEN + 6 }> {
        let mut out = String::new();
        // Host and port both fit by construction.
        let _ = write!(out, "{}:{}", self.host, self.port);
        out
    }

    /// The value for the `Host` request header: the port is included only
    /// when it differs from the scheme default.
    pub fn host_header(&self) -> String<{ MAX_HOST_LEN + 6 }> {
        let default_port = if self.is_tls { 443 } else { 80 };
        let mut out = String::new();
        if self.port == default_port {
            let _ = out.push_str(self.host.as_str());
        } else {
            let _ = write!(out, "{}:{}", self.host, self.port);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_host_port_path() {
        let url = Url::parse("http://example.com:8080/a/b").unwrap();
        assert_eq!(url.host.as_str(), "example.com");
        assert_eq!(url.port, 8080);
        assert_eq!(url.path.as_str(), "/a/b");
        assert!(!url.is_tls);
    }

    #[test]
    fn defaults_port_and_path() {
        let url = Url::parse("https://example.com").unwrap();
        assert_eq!(url.port, 443);
        assert_eq!(url.path.as_str(), "/");
        assert!(url.is_tls);
        assert_eq!(url.host_header().as_str(), "example.com");
    }

    #[test]
    fn rejects_relative_and_unknown_schemes() {
        assert!(Url::parse("/relative/path").is_none());
        assert!(Url::parse("ftp://example.com/").is_none());
        assert!(Url::parse("http://").is_none());
    }

    #[test]
    fn authority_always_carries_port() {
        let url = Url::parse("http://device.local/cfg").unwrap();
        assert_eq!(url.authority().as_str(), "device.local:80");
    }
}
