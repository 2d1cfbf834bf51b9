//! Cookie collaborator.
//!
//! A fixed-capacity jar that captures `Set-Cookie` / `Set-Cookie2` header
//! values and replays them on subsequent requests from the same client.
//! Attribute parsing is deliberately minimal: only the leading `name=value`
//! pair is kept; expiry, path and domain scoping are out of scope for a
//! single-origin embedded client.

use heapless::{String, Vec};

use crate::error::Error;

/// Maximum length of one stored `name=value` pair.
pub const MAX_COOKIE_LEN: usize = 128;
/// Maximum number of cookies stored per client.
pub const MAX_COOKIES: usize = 4;

/// Fixed-capacity cookie store.
#[derive(Debug, Default)]
pub struct CookieJar {
    cookies: Vec<String<MAX_COOKIE_LEN>, MAX_COOKIES>,
    /// Set when any cookie arrived via `Set-Cookie2`; the replayed header
    /// then carries the RFC 2965 version prefix.
    use_v2: bool,
}

impl CookieJar {
    /// Create an empty jar.
    pub const fn new() -> Self {
        Self {
            cookies: Vec::new(),
            use_v2: false,
        }
    }

    /// Whether the jar holds no cookies.
    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    /// Discard all stored cookies.
    pub fn clear(&mut self) {
        self.cookies.clear();
        self.use_v2 = false;
    }

    /// Record a cookie from a `Set-Cookie` (or `Set-Cookie2` when `is_v2`)
    /// header value. A cookie with the same name replaces the stored one.
    ///
    /// Fails when the value carries no `name=value` pair, when the pair is
    /// too long, or when the jar is full; the caller reports this as a
    /// header parse error.
    pub fn on_set_cookie(&mut self, is_v2: bool, value: &str) -> Result<(), Error> {
        let pair = value.split(';').next().unwrap_or("").trim();
        let name = match pair.split_once('=') {
            Some((name, _)) if !name.is_empty() => name,
            _ => return Err(Error::InvalidHeader),
        };

        let stored = String::try_from(pair).map_err(|_| Error::InvalidHeader)?;
        if is_v2 {
            self.use_v2 = true;
        }

        if let Some(slot) = self
            .cookies
            .iter_mut()
            .find(|c| c.split_once('=').map(|(n, _)| n) == Some(name))
        {
            *slot = stored;
            return Ok(());
        }
        self.cookies.push(stored).map_err(|_| Error::InvalidHeader)
    }

    /// Write the `Cookie` request header value into `out`: the stored pairs
    /// joined with `; `, prefixed with `$Version="1"` when any cookie came
    /// in via `Set-Cookie2`.
    pub fn header_value<const N: usize>(&self, out: &mut String<N>) -> Result<(), Error> {
        out.clear();
        if self.use_v2 {
            out.push_str("$Version=\"1\"").map_err(|_| Error::BufferFull)?;
        }
        for cookie in &self.cookies {
            if !out.is_empty() {
                out.push_str("; ").map_err(|_| Error::BufferFull)?;
            }
            out.push_str(cookie.as_str()).map_err(|_| Error::BufferFull)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stores_name_value_pair_only() {
        let mut jar = CookieJar::new();
        jar.on_set_cookie(false, "sid=abc123; Path=/; HttpOnly").unwrap();
        let mut value: String<256> = String::new();
        jar.header_value(&mut value).unwrap();
        assert_eq!(value.as_str(), "sid=abc123");
    }

    #[test]
    fn same_name_replaces() {
        let mut jar = CookieJar::new();
        jar.on_set_cookie(false, "sid=old").unwrap();
        jar.on_set_cookie(false, "sid=new").unwrap();
        let mut value: String<256> = String::new();
        jar.header_value(&mut value).unwrap();
        assert_eq!(value.as_str(), "sid=new");
    }

    #[test]
    fn v2_cookie_adds_version_prefix() {
        let mut jar = CookieJar::new();
        jar.on_set_cookie(true, "token=t1").unwrap();
        let mut value: String<256> = String::new();
        jar.header_value(&mut value).unwrap();
        assert_eq!(value.as_str(), "$Version=\"1\"; token=t1");
    }

    #[test]
    fn rejects_value_without_pair() {
        let mut jar = CookieJar::new();
        assert_eq!(jar.on_set_cookie(false, "garbage"), Err(Error::InvalidHeader));
    }

    #[test]
    fn full_jar_is_an_error() {
        let mut jar = CookieJar::new();
        jar.on_set_cookie(false, "a=1").unwrap();
        jar.on_set_cookie(false, "b=2").unwrap();
        jar.on_set_cookie(false, "c=3").unwrap();
        jar.on_set_cookie(false, "d=4").unwrap();
        assert_eq!(jar.on_set_cookie(false, "e=5"), Err(Error::InvalidHeader));
    }
}
