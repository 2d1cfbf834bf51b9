//! Response header parser, status dispatcher and retry orchestrator.
//!
//! The orchestrator drives one logical request: parse the status line and
//! headers, apply the per-status-class policy, loop over informational
//! responses, and recompute the retry flag once per completed response.
//! Every fatal exit clears the connection-reuse flag; the two deliberate
//! exceptions are a drained 4xx/5xx error body and a successfully followed
//! redirect, where the old connection is already superseded and must not be
//! written off.

use heapless::Vec;

use crate::client::headers::HeaderParserState;
use crate::client::line::Line;
use crate::client::url::Url;
use crate::client::{Client, ContentEncoding, MAX_HEADER_LINE_LEN, MAX_REDIRECTS};
use crate::error::Error;
use crate::transport::{Close as _, Connect, Connection};

impl<C: Connection, K: Connect<Connection = C>> Client<C, K> {
    /// Receive one final response, skipping interim 1xx responses unless a
    /// chunked request body is pending (in that case the caller must regain
    /// control after a `100 Continue` to stream the body).
    ///
    /// On return the retry flag has been recomputed: it is set after a
    /// followed redirect, after a first 401 with usable credentials, and
    /// after a first 417, and cleared otherwise.
    pub fn receive_headers(&mut self) -> Result<(), Error> {
        let skip_informational = !self.session.flags.chunked_sending;
        let result = loop {
            let result = self.receive_one_response();
            if result.is_ok() && skip_informational && self.session.status == 100 {
                continue;
            }
            break result;
        };
        self.update_retry_flags();
        result
    }

    fn receive_one_response(&mut self) -> Result<(), Error> {
        self.session.flags.keep_connection = true;
        self.session.redirect = None;
        self.body = None;
        self.content_encoding = ContentEncoding::Identity;

        let mut state = HeaderParserState::new();
        if let Err(e) = self.parse_headers(&mut state) {
            self.session.flags.keep_connection = false;
            return Err(e);
        }
        self.dispatch(state)
    }

    /// Read the status line and the header block, applying each header to
    /// the parser state.
    fn parse_headers(&mut self, state: &mut HeaderParserState) -> Result<(), Error> {
        let mut line: Vec<u8, MAX_HEADER_LINE_LEN> = Vec::new();

        match self.read_line(&mut line) {
            Ok(Line::Complete) => {}
            Ok(Line::Overflow) => return Err(Error::InvalidStatusLine),
            Err(e) => {
                // Nothing usable received; report 100 so the caller can
                // tell "no response" from a parsed status.
                self.session.status = 100;
                return Err(e);
            }
        }
        self.session.status = parse_status_line(&line)?;

        loop {
            self.read_header_line(&mut line)?;
            if line.is_empty() {
                // End of the header block; nothing past it is consumed.
                return Ok(());
            }
            let text = core::str::from_utf8(&line).map_err(|_| Error::InvalidHeader)?;
            let (name, value) = split_header(text).ok_or(Error::InvalidHeader)?;
            state.apply_header(name, value, &mut self.session, &mut self.cookies)?;
        }
    }

    /// Per-status-class policy.
    fn dispatch(&mut self, mut state: HeaderParserState) -> Result<(), Error> {
        match self.session.status / 100 {
            // Informational: no body; the orchestrator decides whether to
            // wait for the real response.
            1 => Ok(()),
            2 => {
                self.session.auth.retried = false;
                self.attach_body(state.transfer_encoding, state.content_length);
                self.content_encoding = state.content_encoding;
                self.session.redirect_count = 0;
                Ok(())
            }
            3 => {
                self.session.auth.retried = false;
                match state.redirect.take() {
                    Some(url) => self.follow_redirect(url),
                    None => {
                        self.session.flags.keep_connection = false;
                        Err(Error::MissingLocation)
                    }
                }
            }
            class => {
                if class != 4 {
                    // Server errors and unrecognized classes also reset the
                    // authentication retry bookkeeping.
                    self.session.auth.retried = false;
                }
                #[cfg(feature = "defmt")]
                defmt::warn!("error response, status {=u16}", self.session.status);
                // The error body is drained rather than the connection
                // dropped; only a failed drain costs reusability.
                self.attach_body(state.transfer_encoding, state.content_length);
                let _ = self.drain_body();
                self.body = None;
                Err(Error::ErrorStatus)
            }
        }
    }

    /// Open a connection to the redirect target and swap it in.
    ///
    /// On success this still returns an error: receiving headers for *this*
    /// response did not produce a readable body, and the caller must not
    /// try to read one. The reuse flag is deliberately left untouched; the
    /// old connection is already superseded, not faulty.
    fn follow_redirect(&mut self, url: Url) -> Result<(), Error> {
        if self.session.redirect_count >= MAX_REDIRECTS {
            self.session.flags.keep_connection = false;
            return Err(Error::TooManyRedirects);
        }
        self.session.redirect_count += 1;

        let Some(connector) = self.connector.as_mut() else {
            self.session.flags.keep_connection = false;
            return Err(Error::RedirectFailed);
        };
        match connector.connect(url.authority().as_str()) {
            Ok(new_conn) => {
                let old = core::mem::replace(&mut self.conn, new_conn);
                let _ = old.close();
                self.rx.reset();
                self.session.redirect = Some(url);
                Err(Error::Redirected)
            }
            Err(_) => {
                self.session.flags.keep_connection = false;
                Err(Error::RedirectFailed)
            }
        }
    }

    /// Recompute `should_retry`, exactly once per completed response.
    fn update_retry_flags(&mut self) {
        let session = &mut self.session;
        if session.status / 100 == 3 && session.redirect.is_some() {
            // Redirect followed; the request must be resent to the new
            // target.
            session.flags.should_retry = true;
        } else if session.status == 401 && session.auth.can_retry() {
            session.auth.retried = true;
            session.flags.should_retry = true;
        } else if session.status == 417 && !session.flags.no_expect {
            // Retry without the Expect precondition.
            session.flags.no_expect = true;
            session.flags.should_retry = true;
        } else {
            session.flags.should_retry = false;
        }
    }
}

/// Extract the status code from `HTTP/<version> <3-digit-status> ...`.
///
/// The version token is skipped, not validated: some servers answer an
/// HTTP/1.1 request with an HTTP/1.0 status line.
fn parse_status_line(line: &[u8]) -> Result<u16, Error> {
    let text = core::str::from_utf8(line).map_err(|_| Error::InvalidStatusLine)?;
    let rest = text.strip_prefix("HTTP/").ok_or(Error::InvalidStatusLine)?;
    let (_version, rest) = rest.split_once(' ').ok_or(Error::InvalidStatusLine)?;
    let digits = rest.trim_start().split(' ').next().unwrap_or("");
    if digits.len() != 3 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::InvalidStatusLine);
    }
    digits.parse::<u16>().map_err(|_| Error::InvalidStatusLine)
}

/// Split a header line on the first colon and trim leading whitespace from
/// the value. A line with no colon is malformed.
fn split_header(line: &str) -> Option<(&str, &str)> {
    let (name, value) = line.split_once(':')?;
    Some((name, value.trim_start()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_line_accepts_any_version_token() {
        assert_eq!(parse_status_line(b"HTTP/1.1 200 OK"), Ok(200));
        assert_eq!(parse_status_line(b"HTTP/1.0 404 Not Found"), Ok(404));
        assert_eq!(parse_status_line(b"HTTP/2 301 Moved"), Ok(301));
        assert_eq!(parse_status_line(b"HTTP/1.1 204"), Ok(204));
    }

    #[test]
    fn status_line_requires_prefix_and_three_digits() {
        assert!(parse_status_line(b"ICY 200 OK").is_err());
        assert!(parse_status_line(b"HTTP/1.1").is_err());
        assert!(parse_status_line(b"HTTP/1.1 20 OK").is_err());
        assert!(parse_status_line(b"HTTP/1.1 2000 OK").is_err());
        assert!(parse_status_line(b"HTTP/1.1 abc OK").is_err());
    }

    #[test]
    fn header_split_trims_value() {
        assert_eq!(split_header("Name:  value"), Some(("Name", "value")));
        assert_eq!(split_header("Name:value"), Some(("Name", "value")));
        assert_eq!(split_header("no colon here"), None);
    }
}
