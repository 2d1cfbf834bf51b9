//! Header classification and per-response parser state.
//!
//! Each header of a response is applied to a [`HeaderParserState`] through a
//! closed match over the recognized header names (case-insensitive); unknown
//! headers fall through to an ignored arm. The transfer-encoding rules come
//! from RFC 2616 §4.4: a length-delimited and a chunked framing claim on the
//! same response is a protocol error, in either order.

use crate::client::cookie::CookieJar;
use crate::client::session::Session;
use crate::client::url::Url;
use crate::error::Error;

/// How the end of the response body is signaled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferEncoding {
    /// No framing headers seen; the body runs to connection close.
    Identity,
    /// `Content-Length` delimited.
    ContentLength,
    /// `Transfer-Encoding: chunked`.
    Chunked,
}

/// Compression applied to the body by the server.
///
/// The engine records the negotiated encoding and surfaces it to the caller;
/// decompression itself is not part of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentEncoding {
    /// No compression.
    Identity,
    /// gzip (or x-gzip) compressed.
    Gzip,
    /// deflate compressed.
    Deflate,
}

#[cfg(feature = "defmt")]
impl defmt::Format for ContentEncoding {
    fn format(&self, f: defmt::Formatter) {
        match self {
            ContentEncoding::Identity => defmt::write!(f, "Identity"),
            ContentEncoding::Gzip => defmt::write!(f, "Gzip"),
            ContentEncoding::Deflate => defmt::write!(f, "Deflate"),
        }
    }
}

/// Ephemeral state accumulated while parsing one response's headers.
#[derive(Debug)]
pub(crate) struct HeaderParserState {
    pub transfer_encoding: TransferEncoding,
    pub content_encoding: ContentEncoding,
    /// Only meaningful when `transfer_encoding == ContentLength`.
    pub content_length: usize,
    /// Parsed `Location` target; present only on 3xx responses.
    pub redirect: Option<Url>,
}

impl HeaderParserState {
    pub fn new() -> Self {
        Self {
            transfer_encoding: TransferEncoding::Identity,
            content_encoding: ContentEncoding::Identity,
            content_length: 0,
            redirect: None,
        }
    }

    /// Apply one `name: value` pair: the transfer-encoding classifier plus
    /// the auth, cookie and redirect collaborators.
    pub fn apply_header(
        &mut self,
        name: &str,
        value: &str,
        session: &mut Session,
        cookies: &mut CookieJar,
    ) -> Result<(), Error> {
        if name.eq_ignore_ascii_case("WWW-Authenticate") {
            session.auth.on_challenge(value);
        } else if name.eq_ignore_ascii_case("Set-Cookie") {
            cookies.on_set_cookie(false, value)?;
        } else if name.eq_ignore_ascii_case("Set-Cookie2") {
            cookies.on_set_cookie(true, value)?;
        } else if name.eq_ignore_ascii_case("Content-Length") {
            if self.transfer_encoding != TransferEncoding::Identity {
                return Err(Error::EncodingConflict);
            }
            self.content_length = parse_size(value).ok_or(Error::InvalidHeader)?;
            self.transfer_encoding = TransferEncoding::ContentLength;
        } else if name.eq_ignore_ascii_case("Transfer-Encoding") {
            // RFC 2616, sec. 4.4: "identity" is no transfer coding at all.
            if !value.trim().eq_ignore_ascii_case("identity") {
                if self.transfer_encoding != TransferEncoding::Identity {
                    return Err(Error::EncodingConflict);
                }
                self.transfer_encoding = TransferEncoding::Chunked;
            }
        } else if name.eq_ignore_ascii_case("Content-Encoding") {
            let value = value.trim();
            if !value.eq_ignore_ascii_case("identity") {
                if self.content_encoding != ContentEncoding::Identity {
                    return Err(Error::EncodingConflict);
                }
                if value.eq_ignore_ascii_case("gzip") || value.eq_ignore_ascii_case("x-gzip") {
                    self.content_encoding = ContentEncoding::Gzip;
                } else if value.eq_ignore_ascii_case("deflate") {
                    self.content_encoding = ContentEncoding::Deflate;
                }
                // Unrecognized codings are accepted and left at identity.
            }
        } else if name.eq_ignore_ascii_case("Connection") {
            if value.trim().eq_ignore_ascii_case("close") {
                session.flags.keep_connection = false;
            }
        } else if session.status / 100 == 3 && name.eq_ignore_ascii_case("Location") {
            // A later Location replaces an earlier one.
            self.redirect = Url::parse(value);
        } else {
            #[cfg(feature = "defmt")]
            defmt::trace!("unhandled header: {=str}", name);
        }
        Ok(())
    }
}

/// Strict `Content-Length` integer parse: surrounding whitespace trimmed,
/// an optional leading `+`, decimal digits only, no trailing garbage, and
/// the value must fit in `usize`.
pub(crate) fn parse_size(input: &str) -> Option<usize> {
    let trimmed = input.trim();
    let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse::<usize>().ok()
}
