//! Request boundary consumed by the filter, and the body replay buffer.

use std::io::{self, Cursor, Read};

use bytes::Bytes;
use http::header::{InvalidHeaderValue, CONTENT_LENGTH, CONTENT_TYPE};
use http::{HeaderValue, Request, Response};

/// Readable request body.
pub type EntityStream = Box<dyn Read + Send>;

/// Media type inspected by the filter.
pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// The operations the filter needs from an inbound request.
pub trait RequestContext {
    /// Whether the request carries a body worth inspecting.
    fn has_entity(&self) -> bool;

    /// Raw `Content-Type` value, if present and readable.
    fn media_type(&self) -> Option<&str>;

    /// Take ownership of the body stream, leaving the request without one.
    fn take_entity_stream(&mut self) -> Option<EntityStream>;

    /// Install the stream downstream handlers will read.
    fn set_entity_stream(&mut self, stream: EntityStream);

    /// Short-circuit the request with `response`.
    fn abort_with(&mut self, response: Response<String>);
}

/// True for `application/x-www-form-urlencoded`, ignoring case and parameters.
pub fn is_form_urlencoded(media_type: &str) -> bool {
    media_type
        .split(';')
        .next()
        .map(str::trim)
        .is_some_and(|essence| essence.eq_ignore_ascii_case(FORM_URLENCODED))
}

/// A fully captured request body that can be read any number of times.
///
/// Every reader starts at offset zero and shares the same bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayBuffer {
    bytes: Bytes,
}

impl ReplayBuffer {
    /// Read `stream` to the end, keeping at most `limit` bytes.
    ///
    /// Returns `Ok(None)` when the stream is longer than `limit`.
    pub fn capture<R: Read>(stream: R, limit: usize) -> io::Result<Option<Self>> {
        let mut buf = Vec::new();
        let read_limit = (limit as u64).saturating_add(1);
        stream.take(read_limit).read_to_end(&mut buf)?;
        if buf.len() > limit {
            return Ok(None);
        }
        Ok(Some(Self {
            bytes: Bytes::from(buf),
        }))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// A new independent reader over the captured bytes.
    pub fn reader(&self) -> Cursor<Bytes> {
        Cursor::new(self.bytes.clone())
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl From<Bytes> for ReplayBuffer {
    fn from(bytes: Bytes) -> Self {
        Self { bytes }
    }
}

/// [`RequestContext`] over an `http::Request` with a blocking body.
pub struct HttpRequestContext {
    request: Request<Option<EntityStream>>,
    aborted: Option<Response<String>>,
}

impl HttpRequestContext {
    pub fn new(request: Request<Option<EntityStream>>) -> Self {
        Self {
            request,
            aborted: None,
        }
    }

    /// Build a POST request carrying `body`, with an optional content type.
    pub fn from_bytes(
        content_type: Option<&str>,
        body: impl Into<Bytes>,
    ) -> Result<Self, InvalidHeaderValue> {
        let body: Bytes = body.into();
        let stream: EntityStream = Box::new(Cursor::new(body.clone()));
        let mut request = Request::new(Some(stream));
        *request.method_mut() = http::Method::POST;

        let headers = request.headers_mut();
        if let Some(content_type) = content_type {
            headers.insert(CONTENT_TYPE, HeaderValue::from_str(content_type)?);
        }
        headers.insert(CONTENT_LENGTH, HeaderValue::from(body.len()));

        Ok(Self::new(request))
    }

    /// The response installed by a rejection, if any.
    pub fn aborted(&self) -> Option<&Response<String>> {
        self.aborted.as_ref()
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted.is_some()
    }

    /// Read whatever body stream is currently installed, as a downstream
    /// handler would.
    pub fn read_entity_to_end(&mut self) -> io::Result<Vec<u8>> {
        let mut out = Vec::new();
        if let Some(stream) = self.request.body_mut().as_mut() {
            stream.read_to_end(&mut out)?;
        }
        Ok(out)
    }
}

impl RequestContext for HttpRequestContext {
    fn has_entity(&self) -> bool {
        if self.request.body().is_none() {
            return false;
        }
        match self
            .request
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
        {
            Some(len) => len.trim() != "0",
            None => true,
        }
    }

    fn media_type(&self) -> Option<&str> {
        self.request
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
    }

    fn take_entity_stream(&mut self) -> Option<EntityStream> {
        self.request.body_mut().take()
    }

    fn set_entity_stream(&mut self, stream: EntityStream) {
        *self.request.body_mut() = Some(stream);
    }

    fn abort_with(&mut self, response: Response<String>) {
        self.aborted = Some(response);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_media_type_matching() {
        assert!(is_form_urlencoded("application/x-www-form-urlencoded"));
        assert!(is_form_urlencoded("Application/X-WWW-Form-URLEncoded"));
        assert!(is_form_urlencoded("application/x-www-form-urlencoded; charset=UTF-8"));
        assert!(!is_form_urlencoded("multipart/form-data; boundary=x"));
        assert!(!is_form_urlencoded("application/json"));
        assert!(!is_form_urlencoded(""));
    }

    #[test]
    fn test_capture_within_limit() {
        let buffer = ReplayBuffer::capture(&b"os=linux"[..], 8).unwrap().unwrap();
        assert_eq!(buffer.as_bytes(), b"os=linux");
    }

    #[test]
    fn test_capture_over_limit() {
        assert!(ReplayBuffer::capture(&b"os=linux"[..], 7).unwrap().is_none());
    }

    #[test]
    fn test_readers_are_independent() {
        let buffer = ReplayBuffer::from(Bytes::from_static(b"a=1&b=2"));
        let mut first = String::new();
        buffer.reader().read_to_string(&mut first).unwrap();
        let mut second = String::new();
        buffer.reader().read_to_string(&mut second).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, "a=1&b=2");
    }

    #[test]
    fn test_zero_content_length_has_no_entity() {
        let ctx = HttpRequestContext::from_bytes(Some(FORM_URLENCODED), Bytes::new()).unwrap();
        assert!(!ctx.has_entity());
    }

    #[test]
    fn test_missing_body_has_no_entity() {
        let ctx = HttpRequestContext::new(Request::new(None));
        assert!(!ctx.has_entity());
        assert_eq!(ctx.media_type(), None);
    }
}
