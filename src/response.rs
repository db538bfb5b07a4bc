//! The response sink handed to every handler.
//!
//! Calling a terminal method ([`send`](Response::send), [`json`](Response::json)
//! or [`end`](Response::end)) is what marks a handler as having finished the
//! request. A middleware handler that finishes stops the dispatch.
//!
//! The sink records what was written so a host can turn it into a real
//! response with [`into_http`](Response::into_http). Browser dispatches use the
//! same sink; nothing is transmitted, but terminal calls still count.

use crate::error::Error;
use http::header::{self, HeaderMap, HeaderName, HeaderValue};
use http::StatusCode;
use serde::Serialize;

/// Records status, headers and body written by handlers.
#[derive(Debug, Default)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: String,
    headers_sent: bool,
    ended: bool,
    terminal_calls: usize,
}

impl Response {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the status used by the next terminal call.
    pub fn status(&mut self, status: StatusCode) -> &mut Self {
        self.status = status;
        self
    }

    /// Sets a header used by the next terminal call.
    pub fn header(&mut self, name: HeaderName, value: HeaderValue) -> &mut Self {
        self.headers.insert(name, value);
        self
    }

    /// Writes the status line and headers. Later writes are ignored.
    pub fn write_head(&mut self, status: StatusCode, headers: HeaderMap) -> &mut Self {
        if self.headers_sent {
            warn!("response head already written, ignoring {}", status);
            return self;
        }

        self.status = status;
        self.headers.extend(headers);
        self.headers_sent = true;
        self
    }

    /// Ends the response with the given body.
    pub fn end(&mut self, body: impl Into<String>) -> &mut Self {
        self.terminal_calls += 1;

        if self.ended {
            warn!("response already ended, dropping body");
            return self;
        }

        self.headers_sent = true;
        self.body = body.into();
        self.ended = true;
        self
    }

    /// Sends an HTML body, defaulting `Content-Type` to `text/html`.
    pub fn send(&mut self, body: impl Into<String>) -> &mut Self {
        self.default_content_type("text/html");
        self.end(body)
    }

    /// Serializes `value` and sends it as `application/json`.
    pub fn json<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<&mut Self, Error> {
        let body = serde_json::to_string(value)?;
        self.default_content_type("application/json");
        Ok(self.end(body))
    }

    fn default_content_type(&mut self, mime: &'static str) {
        if !self.headers_sent && !self.headers.contains_key(header::CONTENT_TYPE) {
            self.headers
                .insert(header::CONTENT_TYPE, HeaderValue::from_static(mime));
        }
    }

    pub fn status_code(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn headers_sent(&self) -> bool {
        self.headers_sent
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// Number of terminal calls made so far.
    pub(crate) fn terminal_calls(&self) -> usize {
        self.terminal_calls
    }

    /// Converts the recorded response into an `http::Response`.
    pub fn into_http(self) -> http::Response<String> {
        let mut res = http::Response::new(self.body);
        *res.status_mut() = self.status;
        *res.headers_mut() = self.headers;
        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_defaults() {
        let mut res = Response::new();
        res.send("<p>hi</p>");

        assert!(res.is_ended());
        assert_eq!(res.status_code(), StatusCode::OK);
        assert_eq!(res.headers()[header::CONTENT_TYPE], "text/html");
        assert_eq!(res.body(), "<p>hi</p>");
    }

    #[test]
    fn json_keeps_explicit_status() {
        let mut res = Response::new();
        res.status(StatusCode::CREATED)
            .json(&serde_json::json!({ "id": 7 }))
            .unwrap();

        let res = res.into_http();
        assert_eq!(res.status(), StatusCode::CREATED);
        assert_eq!(res.headers()[header::CONTENT_TYPE], "application/json");
        assert_eq!(res.body(), r#"{"id":7}"#);
    }

    #[test]
    fn second_end_is_ignored() {
        let mut res = Response::new();
        res.send("first");
        res.send("second");

        assert_eq!(res.body(), "first");
        assert_eq!(res.terminal_calls(), 2);
    }
}
