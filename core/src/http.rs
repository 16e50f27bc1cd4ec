//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! The core never touches a socket. The transport hands it an `HttpRequest`
//! (verb, path remainder, raw query, raw body) and writes back whatever
//! `HttpResponse` the core produces. This keeps routing and reconciliation
//! deterministic and testable without a server.

use std::fmt;

/// Content type attached to every successful response.
pub const JSON_CONTENT_TYPE: &str = "application/json;charset=UTF-8";

/// HTTP method for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    /// Any verb the resource does not define.
    Other(String),
}

impl HttpMethod {
    pub fn parse(token: &str) -> Self {
        match token {
            "GET" => HttpMethod::Get,
            "POST" => HttpMethod::Post,
            "PUT" => HttpMethod::Put,
            "DELETE" => HttpMethod::Delete,
            other => HttpMethod::Other(other.to_string()),
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpMethod::Get => f.write_str("GET"),
            HttpMethod::Post => f.write_str("POST"),
            HttpMethod::Put => f.write_str("PUT"),
            HttpMethod::Delete => f.write_str("DELETE"),
            HttpMethod::Other(token) => f.write_str(token),
        }
    }
}

/// An inbound request described as plain data.
///
/// `path` is the remainder after the resource prefix: `None` for the bare
/// collection URL, otherwise the slash-prefixed suffix exactly as received.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: Option<String>,
    pub query: Option<String>,
    pub body: String,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, path: Option<&str>) -> Self {
        Self {
            method,
            path: path.map(str::to_string),
            query: None,
            body: String::new(),
        }
    }

    pub fn with_query(mut self, query: &str) -> Self {
        self.query = Some(query.to_string());
        self
    }

    pub fn with_body(mut self, body: &str) -> Self {
        self.body = body.to_string();
        self
    }
}

/// An outbound response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn json(body: String) -> Self {
        Self {
            status: 200,
            headers: vec![("content-type".to_string(), JSON_CONTENT_TYPE.to_string())],
            body,
        }
    }

    /// Bodiless response carrying only a status code.
    pub fn status(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_verbs_parse() {
        assert_eq!(HttpMethod::parse("GET"), HttpMethod::Get);
        assert_eq!(HttpMethod::parse("DELETE"), HttpMethod::Delete);
    }

    #[test]
    fn verbs_are_case_sensitive() {
        assert_eq!(HttpMethod::parse("get"), HttpMethod::Other("get".to_string()));
        assert_eq!(HttpMethod::parse("PATCH").to_string(), "PATCH");
    }
}
