//! Trait for the network seam between index queries and the service.
//!
//! [`crate::http::HttpTransport`] is the production implementation. Tests
//! plug in in-process transports to script responses and observe calls.

use url::Url;

use crate::error::SearchError;

/// Status and body of one completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body as UTF-8 text.
    pub body: String,
}

impl TransportResponse {
    /// A `200 OK` response with the given body.
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    /// Build a response from a raw body.
    ///
    /// A `200` body must be valid UTF-8, since its lines are decoded as
    /// records. Bodies of other statuses are never decoded and are converted
    /// lossily.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Decode`] naming the line of the first invalid
    /// byte of a `200` body.
    pub fn from_bytes(status: u16, body: &[u8]) -> Result<Self, SearchError> {
        if status != 200 {
            return Ok(Self {
                status,
                body: String::from_utf8_lossy(body).into_owned(),
            });
        }
        match std::str::from_utf8(body) {
            Ok(text) => Ok(Self {
                status,
                body: text.to_owned(),
            }),
            Err(err) => {
                let valid = &body[..err.valid_up_to()];
                let line = valid.iter().filter(|byte| **byte == b'\n').count() + 1;
                Err(SearchError::Decode {
                    line,
                    message: format!("invalid UTF-8: {err}"),
                })
            }
        }
    }

    /// Whether the status is the one success code the index service uses.
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Performs a single GET against the index service.
///
/// Implementations report any HTTP status as a [`TransportResponse`] and
/// reserve errors for exchanges that did not complete (connect, DNS,
/// timeout, body read) or whose `200` body is not UTF-8.
///
/// All implementations must be `Send + Sync` so one transport can be shared
/// by every task of a concurrent search.
pub trait IndexTransport: Send + Sync {
    /// Fetch `url` and return its status and body.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] if the exchange could not be completed
    /// and [`SearchError::Decode`] if a `200` body is not valid UTF-8.
    fn get(
        &self,
        url: &Url,
    ) -> impl std::future::Future<Output = Result<TransportResponse, SearchError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedTransport {
        response: Option<TransportResponse>,
    }

    impl IndexTransport for FixedTransport {
        async fn get(&self, _url: &Url) -> Result<TransportResponse, SearchError> {
            self.response
                .clone()
                .ok_or_else(|| SearchError::Http("connection refused".into()))
        }
    }

    #[test]
    fn transport_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FixedTransport>();
    }

    #[test]
    fn ok_response_is_200() {
        let response = TransportResponse::ok("{}");
        assert!(response.is_ok());
        assert_eq!(response.body, "{}");
        let not_found = TransportResponse {
            status: 404,
            body: String::new(),
        };
        assert!(!not_found.is_ok());
    }

    #[test]
    fn from_bytes_rejects_invalid_utf8_in_success_body() {
        let err = TransportResponse::from_bytes(200, b"{\"url\":\"a\"}\n{\"url\":\"b\xff\"}\n").unwrap_err();
        assert!(matches!(err, SearchError::Decode { line: 2, .. }));
    }

    #[test]
    fn from_bytes_keeps_valid_body() {
        let response = TransportResponse::from_bytes(200, "{\"url\":\"é\"}".as_bytes()).expect("utf-8");
        assert_eq!(response, TransportResponse::ok("{\"url\":\"é\"}"));
    }

    #[test]
    fn from_bytes_tolerates_invalid_utf8_in_error_body() {
        let response = TransportResponse::from_bytes(404, b"not \xff found").expect("lossy");
        assert_eq!(response.status, 404);
        assert!(!response.is_ok());
    }

    #[tokio::test]
    async fn fixed_transport_returns_response() {
        let transport = FixedTransport {
            response: Some(TransportResponse::ok("line")),
        };
        let url = Url::parse("https://index.test/").expect("url");
        let response = transport.get(&url).await.expect("should succeed");
        assert_eq!(response.body, "line");
    }

    #[tokio::test]
    async fn fixed_transport_propagates_errors() {
        let transport = FixedTransport { response: None };
        let url = Url::parse("https://index.test/").expect("url");
        let err = transport.get(&url).await.unwrap_err();
        assert!(err.to_string().contains("connection refused"));
    }
}
