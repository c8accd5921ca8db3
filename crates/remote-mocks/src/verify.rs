//! Verification of inbound requests against the declarative expectations the
//! fixtures register per route.

use axum::{
    extract::Request,
    response::{IntoResponse, Response},
    Json,
};
use http::{HeaderMap, HeaderName, Method};
use serde_json::json;

/// Expectation for a plain REST route.
///
/// `headers: None` skips header checking entirely. A present list may map a
/// key to `None`, meaning the key must exist with any value, or to a value
/// list, meaning the actual value set for that key must equal it regardless
/// of order.
#[derive(Clone, Debug)]
pub struct ExpectedRequest {
    pub method: Method,
    pub url_suffix: &'static str,
    pub body: &'static str,
    pub headers: Option<Vec<(HeaderName, Option<Vec<&'static str>>)>>,
}

/// Expectation for a GraphQL-over-HTTP route. An empty `body` means only
/// introspection requests are acceptable at this route.
#[derive(Clone, Debug)]
pub struct ExpectedGraphqlRequest {
    pub url_suffix: &'static str,
    pub body: &'static str,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum VerificationError {
    #[error("Invalid HTTP method: {0}")]
    Method(Method),
    #[error("Invalid URL: {0}")]
    Url(String),
    #[error("Unable to read request body: {0}")]
    BodyRead(String),
    #[error("Unexpected value for request body: {0}")]
    Body(String),
    #[error("Wanted {expected} headers in request, got: {actual}")]
    HeaderCount { expected: usize, actual: usize },
    #[error("Required header not found: {0}")]
    MissingHeader(String),
    #[error("Unexpected value for {name} header: {values:?}")]
    HeaderValues { name: String, values: Vec<String> },
}

impl IntoResponse for VerificationError {
    fn into_response(self) -> Response {
        tracing::warn!(error = %self, "request did not match the fixture expectation");
        error_document(&self.to_string()).into_response()
    }
}

/// The GraphQL-shaped error document every failure is delivered as, always
/// with status 200. Callers of the simulator treat body content as
/// authoritative, never the status code.
pub(crate) fn error_document(message: &str) -> Json<serde_json::Value> {
    Json(json!({ "errors": [{ "message": message }] }))
}

/// An inbound request buffered into memory: the only thing handlers ever see.
pub struct RawRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: String,
}

impl RawRequest {
    pub async fn read(request: Request) -> Result<Self, VerificationError> {
        let (parts, body) = request.into_parts();
        let bytes = axum::body::to_bytes(body, usize::MAX)
            .await
            .map_err(|err| VerificationError::BodyRead(err.to_string()))?;

        Ok(RawRequest {
            method: parts.method,
            url: parts.uri.to_string(),
            headers: parts.headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }

    /// Checks method, URL suffix, exact body and (when declared) the header
    /// set, in that order. The first failing check short-circuits.
    pub fn verify(&self, expected: &ExpectedRequest) -> Result<(), VerificationError> {
        if self.method != expected.method {
            return Err(VerificationError::Method(self.method.clone()));
        }

        if !self.url.ends_with(expected.url_suffix) {
            return Err(VerificationError::Url(self.url.clone()));
        }

        if self.body != expected.body {
            return Err(VerificationError::Body(self.body.clone()));
        }

        let Some(expected_headers) = &expected.headers else {
            return Ok(());
        };

        let actual = self.headers.keys_len();
        if actual != expected_headers.len() {
            return Err(VerificationError::HeaderCount {
                expected: expected_headers.len(),
                actual,
            });
        }

        for (name, values) in expected_headers {
            if !self.headers.contains_key(name) {
                return Err(VerificationError::MissingHeader(name.to_string()));
            }

            let Some(values) = values else {
                continue;
            };

            let mut actual_values: Vec<String> = self
                .headers
                .get_all(name)
                .iter()
                .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
                .collect();
            actual_values.sort_unstable();

            let mut expected_values: Vec<String> = values.iter().map(|value| (*value).to_string()).collect();
            expected_values.sort_unstable();

            if actual_values != expected_values {
                return Err(VerificationError::HeaderValues {
                    name: name.to_string(),
                    values: actual_values,
                });
            }
        }

        Ok(())
    }

    /// Classifies a GraphQL-over-HTTP request. Returns `true` for an
    /// introspection request, in which case no body equality check is
    /// performed: introspection payloads vary and are not asserted against.
    pub fn verify_graphql(&self, expected: &ExpectedGraphqlRequest) -> Result<bool, VerificationError> {
        if self.method != Method::POST {
            return Err(VerificationError::Method(self.method.clone()));
        }

        if !self.url.ends_with(expected.url_suffix) {
            return Err(VerificationError::Url(self.url.clone()));
        }

        if self.body.contains("__schema") {
            return Ok(true);
        }

        if self.body != expected.body {
            return Err(VerificationError::Body(self.body.clone()));
        }

        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(method: Method, url: &str, body: &str) -> RawRequest {
        RawRequest {
            method,
            url: url.to_string(),
            headers: HeaderMap::new(),
            body: body.to_string(),
        }
    }

    fn expected() -> ExpectedRequest {
        ExpectedRequest {
            method: Method::POST,
            url_suffix: "/favMoviesCreate",
            body: r#"{"movies":[{"name":"Mov1"}]}"#,
            headers: None,
        }
    }

    #[test]
    fn matching_request_passes() {
        let request = raw(Method::POST, "/favMoviesCreate", r#"{"movies":[{"name":"Mov1"}]}"#);
        assert_eq!(request.verify(&expected()), Ok(()));
    }

    #[test]
    fn url_may_carry_a_prefix_and_query() {
        let request = raw(Method::GET, "/api/favMovies/0x123?name=Author&num=10", "");
        let expectation = ExpectedRequest {
            method: Method::GET,
            url_suffix: "/0x123?name=Author&num=10",
            body: "",
            headers: None,
        };
        assert_eq!(request.verify(&expectation), Ok(()));
    }

    #[test]
    fn wrong_method_is_the_first_error_reported() {
        // Body is wrong too, but the method check runs first.
        let request = raw(Method::GET, "/favMoviesCreate", "");
        let err = request.verify(&expected()).unwrap_err();
        assert_eq!(err.to_string(), "Invalid HTTP method: GET");
    }

    #[test]
    fn wrong_url_suffix() {
        let request = raw(Method::POST, "/favMoviesDelete", r#"{"movies":[{"name":"Mov1"}]}"#);
        let err = request.verify(&expected()).unwrap_err();
        assert_eq!(err.to_string(), "Invalid URL: /favMoviesDelete");
    }

    #[test]
    fn wrong_body_reports_the_received_body() {
        let request = raw(Method::POST, "/favMoviesCreate", r#"{"movies":[]}"#);
        let err = request.verify(&expected()).unwrap_err();
        assert_eq!(err.to_string(), r#"Unexpected value for request body: {"movies":[]}"#);
    }

    fn header_expectation() -> ExpectedRequest {
        ExpectedRequest {
            method: Method::GET,
            url_suffix: "/verifyHeaders",
            body: "",
            headers: Some(vec![
                (HeaderName::from_static("x-app-token"), Some(vec!["app-token"])),
                (HeaderName::from_static("x-user-id"), Some(vec!["123"])),
                (HeaderName::from_static("user-agent"), None),
            ]),
        }
    }

    #[test]
    fn headers_match_in_any_order() {
        let mut request = raw(Method::GET, "/verifyHeaders", "");
        request.headers.insert("x-user-id", "123".parse().unwrap());
        request.headers.insert("user-agent", "engine".parse().unwrap());
        request.headers.insert("x-app-token", "app-token".parse().unwrap());
        assert_eq!(request.verify(&header_expectation()), Ok(()));
    }

    #[test]
    fn repeated_header_values_compare_as_a_set() {
        let expectation = ExpectedRequest {
            headers: Some(vec![
                (HeaderName::from_static("x-app-token"), Some(vec!["b", "a"])),
                (HeaderName::from_static("x-user-id"), Some(vec!["123"])),
                (HeaderName::from_static("user-agent"), None),
            ]),
            ..header_expectation()
        };
        let mut request = raw(Method::GET, "/verifyHeaders", "");
        request.headers.append("x-app-token", "a".parse().unwrap());
        request.headers.append("x-app-token", "b".parse().unwrap());
        request.headers.insert("x-user-id", "123".parse().unwrap());
        request.headers.insert("user-agent", "engine".parse().unwrap());
        assert_eq!(request.verify(&expectation), Ok(()));
    }

    #[test]
    fn missing_header_key() {
        let mut request = raw(Method::GET, "/verifyHeaders", "");
        request.headers.insert("x-app-token", "app-token".parse().unwrap());
        request.headers.insert("user-agent", "engine".parse().unwrap());
        request.headers.insert("accept", "application/json".parse().unwrap());
        let err = request.verify(&header_expectation()).unwrap_err();
        assert_eq!(err.to_string(), "Required header not found: x-user-id");
    }

    #[test]
    fn wrong_header_value_set() {
        let mut request = raw(Method::GET, "/verifyHeaders", "");
        request.headers.insert("x-app-token", "other-token".parse().unwrap());
        request.headers.insert("x-user-id", "123".parse().unwrap());
        request.headers.insert("user-agent", "engine".parse().unwrap());
        let err = request.verify(&header_expectation()).unwrap_err();
        assert_eq!(
            err.to_string(),
            r#"Unexpected value for x-app-token header: ["other-token"]"#
        );
    }

    #[test]
    fn wrong_header_count() {
        let mut request = raw(Method::GET, "/verifyHeaders", "");
        request.headers.insert("x-app-token", "app-token".parse().unwrap());
        request.headers.insert("x-user-id", "123".parse().unwrap());
        request.headers.insert("user-agent", "engine".parse().unwrap());
        request.headers.insert("x-extra", "1".parse().unwrap());
        let err = request.verify(&header_expectation()).unwrap_err();
        assert_eq!(err.to_string(), "Wanted 3 headers in request, got: 4");
    }

    #[test]
    fn unconstrained_header_only_needs_to_exist() {
        let mut request = raw(Method::GET, "/verifyHeaders", "");
        request.headers.insert("x-app-token", "app-token".parse().unwrap());
        request.headers.insert("x-user-id", "123".parse().unwrap());
        request.headers.insert("user-agent", "anything at all".parse().unwrap());
        assert_eq!(request.verify(&header_expectation()), Ok(()));
    }

    const COUNTRY_BODY: &str = r#"{"query":"query { country(code: $id) {\ncode\nname\n}}","variables":{"id":"BI"}}"#;

    fn graphql_expectation() -> ExpectedGraphqlRequest {
        ExpectedGraphqlRequest {
            url_suffix: "/validcountry",
            body: COUNTRY_BODY,
        }
    }

    #[test]
    fn graphql_requires_post() {
        let request = raw(Method::GET, "/validcountry", COUNTRY_BODY);
        let err = request.verify_graphql(&graphql_expectation()).unwrap_err();
        assert_eq!(err.to_string(), "Invalid HTTP method: GET");
    }

    #[test]
    fn graphql_data_query_matches_exactly() {
        let request = raw(Method::POST, "/validcountry", COUNTRY_BODY);
        assert_eq!(request.verify_graphql(&graphql_expectation()), Ok(false));
    }

    #[test]
    fn any_body_mentioning_schema_is_introspection() {
        // The rest of the body would fail the exact match, but the substring
        // check wins.
        let request = raw(Method::POST, "/validcountry", r#"{"query":"{ __schema { queryType { name } } }"}"#);
        assert_eq!(request.verify_graphql(&graphql_expectation()), Ok(true));
    }

    #[test]
    fn graphql_body_mismatch() {
        let request = raw(Method::POST, "/validcountry", r#"{"query":"{ country { code } }"}"#);
        let err = request.verify_graphql(&graphql_expectation()).unwrap_err();
        assert_eq!(
            err.to_string(),
            r#"Unexpected value for request body: {"query":"{ country { code } }"}"#
        );
    }

    #[test]
    fn empty_expected_body_accepts_only_introspection() {
        let expectation = ExpectedGraphqlRequest {
            url_suffix: "/noquery",
            body: "",
        };
        let introspection = raw(Method::POST, "/noquery", r#"{"query":"{ __schema { types { name } } }"}"#);
        assert_eq!(introspection.verify_graphql(&expectation), Ok(true));

        let data = raw(Method::POST, "/noquery", r#"{"query":"{ posts { id } }"}"#);
        assert!(data.verify_graphql(&expectation).is_err());
    }
}
