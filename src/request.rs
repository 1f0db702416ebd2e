//! Single-expression request/response handling.
//!
//! A request carries one expression as text; the response carries either
//! its evaluated text or an error message. Each request gets its own lexer
//! and parser.

use log::debug;

use crate::lexer::Lexer;
use crate::parser::Parser;

/// The source name given to request expressions in error locations.
pub const REQUEST_SOURCE: &str = "post-request";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExprRequest {
    pub expr: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExprResponse {
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub result: Option<String>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub error: Option<String>,
}

impl ExprResponse {
    pub fn ok(result: String) -> Self {
        Self {
            result: Some(result),
            error: None,
        }
    }

    pub fn error(error: impl Into<String>) -> Self {
        Self {
            result: None,
            error: Some(error.into()),
        }
    }
}

/// Parse and evaluate the request's expression.
pub fn handle(request: &ExprRequest) -> ExprResponse {
    if request.expr.is_empty() {
        return ExprResponse::error("expr is required");
    }
    let mut parser = Parser::new(Lexer::from_named(REQUEST_SOURCE, &request.expr));
    match parser.parse_all() {
        Ok(expression) => ExprResponse::ok(expression.eval()),
        Err(e) => {
            debug!("Request failed: {e}");
            ExprResponse::error(e.to_string())
        }
    }
}

/// Handle a JSON-encoded [`ExprRequest`], returning the JSON-encoded
/// [`ExprResponse`].
#[cfg(feature = "serde")]
pub fn handle_json(body: &str) -> String {
    let response = match serde_json::from_str::<ExprRequest>(body) {
        Ok(request) => handle(&request),
        Err(e) => {
            debug!("Invalid request body: {e}");
            ExprResponse::error("invalid JSON")
        }
    };
    // A struct of two optional strings always serializes.
    serde_json::to_string(&response).unwrap_or_else(|_| r#"{"error":"internal error"}"#.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(expr: &str) -> ExprResponse {
        handle(&ExprRequest {
            expr: expr.to_string(),
        })
    }

    #[test]
    fn test_success() {
        assert_eq!(
            request("(+ 1.0 2.0)"),
            ExprResponse::ok("3.000000".to_string())
        );
    }

    #[test]
    fn test_empty_expression() {
        assert_eq!(request(""), ExprResponse::error("expr is required"));
    }

    #[test]
    fn test_error_mentions_request_source() {
        let response = request("(foo 1)");
        assert_eq!(response.result, None);
        assert_eq!(
            response.error.as_deref(),
            Some("post-request:1:2: Unknown function 'foo'")
        );
    }

    #[test]
    fn test_trailing_input_rejected() {
        let response = request("1.0 2.0");
        assert!(response.error.unwrap().contains("Expected end of input"));
    }

    #[test]
    fn test_deeply_nested_request_fails_cleanly() {
        let response = request(&"(+ ".repeat(100_000));
        assert_eq!(response.result, None);
        assert_eq!(
            response.error.as_deref(),
            Some("post-request:1:385: calls nested more than 128 deep")
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_json_roundtrip() {
        assert_eq!(
            handle_json(r#"{"expr": "(+ .5 .5)"}"#),
            r#"{"result":"1.000000"}"#
        );
        assert_eq!(handle_json("not json"), r#"{"error":"invalid JSON"}"#);
        assert_eq!(handle_json(r#"{"expr": ""}"#), r#"{"error":"expr is required"}"#);
    }
}
