//! Response shaping shared by every handler. All responses, success and
//! failure alike, go through `json_response` so the permissive CORS
//! headers and content type are identical on every path.

use lambda_http::{Body, Response};
use serde::Serialize;

use crate::error::Error;

#[derive(Serialize)]
struct Message<'a> {
    message: &'a str,
}

#[derive(Serialize)]
struct NotFoundMessage<'a> {
    message: &'a str,
    pk: &'a str,
}

pub fn json_response<T: Serialize>(
    status: u16,
    payload: &T,
) -> Result<Response<Body>, lambda_http::Error> {
    Ok(Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Headers", "*")
        .body(Body::Text(serde_json::to_string(payload)?))?)
}

pub fn message_response(
    status: u16,
    message: &str,
) -> Result<Response<Body>, lambda_http::Error> {
    json_response(status, &Message { message })
}

/// Convert a library error into its HTTP shape. Store causes are logged
/// here and never reach the caller.
pub fn error_response(err: &Error) -> Result<Response<Body>, lambda_http::Error> {
    match err {
        Error::Validation(message) => message_response(err.status_code(), message),
        Error::MethodNotAllowed => message_response(err.status_code(), "Method Not Allowed"),
        Error::NotFound { pk } => json_response(
            err.status_code(),
            &NotFoundMessage {
                message: "Task not found",
                pk,
            },
        ),
        Error::Store(cause) => {
            tracing::error!(%cause, "store request failed");
            message_response(err.status_code(), "Internal server error")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header<'a>(response: &'a Response<Body>, name: &str) -> Option<&'a str> {
        response.headers().get(name).and_then(|v| v.to_str().ok())
    }

    fn body_text(response: &Response<Body>) -> &str {
        match response.body() {
            Body::Text(text) => text,
            _ => panic!("expected text body"),
        }
    }

    #[test]
    fn every_response_carries_cors_headers() {
        let responses = [
            message_response(200, "ok").unwrap(),
            error_response(&Error::validation("bad")).unwrap(),
            error_response(&Error::MethodNotAllowed).unwrap(),
            error_response(&Error::NotFound { pk: "t1".into() }).unwrap(),
            error_response(&Error::store("boom")).unwrap(),
        ];

        for response in &responses {
            assert_eq!(header(response, "Access-Control-Allow-Origin"), Some("*"));
            assert_eq!(header(response, "Access-Control-Allow-Headers"), Some("*"));
            assert_eq!(header(response, "content-type"), Some("application/json"));
        }
    }

    #[test]
    fn not_found_echoes_the_pk() {
        let response = error_response(&Error::NotFound { pk: "abc".into() }).unwrap();
        assert_eq!(response.status(), 404);
        let body = body_text(&response);
        assert!(body.contains("Task not found"));
        assert!(body.contains("abc"));
    }

    #[test]
    fn store_errors_hide_the_cause() {
        let response = error_response(&Error::store("connection refused")).unwrap();
        assert_eq!(response.status(), 500);
        let body = body_text(&response);
        assert!(body.contains("Internal server error"));
        assert!(!body.contains("connection refused"));
    }

    #[test]
    fn statuses_follow_the_taxonomy() {
        assert_eq!(error_response(&Error::validation("x")).unwrap().status(), 400);
        assert_eq!(error_response(&Error::MethodNotAllowed).unwrap().status(), 405);
        assert_eq!(
            error_response(&Error::NotFound { pk: "t".into() }).unwrap().status(),
            404
        );
        assert_eq!(error_response(&Error::store("x")).unwrap().status(), 500);
    }
}
