//! Response construction.
//!
//! # Responsibilities
//! - Turn a rendered `Visit` into an HTTP response
//! - Map dispatch failures to status codes
//!
//! # Design Decisions
//! - `NotAcceptable` → 406 with a plain-text body (no visitor can render it)
//! - Unknown visitors and render failures are server faults → 500
//! - An `Accept` header that is not visible ASCII yields no candidates → 406

use axum::{
    body::Body,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};

use crate::visitor::{AcceptHeaderDispatcher, DispatchError, RestValue, Visit};

/// Response with the visitor's body and media type.
pub fn visit_response(status: StatusCode, visit: Visit) -> Response {
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, visit.content_type)
        .header(header::VARY, "Accept")
        .body(Body::from(visit.body))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

impl IntoResponse for DispatchError {
    fn into_response(self) -> Response {
        if let DispatchError::NotAcceptable(err) = &self {
            return (StatusCode::NOT_ACCEPTABLE, err.to_string()).into_response();
        }
        tracing::error!(error = %self, "Response rendering failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "Response rendering failed").into_response()
    }
}

/// Render `value` with the visitor the request's `Accept` header selects.
pub fn negotiate(
    dispatcher: &AcceptHeaderDispatcher,
    headers: &HeaderMap,
    status: StatusCode,
    value: &RestValue,
) -> Response {
    let accept = match headers.get(header::ACCEPT).map(|v| v.to_str()) {
        None => None,
        Some(Ok(accept)) => Some(accept),
        Some(Err(_)) => {
            tracing::debug!("Unreadable Accept header, no candidates");
            Some("")
        }
    };
    match dispatcher.dispatch(accept, value) {
        Ok(visit) => visit_response(status, visit),
        Err(err) => err.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    use crate::config::RestConfig;
    use crate::lifecycle::startup::build_dispatcher;
    use crate::visitor::{HandlerRef, NotAcceptable};

    #[test]
    fn test_error_status_codes() {
        let not_acceptable = DispatchError::NotAcceptable(NotAcceptable {
            candidates: vec!["text/html".into()],
        });
        assert_eq!(not_acceptable.into_response().status(), StatusCode::NOT_ACCEPTABLE);

        let unknown = DispatchError::UnknownVisitor(HandlerRef::new("yaml"));
        assert_eq!(unknown.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_visit_response_headers() {
        let response = visit_response(
            StatusCode::OK,
            Visit {
                handler: HandlerRef::new("json"),
                content_type: "application/vnd.ez.api.Root+json".into(),
                body: b"{}".to_vec(),
            },
        );

        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/vnd.ez.api.Root+json");
        assert_eq!(response.headers()[header::VARY], "Accept");
    }

    #[test]
    fn test_unreadable_accept_is_not_acceptable() {
        let dispatcher = build_dispatcher(&RestConfig::default()).unwrap();
        let value = RestValue::new("Root");

        let mut headers = HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_bytes(b"application/json\xff").unwrap(),
        );
        let response = negotiate(&dispatcher, &headers, StatusCode::OK, &value);
        assert_eq!(response.status(), StatusCode::NOT_ACCEPTABLE);

        let response = negotiate(&dispatcher, &HeaderMap::new(), StatusCode::OK, &value);
        assert_eq!(response.status(), StatusCode::OK);
    }
}
