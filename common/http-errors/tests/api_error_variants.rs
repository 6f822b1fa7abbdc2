use axum::http::StatusCode;
use axum::response::IntoResponse;
use common_http_errors::ApiError;
use uuid::Uuid;

#[test]
fn bad_request_variant() {
    let err = ApiError::BadRequest { code: "missing_code", trace_id: None, message: None };
    let resp = err.into_response();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(resp.headers().get("X-Error-Code").unwrap(), "missing_code");
}

#[test]
fn not_found_variant() {
    let err = ApiError::NotFound { code: "missing_resource", trace_id: None };
    let resp = err.into_response();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(resp.headers().get("X-Error-Code").unwrap(), "missing_resource");
}

#[test]
fn bad_gateway_variant() {
    let err = ApiError::bad_gateway("rule_provider_failure", "connect timeout", None);
    let resp = err.into_response();
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(
        resp.headers().get("X-Error-Code").unwrap(),
        "rule_provider_failure"
    );
}

#[test]
fn internal_variant_carries_trace_id() {
    let trace = Some(Uuid::new_v4());
    let err = ApiError::internal("boom", trace);
    let resp = err.into_response();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(resp.headers().get("X-Error-Code").unwrap(), "internal_error");
}

#[tokio::test]
async fn error_envelope_is_json() {
    use axum::body::to_bytes;
    let err = ApiError::BadRequest {
        code: "missing_code",
        trace_id: None,
        message: Some("code required".into()),
    };
    let resp = err.into_response();
    let body = to_bytes(resp.into_body(), 1024 * 8).await.unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("\"code\":\"missing_code\""), "unexpected body: {}", text);
    assert!(text.contains("\"message\":\"code required\""), "unexpected body: {}", text);
}
