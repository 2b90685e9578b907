use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, Response as HttpResponse, StatusCode},
    response::Response,
};
use decoder_protocol::{serialize_json, ErrorEnvelope, ScoreResponse};
use serde::Serialize;

pub(crate) fn error_response(code: &str, message: String) -> ScoreResponse {
    ScoreResponse::rejected(ErrorEnvelope::new(code, message))
}

pub(crate) fn build_response(
    status: StatusCode,
    response: &ScoreResponse,
) -> Result<Response, StatusCode> {
    json_response(status, response)
}

pub(crate) fn json_response<T: Serialize>(
    status: StatusCode,
    value: &T,
) -> Result<Response, StatusCode> {
    let bytes = serialize_json(value)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .into_bytes();

    HttpResponse::builder()
        .status(status)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(bytes))
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

pub(crate) fn html_response(status: StatusCode, html: String) -> Result<Response, StatusCode> {
    HttpResponse::builder()
        .status(status)
        .header(CONTENT_TYPE, "text/html; charset=utf-8")
        .body(Body::from(html))
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}
