use axum::{
    extract::Request,
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

/// Request ID carried through handlers as a request extension; every
/// response envelope echoes it in `meta.request_id`.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Tags each request with an ID for log correlation.
///
/// A caller-supplied `x-request-id` header wins; otherwise a fresh
/// `UUIDv4` is minted. The ID lands in the request extensions as
/// [`RequestId`] and is echoed back on the response header.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;

    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert("x-request-id", val);
    }

    res
}
