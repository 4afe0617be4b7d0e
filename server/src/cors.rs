use axum::http::{Method, header};
use tower_http::cors::{Any, CorsLayer};

pub const ALLOWED_METHODS: [Method; 3] = [Method::POST, Method::GET, Method::OPTIONS];

/// Any origin may call the mirror. `OPTIONS` is answered by the layer itself
/// with an empty body, so it never reaches a handler.
pub fn layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(ALLOWED_METHODS)
        .allow_headers([header::CONTENT_TYPE])
}
