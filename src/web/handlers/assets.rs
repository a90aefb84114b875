//! Static assets compiled into the binary.

use axum::{
    http::header,
    response::{IntoResponse, Response},
};

const STYLESHEET: &str = include_str!("../../../static/style.css");

pub async fn stylesheet_handler() -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/css; charset=utf-8"),
            (header::CACHE_CONTROL, "public, max-age=3600"),
        ],
        STYLESHEET,
    )
        .into_response()
}
