//! HTTP API definitions.

pub mod app_password;
pub mod auth;
pub mod mail;
pub mod media;
pub mod post;
pub mod revalidate;
pub mod stats;

use axum::{
    extract::{DefaultBodyLimit, FromRequest, FromRequestParts},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Router,
};
use serde::Serialize;

use crate::Error;

/// Maximum size of an uploaded media file.
pub const MAX_UPLOAD_SIZE: usize = 64 * 1024 * 1024;

/// Builds the [`Router`] of the whole HTTP API.
#[must_use]
pub fn router() -> Router {
    Router::new()
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/session", get(auth::session))
        .route("/api/admin/stats", get(stats::dashboard))
        .route("/api/admin/posts/:kind", get(post::list).post(post::create))
        .route(
            "/api/admin/posts/:kind/:id",
            get(post::read).put(post::update).delete(post::delete),
        )
        .route(
            "/api/admin/media",
            get(media::list)
                .post(media::upload)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_SIZE)),
        )
        .route("/api/admin/media/:id", delete(media::delete))
        .route(
            "/api/admin/app-passwords",
            get(app_password::list).post(app_password::issue),
        )
        .route("/api/admin/app-passwords/:uuid", delete(app_password::revoke))
        .route("/api/posts/:kind", get(post::public_list))
        .route("/api/posts/:kind/:id", get(post::public_read))
        .route("/api/contact", post(mail::contact))
        .route("/api/newsletter", post(mail::newsletter))
        .route(
            "/api/revalidate",
            get(revalidate::by_query).post(revalidate::by_body),
        )
}

/// JSON extractor and response, rejecting with an [`Error`].
#[derive(Clone, Copy, Debug, Default, FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

/// Path parameters extractor, rejecting with an [`Error`].
#[derive(Clone, Copy, Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(Error))]
pub struct Path<T>(pub T);

/// Query string extractor, rejecting with an [`Error`].
#[derive(Clone, Copy, Debug, Default, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(Error))]
pub struct Query<T>(pub T);

/// Acknowledgement of an operation without a meaningful result.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct Done {
    /// Always `true`.
    pub success: bool,
}

impl Done {
    /// Acknowledges a successful operation.
    pub const OK: Json<Self> = Json(Self { success: true });
}
