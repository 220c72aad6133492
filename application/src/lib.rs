//! Application provides HTTP API for interacting with the [`Service`].

#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod admin;
pub mod api;
pub mod args;
pub mod config;
pub mod error;
pub mod session;

use axum::{middleware, Extension, Router};
use service::infra::{Frontend, Resend, WordPress};
use tower_http::services::ServeDir;
// Used in binary.
use axum_client_ip as _;
use tokio as _;
use tracing_subscriber as _;
#[cfg(test)]
use tower as _;

pub use self::{
    args::Args,
    config::Config,
    error::{AsError, Error},
    session::{CookieConfig, Session},
};

/// [`Service`] with filled infrastructure dependencies.
///
/// [`Service`]: service::Service
pub type Service = service::Service<WordPress, Resend, Frontend>;

/// Builds the [`Router`] serving the HTTP API and the admin UI assets from
/// the provided `admin_dir`.
#[must_use]
pub fn router(
    service: Service,
    cookies: CookieConfig,
    admin_dir: &str,
) -> Router {
    let admin = Router::new()
        .nest_service(admin::PATH, ServeDir::new(admin_dir))
        .layer(middleware::from_fn(admin::gate));

    api::router()
        .merge(admin)
        .layer(Extension(cookies))
        .layer(Extension(service))
}
