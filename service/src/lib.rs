//! Service contains the business logic of the application.
//!
//! List of available Cargo features:
#![doc = document_features::document_features!()]
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

pub mod command;
pub mod domain;
pub mod infra;
pub mod query;

use std::time::Duration;

use common::operations::{Authorize, Authorized};
use derive_more::Debug;
use secrecy::SecretBox;
use tracerr::Traced;

use crate::{
    domain::user::Credentials,
    infra::{upstream, Upstream},
};

#[cfg(doc)]
use infra::{Mailer, Pages};

pub use self::{command::Command, query::Query};

/// [`Service`] configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// [JWT] encoding key.
    ///
    /// [JWT]: https://datatracker.ietf.org/doc/html/rfc7519
    #[debug(skip)]
    pub jwt_encoding_key: jsonwebtoken::EncodingKey,

    /// [JWT] decoding key.
    ///
    /// [JWT]: https://datatracker.ietf.org/doc/html/rfc7519
    #[debug(skip)]
    pub jwt_decoding_key: jsonwebtoken::DecodingKey,

    /// Lifetime of a [`domain::user::Session`].
    pub session_ttl: Duration,

    /// [`domain::page::Secret`] authorizing page invalidation requests.
    ///
    /// [`command::RevalidatePages`] is refused if it's not set.
    #[debug(skip)]
    pub revalidation_secret: Option<SecretBox<domain::page::Secret>>,
}

/// Domain service.
#[derive(Clone, Debug)]
pub struct Service<Up, Ml, Pg> {
    /// Configuration of this [`Service`].
    config: Config,

    /// [`Upstream`] of this [`Service`].
    upstream: Up,

    /// [`Mailer`] of this [`Service`].
    mailer: Ml,

    /// [`Pages`] of this [`Service`].
    pages: Pg,
}

impl<Up, Ml, Pg> Service<Up, Ml, Pg> {
    /// Creates a new [`Service`] with the provided parameters.
    #[must_use]
    pub const fn new(
        config: Config,
        upstream: Up,
        mailer: Ml,
        pages: Pg,
    ) -> Self {
        Self {
            config,
            upstream,
            mailer,
            pages,
        }
    }

    /// Returns [`Config`] of this [`Service`].
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Returns [`Upstream`] of this [`Service`].
    ///
    /// It's anonymous: [`common::operations::Authorize`] it to act on behalf
    /// of a user.
    #[must_use]
    pub const fn upstream(&self) -> &Up {
        &self.upstream
    }

    /// Returns [`Mailer`] of this [`Service`].
    #[must_use]
    pub const fn mailer(&self) -> &Ml {
        &self.mailer
    }

    /// Returns [`Pages`] of this [`Service`].
    #[must_use]
    pub const fn pages(&self) -> &Pg {
        &self.pages
    }

    /// Returns [`Upstream`] of this [`Service`] [`Authorize`]d with the
    /// provided [`Credentials`].
    ///
    /// # Errors
    ///
    /// If the [`Upstream`] fails to [`Authorize`] itself.
    pub(crate) async fn authorized_upstream(
        &self,
        credentials: Credentials,
    ) -> Result<Authorized<Up, Credentials>, Traced<upstream::Error>>
    where
        Up: Upstream<Authorize<Credentials>, Err = Traced<upstream::Error>>,
    {
        self.upstream
            .execute(Authorize(credentials))
            .await
            .map_err(tracerr::wrap!())
    }
}
