//! [WordPress REST API] [`Upstream`] implementation.
//!
//! [WordPress REST API]: https://developer.wordpress.org/rest-api

mod app_password;
mod media;
mod post;
mod user;

use std::{sync::Arc, time::Duration};

use common::{operations::Authorize, pagination, Handler};
use derive_more::{Display, Error as StdError, From};
use reqwest::{header, Method, RequestBuilder, Response};
use secrecy::ExposeSecret as _;
use serde::de::DeserializeOwned;
use smart_default::SmartDefault;
use tracerr::Traced;

#[cfg(doc)]
use crate::infra::Upstream;
use crate::{
    domain::user::Credentials,
    infra::upstream::{self, Rejection},
};

/// [`WordPress`] client configuration.
#[derive(Clone, Debug, SmartDefault)]
pub struct Config {
    /// Root URL of the REST API (usually ending with `/wp-json`).
    #[default("http://127.0.0.1:8000/wp-json".to_owned())]
    pub url: String,

    /// Timeout of a single request.
    #[default(Duration::from_secs(30))]
    pub timeout: Duration,
}

/// [WordPress REST API] client.
///
/// [WordPress REST API]: https://developer.wordpress.org/rest-api
#[derive(Clone, Debug)]
pub struct WordPress<A = Anonymous> {
    /// Underlying HTTP client.
    client: reqwest::Client,

    /// Root URL of the REST API, without a trailing slash.
    root: Arc<str>,

    /// [`Auth`]entication of the requests.
    auth: A,
}

/// Anonymous [`Auth`]: requests see public content only.
#[derive(Clone, Copy, Debug)]
pub struct Anonymous;

/// [HTTP Basic] [`Auth`] with [`Credentials`] of a user.
///
/// [HTTP Basic]: https://datatracker.ietf.org/doc/html/rfc7617
#[derive(Clone, Debug)]
pub struct Basic(Credentials);

/// Authentication of [`WordPress`] requests.
pub trait Auth {
    /// Indicates whether requests are made on behalf of a user, so the edit
    /// context and non-public statuses are available.
    const AUTHORIZED: bool;

    /// Applies this [`Auth`] to the provided request.
    fn apply(&self, request: RequestBuilder) -> RequestBuilder;
}

impl Auth for Anonymous {
    const AUTHORIZED: bool = false;

    fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        request
    }
}

impl Auth for Basic {
    const AUTHORIZED: bool = true;

    fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        let Credentials { login, password } = &self.0;
        request.basic_auth(login, Some(password.expose_secret()))
    }
}

impl WordPress {
    /// Creates a new anonymous [`WordPress`] client with the provided
    /// [`Config`].
    ///
    /// # Errors
    ///
    /// If failed to initialize the underlying HTTP client.
    pub fn new(conf: &Config) -> Result<Self, Traced<upstream::Error>> {
        let client = reqwest::Client::builder()
            .timeout(conf.timeout)
            .user_agent(concat!("studio/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?;
        Ok(Self {
            client,
            root: conf.url.trim_end_matches('/').into(),
            auth: Anonymous,
        })
    }
}

impl<A: Auth> WordPress<A> {
    /// Starts a new request to the provided REST API `route`.
    fn request(&self, method: Method, route: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.root, route.trim_start_matches('/'));
        self.auth.apply(
            self.client
                .request(method, url)
                .header(header::ACCEPT, "application/json"),
        )
    }

    /// Sends the provided request, turning error responses into
    /// [`Rejection`]s.
    async fn send(
        request: RequestBuilder,
    ) -> Result<Response, Traced<upstream::Error>> {
        let response = request
            .send()
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?;
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let rejection = serde_json::from_str::<Rejection>(&body)
            .ok()
            .filter(|r| !r.message.is_empty() || r.code.is_some())
            .map_or_else(
                || Rejection {
                    status: status.as_u16(),
                    code: None,
                    message: if body.trim().is_empty() {
                        status
                            .canonical_reason()
                            .unwrap_or_default()
                            .to_owned()
                    } else {
                        body.trim().to_owned()
                    },
                },
                |r| Rejection {
                    status: status.as_u16(),
                    ..r
                },
            );
        tracing::debug!("WordPress rejected the request: {rejection}");

        Err(tracerr::new!(upstream::Error::Rejected(rejection)))
    }

    /// Sends the provided request and decodes its JSON response.
    async fn json<T: DeserializeOwned>(
        request: RequestBuilder,
    ) -> Result<T, Traced<upstream::Error>> {
        Self::send(request)
            .await
            .map_err(tracerr::wrap!())?
            .json::<T>()
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)
    }
}

impl Handler<Authorize<Credentials>> for WordPress {
    type Ok = WordPress<Basic>;
    type Err = Traced<upstream::Error>;

    async fn execute(
        &self,
        Authorize(credentials): Authorize<Credentials>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(WordPress {
            client: self.client.clone(),
            root: Arc::clone(&self.root),
            auth: Basic(credentials),
        })
    }
}

impl<A: Auth> WordPress<A> {
    /// Returns the `context` query parameter matching the [`Auth`].
    const fn context() -> &'static str {
        if A::AUTHORIZED {
            "edit"
        } else {
            "view"
        }
    }

    /// Sends the provided request for a collection and decodes its JSON
    /// response into a [`pagination::Page`].
    ///
    /// Totals are read from the `X-WP-Total` and `X-WP-TotalPages` headers,
    /// falling back to the size of the returned collection.
    async fn page<T: DeserializeOwned>(
        request: RequestBuilder,
        args: pagination::Arguments,
    ) -> Result<pagination::Page<T>, Traced<upstream::Error>> {
        let request = request.query(&[
            ("page", args.page.to_string()),
            ("per_page", args.per_page.to_string()),
        ]);
        let response = Self::send(request).await.map_err(tracerr::wrap!())?;

        let total = header_number(&response, "X-WP-Total");
        let total_pages = header_number(&response, "X-WP-TotalPages");
        let items = response
            .json::<Vec<T>>()
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?;

        let total = total
            .unwrap_or_else(|| u64::try_from(items.len()).unwrap_or(u64::MAX));
        Ok(pagination::Page {
            total_pages: total_pages.map_or_else(
                || {
                    u32::try_from(total.div_ceil(u64::from(args.per_page)))
                        .unwrap_or(u32::MAX)
                },
                |p| u32::try_from(p).unwrap_or(u32::MAX),
            ),
            items,
            page: args.page,
            per_page: args.per_page,
            total,
        })
    }
}

/// Reads a numeric header of the provided [`Response`].
fn header_number(response: &Response, name: &str) -> Option<u64> {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

/// [`WordPress`] client error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// HTTP transport or decoding error.
    #[display("HTTP request to WordPress failed: {_0}")]
    Http(reqwest::Error),
}
