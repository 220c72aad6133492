//! [`Session`]-related definitions.

use std::time::Duration;

use axum::{async_trait, extract::FromRequestParts, Extension};
use axum_extra::extract::{
    cookie::{Cookie, SameSite},
    CookieJar,
};
use service::{
    command::{self, Command as _},
    domain::user::session,
};

use crate::{define_error, AsError, Error, Service};

/// Settings of the session cookie.
#[derive(Clone, Debug)]
pub struct CookieConfig {
    /// Name of the cookie.
    pub name: String,

    /// Whether the cookie is restricted to HTTPS.
    pub secure: bool,

    /// Lifetime of the cookie.
    pub max_age: Duration,
}

impl CookieConfig {
    /// Creates a new session cookie holding the provided [`session::Token`].
    #[must_use]
    pub fn cookie(&self, token: &session::Token) -> Cookie<'static> {
        Cookie::build((self.name.clone(), token.to_string()))
            .http_only(true)
            .same_site(SameSite::Lax)
            .path("/")
            .secure(self.secure)
            .max_age(
                self.max_age
                    .try_into()
                    .unwrap_or(time::Duration::MAX),
            )
            .build()
    }

    /// Creates a cookie removing the session cookie from the browser.
    #[must_use]
    pub fn removal(&self) -> Cookie<'static> {
        let mut cookie = Cookie::build((self.name.clone(), ""))
            .http_only(true)
            .same_site(SameSite::Lax)
            .path("/")
            .secure(self.secure)
            .build();
        cookie.make_removal();
        cookie
    }
}

/// Authenticated [`session::Session`] of the current request.
///
/// Rejects the request with `401 Unauthorized` if there is no valid one.
#[derive(Clone, Debug)]
pub struct Session(pub session::Session);

/// [`Session`] of the current request, if there is a valid one.
#[derive(Clone, Debug)]
pub struct MaybeSession(pub Option<session::Session>);

impl MaybeSession {
    /// Resolves the [`session::Session`] stored in the provided
    /// [`CookieJar`].
    ///
    /// Missing, malformed and expired cookies all resolve to [`None`].
    pub(crate) async fn resolve(
        service: &Service,
        cookies: &CookieConfig,
        jar: &CookieJar,
    ) -> Option<session::Session> {
        let value = jar.get(&cookies.name)?.value();
        let token = value.parse::<session::Token>().ok()?;

        service
            .execute(command::AuthorizeUserSession { token })
            .await
            .inspect_err(|e| tracing::debug!("session refused: {e}"))
            .ok()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for MaybeSession
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut http::request::Parts,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let Extension(service) =
            Extension::<Service>::from_request_parts(parts, state)
                .await
                .map_err(|_| Error::internal(&"missing `Service` extension"))?;
        let Extension(cookies) =
            Extension::<CookieConfig>::from_request_parts(parts, state)
                .await
                .map_err(|_| {
                    Error::internal(&"missing `CookieConfig` extension")
                })?;
        let jar = CookieJar::from_headers(&parts.headers);

        Ok(Self(Self::resolve(&service, &cookies, &jar).await))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut http::request::Parts,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        MaybeSession::from_request_parts(parts, state)
            .await?
            .0
            .map(Self)
            .ok_or_else(|| AuthError::Unauthorized.into())
    }
}

impl AsError for command::authorize_user_session::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Expired => Some(AuthError::Unauthorized.into()),
            Self::JsonWebTokenDecodeError(_) => {
                Some(AuthError::InvalidToken.into())
            }
        }
    }
}

define_error! {
    enum AuthError {
        #[code = "UNAUTHORIZED"]
        #[status = UNAUTHORIZED]
        #[message = "Bitte melde dich an."]
        Unauthorized,

        #[code = "INVALID_TOKEN"]
        #[status = UNAUTHORIZED]
        #[message = "Die Sitzung ist ungültig. Bitte melde dich erneut an."]
        InvalidToken,
    }
}
