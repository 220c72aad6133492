//! Authentication endpoints.

use axum::{response::IntoResponse, Extension};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};
use service::{
    command::{self, Command as _},
    domain::user::{self, Credentials},
};

use crate::{
    api::{Done, Json},
    define_error,
    session::{CookieConfig, Session},
    AsError, Error, Service,
};

/// Login form.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginInput {
    /// Login of the upstream user.
    #[serde(default)]
    pub username: String,

    /// Application password of the upstream user.
    #[serde(default)]
    pub password: String,
}

impl LoginInput {
    /// Validates this [`LoginInput`] into [`Credentials`].
    ///
    /// # Errors
    ///
    /// With the first violated rule.
    fn validate(self) -> Result<Credentials, Error> {
        let username = self.username.trim();
        if username.is_empty() {
            return Err(LoginError::UsernameRequired.into());
        }
        let login =
            user::Login::new(username).ok_or(LoginError::UsernameInvalid)?;
        let password = user::Password::new(self.password)
            .ok_or(LoginError::PasswordRequired)?;
        Ok(Credentials::new(login, password))
    }
}

/// Authenticated user, as exposed by the API.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// ID of the upstream user.
    pub id: user::Id,

    /// Display name of the upstream user.
    pub name: user::Name,

    /// Email of the upstream user, if known.
    pub email: Option<user::Email>,
}

/// Current session, as exposed by the API.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionOutput {
    /// [`User`] of the session.
    pub user: User,

    /// Moment the session expires at.
    #[serde(serialize_with = "common::datetime::serde::rfc3339::serialize")]
    pub expires_at: user::session::ExpirationDateTime,
}

impl From<user::Session> for SessionOutput {
    fn from(session: user::Session) -> Self {
        let user::User { id, name, email } = session.user;
        Self {
            user: User { id, name, email },
            expires_at: session.expires_at,
        }
    }
}

/// Verifies the provided credentials upstream and opens a new session.
///
/// # Errors
///
/// If the credentials are malformed or refused upstream.
#[tracing::instrument(
    name = "auth.login",
    skip_all,
    fields(username = %input.username),
)]
pub async fn login(
    Extension(service): Extension<Service>,
    Extension(cookies): Extension<CookieConfig>,
    jar: CookieJar,
    Json(input): Json<LoginInput>,
) -> Result<impl IntoResponse, Error> {
    let credentials = input.validate()?;

    let command::create_user_session::Output { token, session } = service
        .execute(command::CreateUserSession { credentials })
        .await
        .map_err(AsError::into_error)?;

    tracing::info!(user = %session.user.id, "session opened");

    Ok((
        jar.add(cookies.cookie(&token)),
        Json(SessionOutput::from(session)),
    ))
}

/// Closes the current session, if any.
#[tracing::instrument(name = "auth.logout", skip_all)]
pub async fn logout(
    Extension(cookies): Extension<CookieConfig>,
    jar: CookieJar,
) -> impl IntoResponse {
    (jar.add(cookies.removal()), Done::OK)
}

/// Returns the current session.
#[tracing::instrument(name = "auth.session", skip_all)]
pub async fn session(Session(session): Session) -> Json<SessionOutput> {
    Json(session.into())
}

impl AsError for command::create_user_session::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "WRONG_CREDENTIALS"]
                #[status = UNAUTHORIZED]
                #[message = "Benutzername oder Passwort ist falsch."]
                WrongCredentials,

                #[code = "APPLICATION_PASSWORD_REQUIRED"]
                #[status = UNAUTHORIZED]
                #[message = "WordPress verlangt ein Anwendungspasswort. \
                             Erstelle eines in deinem WordPress-Profil und \
                             melde dich damit an."]
                ApplicationPasswordRequired,
            }
        }

        match self {
            Self::WrongCredentials => Some(Error::WrongCredentials.into()),
            Self::ApplicationPasswordRequired => {
                Some(Error::ApplicationPasswordRequired.into())
            }
            Self::JsonWebTokenEncodeError(_) => None,
        }
    }
}

define_error! {
    enum LoginError {
        #[code = "VALIDATION_ERROR"]
        #[status = BAD_REQUEST]
        #[message = "Benutzername ist erforderlich."]
        UsernameRequired,

        #[code = "VALIDATION_ERROR"]
        #[status = BAD_REQUEST]
        #[message = "Der Benutzername ist ungültig."]
        UsernameInvalid,

        #[code = "VALIDATION_ERROR"]
        #[status = BAD_REQUEST]
        #[message = "Passwort ist erforderlich."]
        PasswordRequired,
    }
}
