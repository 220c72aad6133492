//! [`Command`] for creating a [`Session`].

use common::{
    operations::{Authorize, Authorized, By, Select},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::user::session::Token;
use crate::{
    domain::{
        user::{self, session, Credentials, Session},
        User,
    },
    infra::{upstream, Upstream},
    Service,
};

use super::Command;

/// [`Command`] for creating a [`Session`].
///
/// [`Credentials`] are verified by upstream itself, and successful
/// verification is the only access check there is.
#[derive(Clone, Debug, From)]
pub struct CreateUserSession {
    /// [`Credentials`] to create a [`Session`] with.
    pub credentials: Credentials,
}

/// Output of [`CreateUserSession`] [`Command`].
#[derive(Clone, Debug)]
pub struct Output {
    /// [`Token`] of the created [`Session`].
    pub token: session::Token,

    /// Created [`Session`].
    pub session: Session,
}

impl<Up, Ml, Pg> Command<CreateUserSession> for Service<Up, Ml, Pg>
where
    Up: Upstream<Authorize<Credentials>, Err = Traced<upstream::Error>>,
    Authorized<Up, Credentials>: Upstream<
        Select<By<User, user::Current>>,
        Ok = User,
        Err = Traced<upstream::Error>,
    >,
{
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateUserSession,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateUserSession { credentials } = cmd;

        let verified = match self.authorized_upstream(credentials.clone()).await
        {
            Ok(upstream) => {
                upstream
                    .execute(Select(By::<User, _>::new(user::Current)))
                    .await
            }
            Err(e) => Err(e),
        };
        let user = verified.map_err(|e| {
            let policy = e
                .as_ref()
                .rejection()
                .is_some_and(upstream::Rejection::requires_application_password);
            if policy {
                tracing::info!(
                    login = %credentials.login,
                    "login refused: application password required",
                );
                tracerr::new!(E::ApplicationPasswordRequired)
            } else {
                tracing::info!(
                    login = %credentials.login,
                    "login refused: {e}",
                );
                tracerr::new!(E::WrongCredentials)
            }
        })?;

        let expires_at = (DateTime::now() + self.config().session_ttl).coerce();
        let session = Session {
            user,
            credentials,
            expires_at,
        };
        let token = jsonwebtoken::encode::<Session>(
            &jsonwebtoken::Header::default(),
            &session,
            &self.config().jwt_encoding_key,
        )
        .map_err(tracerr::from_and_wrap!(=> E))?;

        // SAFETY: `jsonwebtoken::encode` always returns a valid
        //         `session::Token`.
        #[expect(unsafe_code, reason = "invariants are preserved")]
        let token = unsafe { session::Token::new_unchecked(token) };

        Ok(Output { token, session })
    }
}

/// Error of [`CreateUserSession`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// Upstream security policy requires an application password instead
    /// of the primary one.
    #[display("Application password required")]
    ApplicationPasswordRequired,

    /// [`jsonwebtoken`] encoding error.
    #[display("Failed to encode a JSON Web Token: {_0}")]
    JsonWebTokenEncodeError(jsonwebtoken::errors::Error),

    /// [`CreateUserSession`] contains wrong [`Credentials`].
    #[display("Wrong `User` credentials")]
    WrongCredentials,
}
