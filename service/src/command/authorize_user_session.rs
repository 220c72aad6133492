//! [`Command`] for authorizing a [`Session`].

use common::DateTime;
use derive_more::{Display, Error, From};
use jsonwebtoken::{errors::ErrorKind, Validation};
use tracerr::Traced;

use crate::{
    domain::user::{session, Session},
    Service,
};

use super::Command;

/// [`Command`] for authorizing a [`Session`] by its [`session::Token`].
///
/// Doesn't touch upstream: the [`session::Token`] is self-contained.
#[derive(Clone, Debug, From)]
pub struct AuthorizeUserSession {
    /// [`Session`] token to authorize.
    pub token: session::Token,
}

impl<Up, Ml, Pg> Command<AuthorizeUserSession> for Service<Up, Ml, Pg> {
    type Ok = Session;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: AuthorizeUserSession,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let AuthorizeUserSession { token } = cmd;

        let mut validation = Validation::default();
        validation.leeway = 0;

        let session = jsonwebtoken::decode::<Session>(
            token.as_ref(),
            &self.config().jwt_decoding_key,
            &validation,
        )
        .map_err(|e| {
            if matches!(e.kind(), ErrorKind::ExpiredSignature) {
                tracerr::new!(E::Expired)
            } else {
                tracerr::new!(E::JsonWebTokenDecodeError(e))
            }
        })?
        .claims;

        if session.is_expired_at(DateTime::now().coerce()) {
            return Err(tracerr::new!(E::Expired));
        }

        Ok(session)
    }
}

/// Error of [`AuthorizeUserSession`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`jsonwebtoken`] decoding error.
    #[display("Failed to decode a JSON Web Token: {_0}")]
    JsonWebTokenDecodeError(jsonwebtoken::errors::Error),

    /// [`Session`] has expired.
    #[display("`Session` has expired")]
    Expired,
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::DateTime;

    use crate::{
        command::spec::{config, credentials, service, Fake},
        domain::{
            user::{session::Token, Session},
            User,
        },
    };

    use super::{AuthorizeUserSession, Command as _, ExecutionError};

    fn token(session: &Session, secret: &[u8]) -> Token {
        let token = jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            session,
            &jsonwebtoken::EncodingKey::from_secret(secret),
        )
        .unwrap();
        #[expect(unsafe_code, reason = "test token")]
        unsafe {
            Token::new_unchecked(token)
        }
    }

    fn session(expires_at: DateTime) -> Session {
        Session {
            user: User {
                id: 1.into(),
                name: "Admin".parse().unwrap(),
                email: None,
            },
            credentials: credentials(),
            expires_at: expires_at.coerce(),
        }
    }

    #[tokio::test]
    async fn rejects_expired_session() {
        let expired = session(DateTime::now() - Duration::from_secs(1));

        let err = service(Fake::default())
            .execute(AuthorizeUserSession {
                token: token(&expired, b"secret"),
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::Expired));
    }

    #[tokio::test]
    async fn rejects_tampered_session() {
        let valid = session(DateTime::now() + Duration::from_secs(60));

        let err = service(Fake::default())
            .execute(AuthorizeUserSession {
                token: token(&valid, b"forged"),
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::JsonWebTokenDecodeError(_),
        ));
    }

    #[tokio::test]
    async fn accepts_live_session() {
        let valid = session(DateTime::now() + Duration::from_secs(60));
        assert!(config().session_ttl > Duration::from_secs(60));

        let session = service(Fake::default())
            .execute(AuthorizeUserSession {
                token: token(&valid, b"secret"),
            })
            .await
            .unwrap();

        assert_eq!(session.user.id, 1.into());
    }
}
