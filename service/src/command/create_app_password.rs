//! [`Command`] for issuing a new [`AppPassword`].

use common::operations::{Authorize, Authorized, Insert};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::AppPassword;
use crate::{
    domain::{
        app_password::{self, Issued},
        user::Credentials,
    },
    infra::{upstream, Upstream},
    Service,
};

use super::Command;

/// [`Command`] for issuing a new [`AppPassword`] to the current user.
#[derive(Clone, Debug)]
pub struct CreateAppPassword {
    /// [`Credentials`] to act with.
    pub credentials: Credentials,

    /// [`app_password::Name`] of the new [`AppPassword`].
    pub name: app_password::Name,
}

impl<Up, Ml, Pg> Command<CreateAppPassword> for Service<Up, Ml, Pg>
where
    Up: Upstream<Authorize<Credentials>, Err = Traced<upstream::Error>>,
    Authorized<Up, Credentials>: Upstream<
        Insert<app_password::Name>,
        Ok = Issued,
        Err = Traced<upstream::Error>,
    >,
{
    type Ok = Issued;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateAppPassword,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateAppPassword { credentials, name } = cmd;

        let issued = self
            .authorized_upstream(credentials)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .execute(Insert(name))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tracing::info!(
            uuid = %issued.app_password.uuid,
            "application password issued",
        );

        Ok(issued)
    }
}

/// Error of [`CreateAppPassword`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Upstream`] error.
    #[display("`Upstream` operation failed: {_0}")]
    Upstream(upstream::Error),
}

#[cfg(test)]
mod spec {
    use crate::{
        command::spec::{credentials, service, Call, Fake},
        domain::app_password::Name,
    };

    use super::{Command as _, CreateAppPassword};

    #[tokio::test]
    async fn reveals_password_once() {
        let fake = Fake::default();

        let issued = service(fake.clone())
            .execute(CreateAppPassword {
                credentials: credentials(),
                name: Name::new("Laptop").unwrap(),
            })
            .await
            .unwrap();

        assert_eq!(issued.app_password.name.as_ref(), "Laptop");
        assert!(!issued.password.is_empty());
        assert_eq!(fake.calls(), [Call::Insert]);
    }
}
