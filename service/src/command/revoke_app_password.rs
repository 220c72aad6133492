//! [`Command`] for revoking an [`AppPassword`].

use common::operations::{Authorize, Authorized, By, Delete};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use uuid::Uuid;

use crate::{
    domain::{user::Credentials, AppPassword},
    infra::{upstream, Upstream},
    Service,
};

use super::Command;

/// [`Command`] for revoking an [`AppPassword`] of the current user.
#[derive(Clone, Debug)]
pub struct RevokeAppPassword {
    /// [`Credentials`] to act with.
    pub credentials: Credentials,

    /// [`Uuid`] of the [`AppPassword`] to revoke.
    pub uuid: Uuid,
}

impl<Up, Ml, Pg> Command<RevokeAppPassword> for Service<Up, Ml, Pg>
where
    Up: Upstream<Authorize<Credentials>, Err = Traced<upstream::Error>>,
    Authorized<Up, Credentials>: Upstream<
        Delete<By<AppPassword, Uuid>>,
        Ok = (),
        Err = Traced<upstream::Error>,
    >,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: RevokeAppPassword,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RevokeAppPassword { credentials, uuid } = cmd;

        self.authorized_upstream(credentials)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .execute(Delete(By::<AppPassword, _>::new(uuid)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tracing::info!(%uuid, "application password revoked");

        Ok(())
    }
}

/// Error of [`RevokeAppPassword`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Upstream`] error.
    #[display("`Upstream` operation failed: {_0}")]
    Upstream(upstream::Error),
}
