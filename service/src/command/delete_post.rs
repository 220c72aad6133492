//! [`Command`] for deleting a [`Post`].

use common::operations::{Authorize, Authorized, Delete};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{post, user::Credentials},
    infra::{upstream, Upstream},
    Service,
};

#[cfg(doc)]
use crate::domain::Post;

use super::Command;

/// [`Command`] for deleting a [`Post`].
#[derive(Clone, Debug)]
pub struct DeletePost {
    /// [`Credentials`] to act with.
    pub credentials: Credentials,

    /// [`post::Removal`] to perform.
    pub removal: post::Removal,
}

impl<Up, Ml, Pg> Command<DeletePost> for Service<Up, Ml, Pg>
where
    Up: Upstream<Authorize<Credentials>, Err = Traced<upstream::Error>>,
    Authorized<Up, Credentials>: Upstream<
        Delete<post::Removal>,
        Ok = (),
        Err = Traced<upstream::Error>,
    >,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: DeletePost) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeletePost {
            credentials,
            removal,
        } = cmd;

        self.authorized_upstream(credentials)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .execute(Delete(removal))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tracing::info!(
            key = %removal.key,
            force = removal.force,
            "post deleted",
        );

        Ok(())
    }
}

/// Error of [`DeletePost`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Upstream`] error.
    #[display("`Upstream` operation failed: {_0}")]
    Upstream(upstream::Error),
}
