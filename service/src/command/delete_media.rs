//! [`Command`] for deleting a [`Media`].

use common::operations::{Authorize, Authorized, Delete};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::Media;
use crate::{
    domain::{media, user::Credentials},
    infra::{upstream, Upstream},
    Service,
};

use super::Command;

/// [`Command`] for permanently deleting a [`Media`].
#[derive(Clone, Debug)]
pub struct DeleteMedia {
    /// [`Credentials`] to act with.
    pub credentials: Credentials,

    /// ID of the [`Media`] to delete.
    pub id: media::Id,
}

impl<Up, Ml, Pg> Command<DeleteMedia> for Service<Up, Ml, Pg>
where
    Up: Upstream<Authorize<Credentials>, Err = Traced<upstream::Error>>,
    Authorized<Up, Credentials>:
        Upstream<Delete<media::Id>, Ok = (), Err = Traced<upstream::Error>>,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: DeleteMedia) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteMedia { credentials, id } = cmd;

        self.authorized_upstream(credentials)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .execute(Delete(id))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tracing::info!(%id, "media deleted");

        Ok(())
    }
}

/// Error of [`DeleteMedia`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Upstream`] error.
    #[display("`Upstream` operation failed: {_0}")]
    Upstream(upstream::Error),
}
