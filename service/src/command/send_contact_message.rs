//! [`Command`] for relaying a [`ContactMessage`] to the studio.

use common::operations::Deliver;
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::mail::{ContactMessage, Email},
    infra::{mailer, Mailer},
    Service,
};

use super::Command;

/// [`Command`] for relaying a [`ContactMessage`] to the studio as an
/// [`Email`].
#[derive(Clone, Debug, From)]
pub struct SendContactMessage(pub ContactMessage);

impl<Up, Ml, Pg> Command<SendContactMessage> for Service<Up, Ml, Pg>
where
    Ml: Mailer<Deliver<Email>, Ok = (), Err = Traced<mailer::Error>>,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        SendContactMessage(msg): SendContactMessage,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        self.mailer()
            .execute(Deliver(msg.to_email()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
    }
}

/// Error of [`SendContactMessage`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Mailer`] error.
    #[display("`Mailer` operation failed: {_0}")]
    Mailer(mailer::Error),
}
