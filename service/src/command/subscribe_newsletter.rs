//! [`Command`] for relaying a [`NewsletterSignup`] to the studio.

use common::operations::Deliver;
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::mail::{Email, NewsletterSignup},
    infra::{mailer, Mailer},
    Service,
};

use super::Command;

/// [`Command`] for notifying the studio about a [`NewsletterSignup`] with an
/// [`Email`].
#[derive(Clone, Debug, From)]
pub struct SubscribeNewsletter(pub NewsletterSignup);

impl<Up, Ml, Pg> Command<SubscribeNewsletter> for Service<Up, Ml, Pg>
where
    Ml: Mailer<Deliver<Email>, Ok = (), Err = Traced<mailer::Error>>,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        SubscribeNewsletter(signup): SubscribeNewsletter,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        self.mailer()
            .execute(Deliver(signup.to_email()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
    }
}

/// Error of [`SubscribeNewsletter`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Mailer`] error.
    #[display("`Mailer` operation failed: {_0}")]
    Mailer(mailer::Error),
}
