//! [`Command`] for creating a [`Post`].

use common::operations::{Authorize, Authorized, By, Insert, Select, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{post, user::Credentials, Post},
    infra::{upstream, Upstream},
    Service,
};

use super::{reconcile::reconcile, Command};

/// [`Command`] for creating a [`Post`].
///
/// Custom fields of [`post::Kind`]s upstream may drop are reconciled after
/// the creation.
#[derive(Clone, Debug)]
pub struct CreatePost {
    /// [`Credentials`] to act with.
    pub credentials: Credentials,

    /// [`post::Draft`] of the [`Post`] to create.
    pub draft: post::Draft,
}

impl<Up, Ml, Pg> Command<CreatePost> for Service<Up, Ml, Pg>
where
    Up: Upstream<Authorize<Credentials>, Err = Traced<upstream::Error>>,
    Authorized<Up, Credentials>: Upstream<
            Insert<post::Draft>,
            Ok = Post,
            Err = Traced<upstream::Error>,
        > + Upstream<
            Select<By<Option<Post>, post::Key>>,
            Ok = Option<Post>,
            Err = Traced<upstream::Error>,
        > + Upstream<
            Update<post::FieldsEdit>,
            Ok = (),
            Err = Traced<upstream::Error>,
        > + Upstream<
            Update<post::Edit>,
            Ok = Post,
            Err = Traced<upstream::Error>,
        >,
{
    type Ok = Post;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreatePost) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreatePost { credentials, draft } = cmd;

        let upstream = self
            .authorized_upstream(credentials)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let fields = (draft.kind.reconciles_fields()
            && !draft.changes.acf.is_empty())
        .then(|| draft.changes.acf.clone());

        let created = upstream
            .execute(Insert(draft))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tracing::info!(key = %created.key(), "post created");

        match fields {
            Some(fields) => reconcile(&upstream, created, fields)
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E)),
            None => Ok(created),
        }
    }
}

/// Error of [`CreatePost`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Upstream`] error.
    #[display("`Upstream` operation failed: {_0}")]
    Upstream(upstream::Error),
}
