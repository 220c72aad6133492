//! [`Command`] for updating a [`Post`].

use common::operations::{Authorize, Authorized, By, Select, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{post, user::Credentials, Post},
    infra::{upstream, Upstream},
    Service,
};

use super::{reconcile::reconcile, Command};

/// [`Command`] for updating a [`Post`].
///
/// Custom fields of [`post::Kind`]s upstream may drop are written inline
/// first, then verified and reconciled.
#[derive(Clone, Debug)]
pub struct UpdatePost {
    /// [`Credentials`] to act with.
    pub credentials: Credentials,

    /// [`post::Edit`] to apply.
    pub edit: post::Edit,
}

impl<Up, Ml, Pg> Command<UpdatePost> for Service<Up, Ml, Pg>
where
    Up: Upstream<Authorize<Credentials>, Err = Traced<upstream::Error>>,
    Authorized<Up, Credentials>: Upstream<
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

    async fn execute(&self, cmd: UpdatePost) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdatePost { credentials, edit } = cmd;
        let key = edit.key;

        let upstream = self
            .authorized_upstream(credentials)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let fields = (key.kind.reconciles_fields()
            && !edit.changes.acf.is_empty())
        .then(|| edit.changes.acf.clone());

        let updated = upstream
            .execute(Update(edit))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tracing::info!(%key, "post updated");

        match fields {
            Some(fields) => reconcile(&upstream, updated, fields)
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E)),
            None => Ok(updated),
        }
    }
}

/// Error of [`UpdatePost`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Upstream`] error.
    #[display("`Upstream` operation failed: {_0}")]
    Upstream(upstream::Error),
}

#[cfg(test)]
mod spec {
    use serde_json::json;

    use crate::{
        command::spec::{credentials, post, service, Call, Fake},
        domain::post::{Changes, Edit, Kind},
    };

    use super::{Command as _, ExecutionError, UpdatePost};

    fn edit(kind: Kind, id: u64) -> UpdatePost {
        UpdatePost {
            credentials: credentials(),
            edit: Edit {
                key: post(kind, id).key(),
                changes: Changes {
                    acf: serde_json::from_value(json!({"duration": "3:20"}))
                        .unwrap(),
                    ..Changes::default()
                },
            },
        }
    }

    #[tokio::test]
    async fn verifies_inline_write_once() {
        let fake = Fake::default();
        fake.apply_inline_acf();
        fake.store(post(Kind::Recording, 1));

        let post = service(fake.clone())
            .execute(edit(Kind::Recording, 1))
            .await
            .unwrap();

        assert_eq!(post.acf.value("duration"), &json!("3:20"));
        assert_eq!(fake.calls(), [Call::Update, Call::Read]);
    }

    #[tokio::test]
    async fn mirrors_fields_into_meta_as_last_resort() {
        let fake = Fake::default();
        fake.fail_fields_endpoint();
        fake.store(post(Kind::Equipment, 2));

        let post = service(fake.clone())
            .execute(edit(Kind::Equipment, 2))
            .await
            .unwrap();

        assert_eq!(post.meta.value("acf_duration"), &json!("3:20"));
        assert_eq!(
            fake.calls(),
            [Call::Update, Call::Read, Call::FieldsEndpoint, Call::Update],
        );
        assert_eq!(
            fake.stored(2).unwrap().meta.value("acf_duration"),
            &json!("3:20"),
        );
    }

    #[tokio::test]
    async fn propagates_failed_inline_write() {
        let fake = Fake::default();

        let err = service(fake.clone())
            .execute(edit(Kind::Equipment, 404))
            .await
            .unwrap_err();

        let ExecutionError::Upstream(e) = err.as_ref();
        assert!(e.is_not_found());
        assert_eq!(fake.calls(), [Call::Update]);
    }
}
