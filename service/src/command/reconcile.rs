//! Reconciliation of custom [`Fields`] upstream may silently drop.

use common::operations::{By, Select, Update};
use tracerr::Traced;

use crate::{
    domain::{field::Fields, post, Post},
    infra::{upstream, Upstream},
};

/// Prefix of the metadata keys custom [`Fields`] are mirrored under when
/// every other write path fails.
pub(crate) const META_PREFIX: &str = "acf_";

/// Ensures the `submitted` custom [`Fields`] are applied to the `written`
/// [`Post`], which is the result of an inline write of them.
///
/// Each write path runs at most once:
/// 1. The [`Post`] is read back and compared with the `submitted` [`Fields`]
///    via [`Fields::mismatches()`]. If all match, the fresh [`Post`] is
///    returned.
/// 2. Otherwise, the dedicated custom fields endpoint is used, and the
///    [`Post`] is read back once more.
/// 3. If that endpoint fails, the [`Fields`] are written as prefixed
///    metadata, and the result of that write is returned as is.
///
/// A failed read is logged. Before the endpoint write the last written
/// [`Post`] is returned instead, and after it the last read [`Post`] with the
/// `submitted` [`Fields`] applied.
///
/// # Errors
///
/// If the prefixed metadata write fails.
pub(crate) async fn reconcile<U>(
    upstream: &U,
    written: Post,
    submitted: Fields,
) -> Result<Post, Traced<upstream::Error>>
where
    U: Upstream<
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
    let key = written.key();

    let Some(actual) = read_back(upstream, key).await else {
        return Ok(written);
    };
    let mismatches = submitted.mismatches(&actual.acf);
    if mismatches.is_empty() {
        tracing::debug!(%key, "custom fields applied inline");
        return Ok(actual);
    }
    tracing::debug!(
        %key,
        ?mismatches,
        "custom fields not applied inline, using custom fields endpoint",
    );

    match upstream
        .execute(Update(post::FieldsEdit {
            key,
            fields: submitted.clone(),
        }))
        .await
    {
        Ok(()) => {
            tracing::debug!(%key, "custom fields applied via endpoint");
            Ok(read_back(upstream, key).await.unwrap_or_else(|| {
                let mut post = actual;
                for (k, v) in submitted.iter() {
                    post.acf.set(k.clone(), v.clone());
                }
                post
            }))
        }
        Err(e) => {
            tracing::warn!(
                %key,
                "custom fields endpoint failed, writing prefixed meta: {e}",
            );
            upstream
                .execute(Update(post::Edit {
                    key,
                    changes: post::Changes::meta(
                        submitted.prefixed(META_PREFIX),
                    ),
                }))
                .await
                .map_err(tracerr::wrap!())
        }
    }
}

/// Reads the [`Post`] with the provided [`post::Key`] back, logging any
/// failure.
async fn read_back<U>(upstream: &U, key: post::Key) -> Option<Post>
where
    U: Upstream<
        Select<By<Option<Post>, post::Key>>,
        Ok = Option<Post>,
        Err = Traced<upstream::Error>,
    >,
{
    match upstream
        .execute(Select(By::<Option<Post>, _>::new(key)))
        .await
    {
        Ok(Some(post)) => Some(post),
        Ok(None) => {
            tracing::warn!(%key, "written post vanished on read back");
            None
        }
        Err(e) => {
            tracing::warn!(%key, "failed to read written post back: {e}");
            None
        }
    }
}
