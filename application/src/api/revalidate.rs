//! Webhook invalidating statically rendered pages.

use axum::Extension;
use serde::{Deserialize, Serialize};
use service::{
    command::{self, revalidate_pages, Command as _},
    domain::page,
};

use crate::{
    api::{Json, Query},
    define_error, AsError, Error, Service,
};

/// Revalidation request, accepted both as a query string and as a JSON body.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RevalidateInput {
    /// Shared secret.
    pub secret: Option<String>,

    /// Path of a single page to invalidate.
    pub path: Option<String>,

    /// Cache tag to invalidate.
    pub tag: Option<String>,

    /// Upstream post type whose pages should be invalidated.
    #[serde(alias = "type", alias = "post_type")]
    pub post_type: Option<String>,
}

impl From<RevalidateInput> for command::RevalidatePages {
    fn from(input: RevalidateInput) -> Self {
        let RevalidateInput {
            secret,
            path,
            tag,
            post_type,
        } = input;
        Self {
            secret,
            path,
            tag,
            post_type,
        }
    }
}

/// Result of a revalidation.
#[derive(Clone, Debug, Serialize)]
pub struct Revalidated {
    /// Always `true`.
    pub revalidated: bool,

    /// Invalidated page paths.
    pub paths: Vec<String>,

    /// Invalidated cache tags.
    pub tags: Vec<String>,

    /// Unix timestamp of the revalidation, in milliseconds.
    pub now: i64,
}

impl From<revalidate_pages::Output> for Revalidated {
    fn from(out: revalidate_pages::Output) -> Self {
        let (mut paths, mut tags) = (vec![], vec![]);
        for target in out.targets {
            match target {
                page::Target::Path(p) => paths.push(p.to_string()),
                page::Target::Tag(t) => tags.push(t.to_string()),
            }
        }
        Self {
            revalidated: true,
            paths,
            tags,
            now: out.revalidated_at.unix_timestamp_millis(),
        }
    }
}

/// Handles a revalidation requested via the query string.
///
/// # Errors
///
/// If the secret doesn't match, or there is nothing to revalidate.
#[tracing::instrument(name = "revalidate", skip_all)]
pub async fn by_query(
    Extension(service): Extension<Service>,
    Query(input): Query<RevalidateInput>,
) -> Result<Json<Revalidated>, Error> {
    revalidate(&service, input).await
}

/// Handles a revalidation requested via a JSON body.
///
/// Values missing in the body (or the whole body) are taken from the query
/// string.
///
/// # Errors
///
/// If the secret doesn't match, or there is nothing to revalidate.
#[tracing::instrument(name = "revalidate", skip_all)]
pub async fn by_body(
    Extension(service): Extension<Service>,
    Query(query): Query<RevalidateInput>,
    body: Option<Json<RevalidateInput>>,
) -> Result<Json<Revalidated>, Error> {
    let body = body.map(|Json(b)| b).unwrap_or_default();
    let input = RevalidateInput {
        secret: body.secret.or(query.secret),
        path: body.path.or(query.path),
        tag: body.tag.or(query.tag),
        post_type: body.post_type.or(query.post_type),
    };
    revalidate(&service, input).await
}

/// Executes the [`command::RevalidatePages`].
async fn revalidate(
    service: &Service,
    input: RevalidateInput,
) -> Result<Json<Revalidated>, Error> {
    service
        .execute(command::RevalidatePages::from(input))
        .await
        .map(|out| Json(out.into()))
        .map_err(AsError::into_error)
}

impl AsError for command::revalidate_pages::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "NOT_CONFIGURED"]
                #[status = INTERNAL_SERVER_ERROR]
                #[message = "Die Revalidierung ist nicht eingerichtet."]
                NotConfigured,

                #[code = "INVALID_TOKEN"]
                #[status = UNAUTHORIZED]
                #[message = "Invalid token"]
                InvalidToken,

                #[code = "VALIDATION_ERROR"]
                #[status = BAD_REQUEST]
                #[message = "Ungültiger Pfad."]
                InvalidPath,

                #[code = "VALIDATION_ERROR"]
                #[status = BAD_REQUEST]
                #[message = "Ungültiger Tag."]
                InvalidTag,

                #[code = "VALIDATION_ERROR"]
                #[status = BAD_REQUEST]
                #[message = "Pfad, Tag oder Inhaltstyp ist erforderlich."]
                NoTarget,
            }
        }

        Some(match self {
            Self::NotConfigured => Error::NotConfigured.into(),
            Self::InvalidSecret => Error::InvalidToken.into(),
            Self::InvalidPath => Error::InvalidPath.into(),
            Self::InvalidTag => Error::InvalidTag.into(),
            Self::NoTarget => Error::NoTarget.into(),
            Self::Pages(e) => return e.try_as_error(),
        })
    }
}
