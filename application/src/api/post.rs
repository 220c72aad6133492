//! [`Post`] endpoints.

use axum::{http::StatusCode, Extension};
use common::pagination::{self, Page};
use serde::{Deserialize, Serialize};
use service::{
    command::{self, Command as _},
    domain::{self, media, post, Fields},
    query, Query as _,
};

use crate::{
    api::{Done, Json, Path, Query},
    define_error,
    error::RequestError,
    session::Session,
    AsError, Error, Service,
};

/// Content entity, as exposed by the API.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// ID of this [`Post`].
    pub id: post::Id,

    /// Kind of this [`Post`].
    #[serde(rename = "type")]
    pub kind: post::Kind,

    /// Publication status of this [`Post`].
    pub status: post::Status,

    /// URL-friendly name of this [`Post`].
    pub slug: String,

    /// Public URL of this [`Post`].
    pub link: String,

    /// Title of this [`Post`].
    pub title: post::Rendered,

    /// Content of this [`Post`].
    pub content: post::Rendered,

    /// Excerpt of this [`Post`].
    pub excerpt: post::Rendered,

    /// ID of the featured media of this [`Post`], if any.
    pub featured_media: Option<media::Id>,

    /// Moment of the publication, if any.
    #[serde(
        serialize_with = "common::datetime::serde::rfc3339::option::serialize"
    )]
    pub published_at: Option<post::PublicationDateTime>,

    /// Moment of the last modification, if any.
    #[serde(
        serialize_with = "common::datetime::serde::rfc3339::option::serialize"
    )]
    pub modified_at: Option<post::ModificationDateTime>,

    /// Custom fields of this [`Post`].
    pub acf: Fields,

    /// Generic metadata of this [`Post`].
    pub meta: Fields,
}

impl From<domain::Post> for Post {
    fn from(post: domain::Post) -> Self {
        Self {
            id: post.id,
            kind: post.kind,
            status: post.status,
            slug: post.slug,
            link: post.link,
            title: post.title,
            content: post.content,
            excerpt: post.excerpt,
            featured_media: post.featured_media,
            published_at: post.published_at,
            modified_at: post.modified_at,
            acf: post.acf,
            meta: post.meta,
        }
    }
}

/// Submitted [`Post`] fields.
///
/// Omitted fields are left untouched.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PostInput {
    /// New title.
    pub title: Option<String>,

    /// New content.
    pub content: Option<String>,

    /// New excerpt.
    pub excerpt: Option<String>,

    /// New publication status.
    pub status: Option<post::Status>,

    /// New URL-friendly name.
    pub slug: Option<String>,

    /// New featured media.
    pub featured_media: Option<media::Id>,

    /// Custom fields to set.
    pub acf: Fields,

    /// Generic metadata to set.
    pub meta: Fields,
}

impl From<PostInput> for post::Changes {
    fn from(input: PostInput) -> Self {
        let PostInput {
            title,
            content,
            excerpt,
            status,
            slug,
            featured_media,
            acf,
            meta,
        } = input;
        Self {
            title,
            content,
            excerpt,
            status,
            slug,
            featured_media,
            acf,
            meta,
        }
    }
}

/// Arguments of a [`Post`]s list.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListArgs {
    /// One-based number of the requested page.
    pub page: Option<u32>,

    /// Amount of [`Post`]s on the requested page.
    pub per_page: Option<u32>,

    /// Status filter.
    pub status: Option<post::Status>,

    /// Full-text search phrase.
    pub search: Option<String>,
}

impl ListArgs {
    /// Converts these [`ListArgs`] into a [`post::Selector`] of the provided
    /// [`post::Kind`].
    fn selector(self, kind: post::Kind) -> post::Selector {
        post::Selector {
            kind,
            page: pagination::Arguments::new(self.page, self.per_page),
            status: self.status,
            search: self.search.filter(|s| !s.trim().is_empty()),
        }
    }
}

/// Lists [`Post`]s of the provided kind, in any status.
///
/// # Errors
///
/// If upstream fails.
#[tracing::instrument(name = "posts.list", skip_all, fields(%kind))]
pub async fn list(
    Extension(service): Extension<Service>,
    Session(session): Session,
    Path(kind): Path<post::Kind>,
    Query(args): Query<ListArgs>,
) -> Result<Json<Page<Post>>, Error> {
    service
        .execute(query::post::List::by(
            session.credentials,
            args.selector(kind),
        ))
        .await
        .map(|page| Json(page.map(Post::from)))
        .map_err(AsError::into_error)
}

/// Reads a single [`Post`], in any status.
///
/// # Errors
///
/// If there is no such [`Post`], or upstream fails.
#[tracing::instrument(name = "posts.read", skip_all, fields(%kind, %id))]
pub async fn read(
    Extension(service): Extension<Service>,
    Session(session): Session,
    Path((kind, id)): Path<(post::Kind, post::Id)>,
) -> Result<Json<Post>, Error> {
    service
        .execute(query::post::ById::by(
            session.credentials,
            post::Key { kind, id },
        ))
        .await
        .map_err(AsError::into_error)?
        .map(|p| Json(p.into()))
        .ok_or_else(|| RequestError::NotFound.into())
}

/// Creates a new [`Post`] of the provided kind.
///
/// # Errors
///
/// If the input is invalid, or upstream fails.
#[tracing::instrument(name = "posts.create", skip_all, fields(%kind))]
pub async fn create(
    Extension(service): Extension<Service>,
    Session(session): Session,
    Path(kind): Path<post::Kind>,
    Json(input): Json<PostInput>,
) -> Result<(StatusCode, Json<Post>), Error> {
    if input.title.as_deref().map_or(true, |t| t.trim().is_empty()) {
        return Err(PostError::TitleRequired.into());
    }

    service
        .execute(command::CreatePost {
            credentials: session.credentials,
            draft: post::Draft {
                kind,
                changes: input.into(),
            },
        })
        .await
        .map(|p| (StatusCode::CREATED, Json(p.into())))
        .map_err(|e| {
            let command::create_post::ExecutionError::Upstream(up) =
                e.as_ref();
            let mut err = upstream_error(kind, up);
            err.backtrace = Some(e.trace().clone());
            err
        })
}

/// Updates an existing [`Post`].
///
/// Custom fields of the kinds upstream may drop are reconciled.
///
/// # Errors
///
/// If the input is invalid, or upstream fails.
#[tracing::instrument(name = "posts.update", skip_all, fields(%kind, %id))]
pub async fn update(
    Extension(service): Extension<Service>,
    Session(session): Session,
    Path((kind, id)): Path<(post::Kind, post::Id)>,
    Json(input): Json<PostInput>,
) -> Result<Json<Post>, Error> {
    if input.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
        return Err(PostError::TitleRequired.into());
    }

    service
        .execute(command::UpdatePost {
            credentials: session.credentials,
            edit: post::Edit {
                key: post::Key { kind, id },
                changes: input.into(),
            },
        })
        .await
        .map(|p| Json(p.into()))
        .map_err(|e| {
            let command::update_post::ExecutionError::Upstream(up) =
                e.as_ref();
            let mut err = upstream_error(kind, up);
            err.backtrace = Some(e.trace().clone());
            err
        })
}

/// Arguments of a [`Post`] removal.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
pub struct DeleteArgs {
    /// Whether to bypass the trash.
    pub force: bool,
}

/// Moves a [`Post`] to the trash, or deletes it permanently.
///
/// # Errors
///
/// If upstream fails.
#[tracing::instrument(name = "posts.delete", skip_all, fields(%kind, %id))]
pub async fn delete(
    Extension(service): Extension<Service>,
    Session(session): Session,
    Path((kind, id)): Path<(post::Kind, post::Id)>,
    Query(DeleteArgs { force }): Query<DeleteArgs>,
) -> Result<Json<Done>, Error> {
    service
        .execute(command::DeletePost {
            credentials: session.credentials,
            removal: post::Removal {
                key: post::Key { kind, id },
                force,
            },
        })
        .await
        .map(|()| Done::OK)
        .map_err(AsError::into_error)
}

/// Lists published [`Post`]s of the provided kind.
///
/// # Errors
///
/// If upstream fails.
#[tracing::instrument(name = "posts.public_list", skip_all, fields(%kind))]
pub async fn public_list(
    Extension(service): Extension<Service>,
    Path(kind): Path<post::Kind>,
    Query(args): Query<ListArgs>,
) -> Result<Json<Page<Post>>, Error> {
    let selector = post::Selector {
        status: None,
        ..args.selector(kind)
    };
    service
        .execute(query::post::PublicList::by(selector))
        .await
        .map(|page| Json(page.map(Post::from)))
        .map_err(AsError::into_error)
}

/// Reads a single published [`Post`].
///
/// # Errors
///
/// If there is no such published [`Post`], or upstream fails.
#[tracing::instrument(name = "posts.public_read", skip_all, fields(%kind, %id))]
pub async fn public_read(
    Extension(service): Extension<Service>,
    Path((kind, id)): Path<(post::Kind, post::Id)>,
) -> Result<Json<Post>, Error> {
    service
        .execute(query::post::PublicById::by(post::Key { kind, id }))
        .await
        .map_err(AsError::into_error)?
        .filter(|p| p.status == post::Status::Publish)
        .map(|p| Json(p.into()))
        .ok_or_else(|| RequestError::NotFound.into())
}

/// Converts the provided upstream [`Error`] of a [`Post`] write into an
/// [`Error`].
///
/// Rejections of the kinds having their custom fields reconciled carry the
/// upstream message, as the editor can act upon it.
///
/// [`Error`]: service::infra::upstream::Error
fn upstream_error(
    kind: post::Kind,
    err: &service::infra::upstream::Error,
) -> Error {
    match err.rejection() {
        Some(r) if kind.reconciles_fields() && !err.is_not_found() => Error {
            code: "UPSTREAM_ERROR",
            status_code: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("{} {}", Error::UPSTREAM_MESSAGE, r.message)
                .trim_end()
                .to_owned(),
            backtrace: None,
        },
        Some(_) | None => err.as_error(),
    }
}

impl AsError for command::delete_post::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Upstream(e) => e.try_as_error(),
        }
    }
}

define_error! {
    enum PostError {
        #[code = "VALIDATION_ERROR"]
        #[status = BAD_REQUEST]
        #[message = "Titel ist erforderlich."]
        TitleRequired,
    }
}
