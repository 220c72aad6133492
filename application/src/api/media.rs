//! [`Media`] endpoints.

use axum::{
    extract::{multipart::Field, Multipart},
    http::StatusCode,
    Extension,
};
use common::pagination::{self, Page};
use serde::{Deserialize, Serialize};
use service::{
    command::{self, Command as _},
    domain::{self, media},
    query, Query as _,
};

use crate::{
    api::{Done, Json, Path, Query},
    define_error,
    session::Session,
    AsError, Error, Service,
};

/// Media item, as exposed by the API.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    /// ID of this [`Media`].
    pub id: media::Id,

    /// Rendered title of this [`Media`].
    pub title: String,

    /// Alternative text of this [`Media`].
    pub alt_text: String,

    /// URL the file is served from.
    pub source_url: String,

    /// MIME type of the file.
    pub mime_type: String,

    /// Coarse type of the file.
    pub media_type: String,
}

impl From<domain::Media> for Media {
    fn from(media: domain::Media) -> Self {
        Self {
            id: media.id,
            title: media.title.rendered,
            alt_text: media.alt_text,
            source_url: media.source_url,
            mime_type: media.mime_type,
            media_type: media.media_type,
        }
    }
}

/// Arguments of a [`Media`] list.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListArgs {
    /// One-based number of the requested page.
    pub page: Option<u32>,

    /// Amount of items on the requested page.
    pub per_page: Option<u32>,
}

/// Lists uploaded [`Media`].
///
/// # Errors
///
/// If upstream fails.
#[tracing::instrument(name = "media.list", skip_all)]
pub async fn list(
    Extension(service): Extension<Service>,
    Session(session): Session,
    Query(args): Query<ListArgs>,
) -> Result<Json<Page<Media>>, Error> {
    service
        .execute(query::media::List::by(
            session.credentials,
            pagination::Arguments::new(args.page, args.per_page),
        ))
        .await
        .map(|page| Json(page.map(Media::from)))
        .map_err(AsError::into_error)
}

/// Uploads a new [`Media`] out of a multipart form.
///
/// The form carries the `file` itself, and optional `title` and `alt`
/// (or `alt_text`) fields.
///
/// # Errors
///
/// If the form is malformed, or upstream fails.
#[tracing::instrument(name = "media.upload", skip_all)]
pub async fn upload(
    Extension(service): Extension<Service>,
    Session(session): Session,
    mut form: Multipart,
) -> Result<(StatusCode, Json<Media>), Error> {
    let mut file = None;
    let (mut title, mut alt_text) = (None, None);

    while let Some(field) = form.next_field().await? {
        let name = field.name().unwrap_or_default().to_owned();
        match name.as_str() {
            "file" => {
                let file_name = field
                    .file_name()
                    .and_then(media::FileName::sanitize)
                    .ok_or(UploadError::FileRequired)?;
                let mime_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_owned();
                let bytes = field.bytes().await?.to_vec();
                file = Some((file_name, mime_type, bytes));
            }
            "title" => title = text(field).await?,
            "alt" | "alt_text" | "altText" => alt_text = text(field).await?,
            _ => {}
        }
    }

    let (file_name, mime_type, bytes) =
        file.ok_or(UploadError::FileRequired)?;

    service
        .execute(command::UploadMedia {
            credentials: session.credentials,
            upload: media::Upload {
                file_name,
                mime_type,
                bytes,
                title,
                alt_text,
            },
        })
        .await
        .map(|m| (StatusCode::CREATED, Json(m.into())))
        .map_err(AsError::into_error)
}

/// Reads a non-blank text value of the provided multipart [`Field`].
async fn text(field: Field<'_>) -> Result<Option<String>, Error> {
    let text = field.text().await?;
    let text = text.trim();
    Ok((!text.is_empty()).then(|| text.to_owned()))
}

/// Deletes a [`Media`] permanently.
///
/// # Errors
///
/// If upstream fails.
#[tracing::instrument(name = "media.delete", skip_all, fields(%id))]
pub async fn delete(
    Extension(service): Extension<Service>,
    Session(session): Session,
    Path(id): Path<media::Id>,
) -> Result<Json<Done>, Error> {
    service
        .execute(command::DeleteMedia {
            credentials: session.credentials,
            id,
        })
        .await
        .map(|()| Done::OK)
        .map_err(AsError::into_error)
}

impl AsError for command::upload_media::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::EmptyFile => Some(UploadError::FileEmpty.into()),
            Self::Upstream(e) => e.try_as_error(),
        }
    }
}

impl AsError for command::delete_media::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Upstream(e) => e.try_as_error(),
        }
    }
}

define_error! {
    enum UploadError {
        #[code = "VALIDATION_ERROR"]
        #[status = BAD_REQUEST]
        #[message = "Bitte wähle eine Datei aus."]
        FileRequired,

        #[code = "VALIDATION_ERROR"]
        #[status = BAD_REQUEST]
        #[message = "Die Datei ist leer."]
        FileEmpty,
    }
}
