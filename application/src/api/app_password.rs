//! [`AppPassword`] endpoints.

use axum::{http::StatusCode, Extension};
use serde::{Deserialize, Serialize};
use service::{
    command::{self, Command as _},
    domain::{self, app_password, user},
    query, Query as _,
};
use uuid::Uuid;

use crate::{
    api::{Done, Json, Path},
    define_error,
    session::Session,
    AsError, Error, Service,
};

/// Application password, as exposed by the API.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppPassword {
    /// Unique identifier of this [`AppPassword`].
    pub uuid: Uuid,

    /// Name of this [`AppPassword`].
    pub name: app_password::Name,

    /// Moment of the issuance.
    #[serde(serialize_with = "common::datetime::serde::rfc3339::serialize")]
    pub created_at: app_password::CreationDateTime,

    /// Moment of the last usage, if any.
    #[serde(
        serialize_with = "common::datetime::serde::rfc3339::option::serialize"
    )]
    pub last_used_at: Option<app_password::UsageDateTime>,

    /// IP address of the last usage, if any.
    pub last_ip: Option<String>,
}

impl From<domain::AppPassword> for AppPassword {
    fn from(pass: domain::AppPassword) -> Self {
        Self {
            uuid: pass.uuid,
            name: pass.name,
            created_at: pass.created,
            last_used_at: pass.last_used,
            last_ip: pass.last_ip,
        }
    }
}

/// Freshly issued [`AppPassword`].
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Issued {
    /// Issued [`AppPassword`].
    #[serde(flatten)]
    pub app_password: AppPassword,

    /// Plain password, shown only once.
    pub password: String,
}

/// Form issuing a new [`AppPassword`].
#[derive(Clone, Debug, Deserialize)]
pub struct IssueInput {
    /// Name of the new [`AppPassword`].
    #[serde(default)]
    pub name: String,
}

/// Lists [`AppPassword`]s of the current user.
///
/// # Errors
///
/// If upstream fails.
#[tracing::instrument(name = "app_passwords.list", skip_all)]
pub async fn list(
    Extension(service): Extension<Service>,
    Session(session): Session,
) -> Result<Json<Vec<AppPassword>>, Error> {
    service
        .execute(query::app_password::List::by(
            session.credentials,
            user::Current,
        ))
        .await
        .map(|list| Json(list.into_iter().map(Into::into).collect()))
        .map_err(AsError::into_error)
}

/// Issues a new [`AppPassword`] to the current user.
///
/// # Errors
///
/// If the name is blank, or upstream fails.
#[tracing::instrument(name = "app_passwords.issue", skip_all)]
pub async fn issue(
    Extension(service): Extension<Service>,
    Session(session): Session,
    Json(input): Json<IssueInput>,
) -> Result<(StatusCode, Json<Issued>), Error> {
    let name = app_password::Name::new(input.name)
        .ok_or(AppPasswordError::NameRequired)?;

    service
        .execute(command::CreateAppPassword {
            credentials: session.credentials,
            name,
        })
        .await
        .map(|issued| {
            (
                StatusCode::CREATED,
                Json(Issued {
                    app_password: issued.app_password.into(),
                    password: issued.password,
                }),
            )
        })
        .map_err(AsError::into_error)
}

/// Revokes an [`AppPassword`] of the current user.
///
/// # Errors
///
/// If upstream fails.
#[tracing::instrument(name = "app_passwords.revoke", skip_all, fields(%uuid))]
pub async fn revoke(
    Extension(service): Extension<Service>,
    Session(session): Session,
    Path(uuid): Path<Uuid>,
) -> Result<Json<Done>, Error> {
    service
        .execute(command::RevokeAppPassword {
            credentials: session.credentials,
            uuid,
        })
        .await
        .map(|()| Done::OK)
        .map_err(AsError::into_error)
}

impl AsError for command::create_app_password::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Upstream(e) => e.try_as_error(),
        }
    }
}

impl AsError for command::revoke_app_password::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Upstream(e) => e.try_as_error(),
        }
    }
}

define_error! {
    enum AppPasswordError {
        #[code = "VALIDATION_ERROR"]
        #[status = BAD_REQUEST]
        #[message = "Name ist erforderlich."]
        NameRequired,
    }
}
