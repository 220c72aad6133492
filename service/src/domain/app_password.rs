//! [`AppPassword`] definitions.

use common::{unit, DateTimeOf};
#[cfg(doc)]
use common::DateTime;
use derive_more::{AsRef, Display};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Scoped application credential of an upstream user.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct AppPassword {
    /// Unique identifier of this [`AppPassword`].
    pub uuid: Uuid,

    /// [`Name`] of this [`AppPassword`].
    pub name: Name,

    /// [`DateTime`] when this [`AppPassword`] was issued.
    #[serde(with = "common::datetime::serde::naive_utc")]
    pub created: CreationDateTime,

    /// [`DateTime`] when this [`AppPassword`] was used last time, if ever.
    #[serde(default, with = "common::datetime::serde::naive_utc::option")]
    pub last_used: Option<UsageDateTime>,

    /// IP address this [`AppPassword`] was used from last time, if ever.
    #[serde(default)]
    pub last_ip: Option<String>,
}

/// Freshly issued [`AppPassword`] along with its plain password.
///
/// Upstream reveals the plain password only once, on issuance.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Issued {
    /// Issued [`AppPassword`].
    #[serde(flatten)]
    pub app_password: AppPassword,

    /// Plain password, formatted by upstream in groups of four characters.
    pub password: String,
}

/// Human-readable name of an [`AppPassword`].
#[derive(AsRef, Clone, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
#[as_ref(str)]
#[serde(transparent)]
pub struct Name(String);

impl Name {
    /// Creates a new [`Name`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into().trim().to_owned();
        (!name.is_empty() && name.len() <= 128).then_some(Self(name))
    }
}

/// [`DateTime`] when an [`AppPassword`] was issued.
pub type CreationDateTime = DateTimeOf<(AppPassword, unit::Creation)>;

/// [`DateTime`] when an [`AppPassword`] was used.
pub type UsageDateTime = DateTimeOf<(AppPassword, unit::Usage)>;
