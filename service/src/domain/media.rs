//! [`Media`] definitions.

use derive_more::{Display, From, FromStr, Into};
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::post::Rendered;

/// File resource owned by the upstream system.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Media {
    /// ID of this [`Media`].
    pub id: Id,

    /// Title of this [`Media`].
    #[serde(default)]
    pub title: Rendered,

    /// Alternative text of this [`Media`].
    #[serde(default)]
    pub alt_text: String,

    /// URL the file of this [`Media`] is served from.
    pub source_url: String,

    /// MIME type of the file.
    #[serde(default)]
    pub mime_type: String,

    /// Coarse type of the file (`image`, `file`, ...).
    #[serde(default)]
    pub media_type: String,
}

/// ID of a [`Media`].
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[serde(transparent)]
pub struct Id(u64);

/// Deserializes an optional [`Id`], treating `0` as its absence.
///
/// # Errors
///
/// Errors if the value is not an unsigned integer.
pub fn deserialize_optional_id<'de, D>(
    deserializer: D,
) -> Result<Option<Id>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u64>::deserialize(deserializer)?
        .filter(|id| *id != 0)
        .map(Id))
}

/// File to be uploaded as a new [`Media`].
#[derive(Clone, Debug)]
pub struct Upload {
    /// [`FileName`] of the file.
    pub file_name: FileName,

    /// MIME type of the file.
    pub mime_type: String,

    /// Contents of the file.
    pub bytes: Vec<u8>,

    /// Title to set, if any.
    pub title: Option<String>,

    /// Alternative text to set, if any.
    pub alt_text: Option<String>,
}

/// Name of an uploaded file.
///
/// Safe to be used inside a quoted `Content-Disposition` parameter.
#[derive(Clone, Debug, Display, Eq, PartialEq)]
pub struct FileName(String);

impl FileName {
    /// Creates a new [`FileName`] out of the provided one, dropping any
    /// directory components and characters unsafe for HTTP headers.
    ///
    /// [`None`] is returned if nothing meaningful remains.
    #[must_use]
    pub fn sanitize(name: impl AsRef<str>) -> Option<Self> {
        let name = name
            .as_ref()
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or_default()
            .chars()
            .filter(|c| !c.is_control() && !matches!(c, '"' | ';'))
            .collect::<String>();
        let name = name.trim();
        (!name.trim_matches('.').is_empty())
            .then(|| Self(name.to_owned()))
    }
}
