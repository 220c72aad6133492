//! [`Post`] definitions.

use common::{unit, DateTimeOf};
#[cfg(doc)]
use common::DateTime;
use derive_more::{Display, From, FromStr, Into};
use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoEnumIterator as _};

use crate::domain::{field::Fields, media};

/// Content entity owned by the upstream system.
///
/// Never persisted locally: every [`Post`] is read from and written to
/// upstream directly.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Post {
    /// ID of this [`Post`].
    pub id: Id,

    /// [`Kind`] of this [`Post`].
    #[serde(rename = "type")]
    pub kind: Kind,

    /// [`Status`] of this [`Post`].
    pub status: Status,

    /// URL-friendly name of this [`Post`].
    #[serde(default)]
    pub slug: String,

    /// Public URL of this [`Post`].
    #[serde(default)]
    pub link: String,

    /// Title of this [`Post`].
    #[serde(default)]
    pub title: Rendered,

    /// Content of this [`Post`].
    #[serde(default)]
    pub content: Rendered,

    /// Excerpt of this [`Post`].
    #[serde(default)]
    pub excerpt: Rendered,

    /// ID of the featured [`media::Media`] of this [`Post`], if any.
    #[serde(default, deserialize_with = "media::deserialize_optional_id")]
    pub featured_media: Option<media::Id>,

    /// [`DateTime`] when this [`Post`] was published (or is scheduled to
    /// be).
    #[serde(
        default,
        rename = "date_gmt",
        with = "common::datetime::serde::naive_utc::option"
    )]
    pub published_at: Option<PublicationDateTime>,

    /// [`DateTime`] when this [`Post`] was modified last time.
    #[serde(
        default,
        rename = "modified_gmt",
        with = "common::datetime::serde::naive_utc::option"
    )]
    pub modified_at: Option<ModificationDateTime>,

    /// Custom (ACF) [`Fields`] of this [`Post`].
    #[serde(default)]
    pub acf: Fields,

    /// Generic metadata [`Fields`] of this [`Post`].
    #[serde(default)]
    pub meta: Fields,
}

impl Post {
    /// Returns the [`Key`] of this [`Post`].
    #[must_use]
    pub const fn key(&self) -> Key {
        Key {
            kind: self.kind,
            id: self.id,
        }
    }
}

/// ID of a [`Post`].
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

/// Unique key of a [`Post`] in upstream.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
#[display("{kind}#{id}")]
pub struct Key {
    /// [`Kind`] of the [`Post`].
    pub kind: Kind,

    /// [`Id`] of the [`Post`].
    pub id: Id,
}

/// Kind (upstream post type) of a [`Post`].
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    strum::Display,
    EnumIter,
    strum::EnumString,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Kind {
    /// Blog post.
    Post,

    /// Artist the studio worked with.
    Artist,

    /// Rental equipment.
    #[serde(rename = "gear", alias = "equipment")]
    #[strum(to_string = "gear", serialize = "equipment")]
    Equipment,

    /// Reference of a live event.
    #[serde(alias = "live-reference")]
    #[strum(to_string = "live_reference", serialize = "live-reference")]
    LiveReference,

    /// Studio recording.
    Recording,

    /// Audio sample of a recording.
    #[serde(alias = "audio-sample")]
    #[strum(to_string = "audio_sample", serialize = "audio-sample")]
    AudioSample,
}

impl Kind {
    /// Returns all the existing [`Kind`]s.
    pub fn all() -> impl Iterator<Item = Self> {
        Self::iter()
    }

    /// Returns the REST base of this [`Kind`] in upstream API.
    #[must_use]
    pub const fn rest_base(self) -> &'static str {
        match self {
            Self::Post => "posts",
            Self::Artist => "artists",
            Self::Equipment => "gear",
            Self::LiveReference => "live-references",
            Self::Recording => "recordings",
            Self::AudioSample => "audio-samples",
        }
    }

    /// Indicates whether upstream may silently drop custom [`Fields`] of
    /// this [`Kind`] submitted inline with the entity update, so they must be
    /// verified and reconciled.
    #[must_use]
    pub const fn reconciles_fields(self) -> bool {
        match self {
            Self::Equipment | Self::Recording => true,
            Self::Post
            | Self::Artist
            | Self::LiveReference
            | Self::AudioSample => false,
        }
    }
}

/// Publication status of a [`Post`].
#[derive(
    Clone, Copy, Debug, Default, Deserialize, Display, Eq, PartialEq, Serialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Publicly visible.
    #[display("publish")]
    Publish,

    /// Scheduled for the future publication.
    #[display("future")]
    Future,

    /// Not finished yet.
    #[default]
    #[display("draft")]
    Draft,

    /// Awaiting a review.
    #[display("pending")]
    Pending,

    /// Visible to the authorized users only.
    #[display("private")]
    Private,

    /// Moved to the trash.
    #[display("trash")]
    Trash,

    /// Created automatically and never saved yet.
    #[display("auto-draft")]
    #[serde(rename = "auto-draft")]
    AutoDraft,

    /// Inheriting the status of a parent.
    #[display("inherit")]
    Inherit,
}

/// Text rendered by upstream, along with its raw source (available in the
/// edit context only).
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Rendered {
    /// Rendered HTML.
    #[serde(default)]
    pub rendered: String,

    /// Raw source, if available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

/// Changes to be written to a [`Post`].
///
/// Only the set fields are sent upstream.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Changes {
    /// New title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// New content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// New excerpt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,

    /// New [`Status`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,

    /// New slug.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,

    /// New featured [`media::Media`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured_media: Option<media::Id>,

    /// Custom (ACF) [`Fields`] to set inline.
    #[serde(default, skip_serializing_if = "Fields::is_empty")]
    pub acf: Fields,

    /// Generic metadata [`Fields`] to set.
    #[serde(default, skip_serializing_if = "Fields::is_empty")]
    pub meta: Fields,
}

impl Changes {
    /// Creates new [`Changes`] setting the provided metadata [`Fields`] only.
    #[must_use]
    pub fn meta(meta: Fields) -> Self {
        Self {
            meta,
            ..Self::default()
        }
    }
}

/// Operation payload creating a new [`Post`].
#[derive(Clone, Debug)]
pub struct Draft {
    /// [`Kind`] of the [`Post`] to create.
    pub kind: Kind,

    /// Initial [`Changes`] of the [`Post`].
    pub changes: Changes,
}

/// Operation payload writing [`Changes`] to an existing [`Post`].
#[derive(Clone, Debug)]
pub struct Edit {
    /// [`Key`] of the [`Post`] to edit.
    pub key: Key,

    /// [`Changes`] to write.
    pub changes: Changes,
}

/// Operation payload writing custom [`Fields`] through the dedicated
/// custom field endpoint of upstream.
#[derive(Clone, Debug)]
pub struct FieldsEdit {
    /// [`Key`] of the [`Post`] to edit.
    pub key: Key,

    /// [`Fields`] to write.
    pub fields: Fields,
}

/// Operation payload removing a [`Post`].
#[derive(Clone, Copy, Debug)]
pub struct Removal {
    /// [`Key`] of the [`Post`] to remove.
    pub key: Key,

    /// Whether to bypass the trash and delete permanently.
    pub force: bool,
}

/// Selector of a list of [`Post`]s.
#[derive(Clone, Debug)]
pub struct Selector {
    /// [`Kind`] of the listed [`Post`]s.
    pub kind: Kind,

    /// Requested page.
    pub page: common::pagination::Arguments,

    /// [`Status`] filter. [`None`] means any status the requester is allowed
    /// to see.
    pub status: Option<Status>,

    /// Full-text search phrase.
    pub search: Option<String>,
}

/// [`DateTime`] when a [`Post`] was published.
pub type PublicationDateTime = DateTimeOf<(Post, unit::Creation)>;

/// [`DateTime`] when a [`Post`] was modified.
pub type ModificationDateTime = DateTimeOf<(Post, unit::Modification)>;

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use serde_json::json;

    use super::{Kind, Post, Status};

    #[test]
    fn parses_kind_aliases() {
        assert_eq!(Kind::from_str("gear").unwrap(), Kind::Equipment);
        assert_eq!(Kind::from_str("equipment").unwrap(), Kind::Equipment);
        assert_eq!(
            Kind::from_str("live-reference").unwrap(),
            Kind::LiveReference,
        );
        assert_eq!(
            Kind::from_str("audio_sample").unwrap(),
            Kind::AudioSample,
        );
        assert!(Kind::from_str("page").is_err());

        assert_eq!(Kind::Equipment.to_string(), "gear");
        assert_eq!(Kind::LiveReference.to_string(), "live_reference");
    }

    #[test]
    fn reconciles_equipment_and_recordings_only() {
        let reconciled = Kind::all()
            .filter(|k| k.reconciles_fields())
            .collect::<Vec<_>>();

        assert_eq!(reconciled, vec![Kind::Equipment, Kind::Recording]);
    }

    #[test]
    fn deserializes_upstream_post() {
        let post: Post = serde_json::from_value(json!({
            "id": 12,
            "type": "gear",
            "status": "publish",
            "slug": "u87",
            "link": "https://example.com/gear/u87",
            "title": {"rendered": "U87"},
            "content": {"rendered": "<p>Mic</p>", "raw": "Mic"},
            "featured_media": 0,
            "date_gmt": "2024-03-01T12:30:00",
            "modified_gmt": "2024-03-02T08:00:00",
            "acf": [],
            "meta": {"footnotes": ""},
        }))
        .unwrap();

        assert_eq!(post.id, 12.into());
        assert_eq!(post.kind, Kind::Equipment);
        assert_eq!(post.status, Status::Publish);
        assert_eq!(post.content.raw.as_deref(), Some("Mic"));
        assert_eq!(post.featured_media, None);
        assert!(post.acf.is_empty());
        assert_eq!(
            post.published_at.map(|d| d.to_rfc3339()).as_deref(),
            Some("2024-03-01T12:30:00Z"),
        );
    }
}
