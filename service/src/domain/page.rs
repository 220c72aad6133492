//! Statically rendered page definitions.

use derive_more::{AsRef, Display};
use secrecy::{zeroize::Zeroize, CloneableSecret};

use crate::domain::post;

/// Path of a statically rendered page.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str)]
pub struct Path(String);

impl Path {
    /// Path of the home page.
    #[must_use]
    pub fn home() -> Self {
        Self("/".to_owned())
    }

    /// Creates a new [`Path`] if the given `path` is valid.
    ///
    /// It must be absolute, and must not contain a query or a fragment.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Option<Self> {
        let path = path.into();
        (path.starts_with('/')
            && !path.contains(['?', '#'])
            && !path.chars().any(char::is_whitespace))
        .then_some(Self(path))
    }

    /// Creates a new [`Path`] out of a static string.
    fn fixed(path: &'static str) -> Self {
        Self(path.to_owned())
    }
}

/// Cache tag grouping several statically rendered pages.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str)]
pub struct Tag(String);

impl Tag {
    /// Creates a new [`Tag`] if the given `tag` is valid.
    #[must_use]
    pub fn new(tag: impl AsRef<str>) -> Option<Self> {
        let tag = tag.as_ref().trim();
        (!tag.is_empty() && tag.len() <= 256).then(|| Self(tag.to_owned()))
    }
}

/// Target of a page invalidation.
#[derive(Clone, Debug, Display, Eq, Hash, PartialEq)]
pub enum Target {
    /// Single page by its [`Path`].
    #[display("path `{_0}`")]
    Path(Path),

    /// Every page tagged with the [`Tag`].
    #[display("tag `{_0}`")]
    Tag(Tag),
}

/// Returns [`Path`]s of the pages rendering content of the provided upstream
/// `post_type`.
///
/// Unknown post types invalidate the home page only.
#[must_use]
pub fn paths_of(post_type: &str) -> Vec<Path> {
    let section = match post_type.trim().parse::<post::Kind>() {
        Ok(post::Kind::Post) => Some("/blog"),
        Ok(post::Kind::Artist) => Some("/artists"),
        Ok(post::Kind::Equipment) => Some("/equipment-verleih"),
        Ok(post::Kind::LiveReference) => Some("/live"),
        Ok(post::Kind::Recording | post::Kind::AudioSample) => {
            Some("/recording")
        }
        Err(_) => None,
    };
    section
        .map(Path::fixed)
        .into_iter()
        .chain([Path::home()])
        .collect()
}

/// Secret shared with the CMS, authorizing page invalidation requests.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Secret(String);

impl Secret {
    /// Creates a new [`Secret`] if the given `secret` is not empty.
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Option<Self> {
        let secret = secret.into();
        (!secret.is_empty()).then_some(Self(secret))
    }

    /// Compares this [`Secret`] with the `provided` one in constant time
    /// regarding the contents.
    #[must_use]
    pub fn matches(&self, provided: &str) -> bool {
        let (expected, provided) = (self.0.as_bytes(), provided.as_bytes());
        expected.len() == provided.len()
            && expected
                .iter()
                .zip(provided)
                .fold(0, |acc, (a, b)| acc | (a ^ b))
                == 0
    }
}

impl CloneableSecret for Secret {}
impl Zeroize for Secret {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}
