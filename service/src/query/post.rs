//! [`Query`] collection related to [`Post`]s.

use common::{operations::By, pagination::Page};

use crate::domain::{post, Post};
#[cfg(doc)]
use crate::Query;

use super::{AuthorizedQuery, UpstreamQuery};

/// Queries a [`Post`] by its [`post::Key`] on behalf of a user.
pub type ById = AuthorizedQuery<By<Option<Post>, post::Key>>;

/// Queries a [`Page`] of [`Post`]s on behalf of a user.
pub type List = AuthorizedQuery<By<Page<Post>, post::Selector>>;

/// Queries a published [`Post`] by its [`post::Key`].
pub type PublicById = UpstreamQuery<By<Option<Post>, post::Key>>;

/// Queries a [`Page`] of published [`Post`]s.
pub type PublicList = UpstreamQuery<By<Page<Post>, post::Selector>>;
