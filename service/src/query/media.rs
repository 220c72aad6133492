//! [`Query`] collection related to [`Media`].

use common::{
    operations::By,
    pagination::{self, Page},
};

use crate::domain::Media;
#[cfg(doc)]
use crate::Query;

use super::AuthorizedQuery;

/// Queries a [`Page`] of [`Media`] on behalf of a user.
pub type List = AuthorizedQuery<By<Page<Media>, pagination::Arguments>>;
