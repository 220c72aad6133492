//! [`Query`] collection related to a single [`User`].

use common::operations::By;

use crate::domain::{user, User};
#[cfg(doc)]
use crate::Query;

use super::AuthorizedQuery;

/// Queries the [`User`] the [`user::Credentials`] belong to.
pub type Current = AuthorizedQuery<By<User, user::Current>>;
