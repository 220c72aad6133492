//! [`Query`] collection related to [`AppPassword`]s.

use common::operations::By;

use crate::domain::{user, AppPassword};
#[cfg(doc)]
use crate::Query;

use super::AuthorizedQuery;

/// Queries all the [`AppPassword`]s of the current user.
pub type List = AuthorizedQuery<By<Vec<AppPassword>, user::Current>>;
