//! [`User`]-related [`WordPress`] operations.

use common::operations::{By, Select};
use reqwest::Method;
use tracerr::Traced;

use crate::{
    domain::{user, User},
    infra::{upstream, Upstream},
};

use super::{Auth, WordPress};

impl<A: Auth> Upstream<Select<By<User, user::Current>>> for WordPress<A> {
    type Ok = User;
    type Err = Traced<upstream::Error>;

    async fn execute(
        &self,
        _: Select<By<User, user::Current>>,
    ) -> Result<Self::Ok, Self::Err> {
        Self::json(
            self.request(Method::GET, "wp/v2/users/me")
                .query(&[("context", Self::context())]),
        )
        .await
        .map_err(tracerr::wrap!())
    }
}
