//! [`AppPassword`]-related [`WordPress`] operations.

use common::operations::{By, Delete, Insert, Select};
use reqwest::Method;
use serde_json::json;
use tracerr::Traced;
use uuid::Uuid;

use crate::{
    domain::{
        app_password::{self, Issued},
        user, AppPassword,
    },
    infra::{upstream, Upstream},
};

use super::{Auth, WordPress};

/// Route of the application passwords of the current user.
const ROUTE: &str = "wp/v2/users/me/application-passwords";

impl<A: Auth> Upstream<Select<By<Vec<AppPassword>, user::Current>>>
    for WordPress<A>
{
    type Ok = Vec<AppPassword>;
    type Err = Traced<upstream::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<AppPassword>, user::Current>>,
    ) -> Result<Self::Ok, Self::Err> {
        Self::json(self.request(Method::GET, ROUTE))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<A: Auth> Upstream<Insert<app_password::Name>> for WordPress<A> {
    type Ok = Issued;
    type Err = Traced<upstream::Error>;

    async fn execute(
        &self,
        Insert(name): Insert<app_password::Name>,
    ) -> Result<Self::Ok, Self::Err> {
        Self::json(
            self.request(Method::POST, ROUTE)
                .json(&json!({ "name": name.as_ref() })),
        )
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<A: Auth> Upstream<Delete<By<AppPassword, Uuid>>> for WordPress<A> {
    type Ok = ();
    type Err = Traced<upstream::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<AppPassword, Uuid>>,
    ) -> Result<Self::Ok, Self::Err> {
        let uuid = by.into_inner();
        drop(
            Self::send(self.request(Method::DELETE, &format!("{ROUTE}/{uuid}")))
                .await
                .map_err(tracerr::wrap!())?,
        );
        Ok(())
    }
}
