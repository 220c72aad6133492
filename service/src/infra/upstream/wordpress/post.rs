//! [`Post`]-related [`WordPress`] operations.

use common::{
    operations::{By, Delete, Insert, Select, Update},
    pagination::Page,
};
use reqwest::Method;
use serde_json::json;
use tracerr::Traced;

use crate::{
    domain::{post, Post},
    infra::{upstream, Upstream},
};

use super::{Auth, WordPress};

/// Returns the route of the provided [`post::Key`].
fn route_of(key: post::Key) -> String {
    format!("wp/v2/{}/{}", key.kind.rest_base(), key.id)
}

impl<A: Auth> Upstream<Select<By<Option<Post>, post::Key>>> for WordPress<A> {
    type Ok = Option<Post>;
    type Err = Traced<upstream::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Post>, post::Key>>,
    ) -> Result<Self::Ok, Self::Err> {
        let key = by.into_inner();
        match Self::json(
            self.request(Method::GET, &route_of(key))
                .query(&[("context", Self::context())]),
        )
        .await
        {
            Ok(post) => Ok(Some(post)),
            Err(e) if e.as_ref().is_not_found() => Ok(None),
            Err(e) => Err(tracerr::wrap!()(e)),
        }
    }
}

impl<A: Auth> Upstream<Select<By<Page<Post>, post::Selector>>>
    for WordPress<A>
{
    type Ok = Page<Post>;
    type Err = Traced<upstream::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Page<Post>, post::Selector>>,
    ) -> Result<Self::Ok, Self::Err> {
        let post::Selector {
            kind,
            page,
            status,
            search,
        } = by.into_inner();

        let mut query = vec![("context", Self::context().to_owned())];
        if let Some(status) = status {
            query.push(("status", status.to_string()));
        } else if A::AUTHORIZED {
            query.push(("status", "any".to_owned()));
        }
        if let Some(search) = search.filter(|s| !s.trim().is_empty()) {
            query.push(("search", search));
        }

        Self::page(
            self.request(Method::GET, &format!("wp/v2/{}", kind.rest_base()))
                .query(&query),
            page.normalized(),
        )
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<A: Auth> Upstream<Insert<post::Draft>> for WordPress<A> {
    type Ok = Post;
    type Err = Traced<upstream::Error>;

    async fn execute(
        &self,
        Insert(draft): Insert<post::Draft>,
    ) -> Result<Self::Ok, Self::Err> {
        let route = format!("wp/v2/{}", draft.kind.rest_base());
        Self::json(self.request(Method::POST, &route).json(&draft.changes))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<A: Auth> Upstream<Update<post::Edit>> for WordPress<A> {
    type Ok = Post;
    type Err = Traced<upstream::Error>;

    async fn execute(
        &self,
        Update(edit): Update<post::Edit>,
    ) -> Result<Self::Ok, Self::Err> {
        Self::json(
            self.request(Method::POST, &route_of(edit.key))
                .json(&edit.changes),
        )
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<A: Auth> Upstream<Update<post::FieldsEdit>> for WordPress<A> {
    type Ok = ();
    type Err = Traced<upstream::Error>;

    async fn execute(
        &self,
        Update(edit): Update<post::FieldsEdit>,
    ) -> Result<Self::Ok, Self::Err> {
        let post::FieldsEdit { key, fields } = edit;
        let route = format!("acf/v3/{}/{}", key.kind.rest_base(), key.id);
        drop(
            Self::send(
                self.request(Method::POST, &route)
                    .json(&json!({ "fields": fields })),
            )
            .await
            .map_err(tracerr::wrap!())?,
        );
        Ok(())
    }
}

impl<A: Auth> Upstream<Delete<post::Removal>> for WordPress<A> {
    type Ok = ();
    type Err = Traced<upstream::Error>;

    async fn execute(
        &self,
        Delete(removal): Delete<post::Removal>,
    ) -> Result<Self::Ok, Self::Err> {
        let post::Removal { key, force } = removal;
        drop(
            Self::send(
                self.request(Method::DELETE, &route_of(key))
                    .query(&[("force", force)]),
            )
            .await
            .map_err(tracerr::wrap!())?,
        );
        Ok(())
    }
}
