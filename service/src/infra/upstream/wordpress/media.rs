//! [`Media`]-related [`WordPress`] operations.

use common::{
    operations::{By, Delete, Insert, Select},
    pagination::{self, Page},
};
use reqwest::{header, Method};
use serde_json::{Map, Value};
use tracerr::Traced;

use crate::{
    domain::{media, Media},
    infra::{upstream, Upstream},
};

use super::{Auth, WordPress};

/// Route of the [`Media`] collection.
const ROUTE: &str = "wp/v2/media";

impl<A: Auth> Upstream<Select<By<Page<Media>, pagination::Arguments>>>
    for WordPress<A>
{
    type Ok = Page<Media>;
    type Err = Traced<upstream::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Page<Media>, pagination::Arguments>>,
    ) -> Result<Self::Ok, Self::Err> {
        Self::page(
            self.request(Method::GET, ROUTE)
                .query(&[("context", Self::context())]),
            by.into_inner().normalized(),
        )
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<A: Auth> Upstream<Insert<media::Upload>> for WordPress<A> {
    type Ok = Media;
    type Err = Traced<upstream::Error>;

    async fn execute(
        &self,
        Insert(upload): Insert<media::Upload>,
    ) -> Result<Self::Ok, Self::Err> {
        let media::Upload {
            file_name,
            mime_type,
            bytes,
            title,
            alt_text,
        } = upload;

        let media: Media = Self::json(
            self.request(Method::POST, ROUTE)
                .header(header::CONTENT_TYPE, mime_type)
                .header(
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{file_name}\""),
                )
                .body(bytes),
        )
        .await
        .map_err(tracerr::wrap!())?;

        let mut details = Map::new();
        if let Some(title) = title.filter(|t| !t.trim().is_empty()) {
            drop(details.insert("title".into(), Value::String(title)));
        }
        if let Some(alt) = alt_text.filter(|t| !t.trim().is_empty()) {
            drop(details.insert("alt_text".into(), Value::String(alt)));
        }
        if details.is_empty() {
            return Ok(media);
        }

        Self::json(
            self.request(Method::POST, &format!("{ROUTE}/{}", media.id))
                .json(&details),
        )
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<A: Auth> Upstream<Delete<media::Id>> for WordPress<A> {
    type Ok = ();
    type Err = Traced<upstream::Error>;

    async fn execute(
        &self,
        Delete(id): Delete<media::Id>,
    ) -> Result<Self::Ok, Self::Err> {
        drop(
            Self::send(
                self.request(Method::DELETE, &format!("{ROUTE}/{id}"))
                    .query(&[("force", true)]),
            )
            .await
            .map_err(tracerr::wrap!())?,
        );
        Ok(())
    }
}
