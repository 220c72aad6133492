//! [`DashboardStats`] definition.

use std::collections::BTreeMap;

use common::{
    operations::{Authorize, Authorized, By, Select},
    pagination::{self, Page},
};
use futures::future;
use serde::Serialize;
use tracerr::Traced;

use crate::{
    domain::{post, user::Credentials, Media, Post},
    infra::{upstream, Upstream},
    Query, Service,
};

/// [`Query`] counting the content managed through the admin dashboard.
///
/// Every count is requested concurrently. A failed count is reported as `0`,
/// so a single broken content type doesn't take the whole dashboard down.
#[derive(Clone, Debug)]
pub struct DashboardStats {
    /// [`Credentials`] to count the content with.
    pub credentials: Credentials,
}

/// Output of the [`DashboardStats`] [`Query`].
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Output {
    /// Amount of [`Post`]s of every [`post::Kind`].
    pub posts: BTreeMap<post::Kind, u64>,

    /// Amount of [`Media`].
    pub media: u64,
}

impl<Up, Ml, Pg> Query<DashboardStats> for Service<Up, Ml, Pg>
where
    Up: Upstream<Authorize<Credentials>, Err = Traced<upstream::Error>>,
    Authorized<Up, Credentials>: Upstream<
            Select<By<Page<Post>, post::Selector>>,
            Ok = Page<Post>,
            Err = Traced<upstream::Error>,
        > + Upstream<
            Select<By<Page<Media>, pagination::Arguments>>,
            Ok = Page<Media>,
            Err = Traced<upstream::Error>,
        >,
{
    type Ok = Output;
    type Err = Traced<upstream::Error>;

    async fn execute(
        &self,
        DashboardStats { credentials }: DashboardStats,
    ) -> Result<Self::Ok, Self::Err> {
        let upstream = self
            .upstream()
            .execute(Authorize(credentials))
            .await
            .map_err(tracerr::wrap!())?;

        // Only totals are needed, so a single item per page suffices.
        let args = pagination::Arguments::new(Some(1), Some(1));

        let posts = future::join_all(post::Kind::all().map(|kind| {
            let upstream = &upstream;
            async move {
                let total = upstream
                    .execute(Select(By::<Page<Post>, _>::new(post::Selector {
                        kind,
                        page: args,
                        status: None,
                        search: None,
                    })))
                    .await
                    .map(|p| p.total)
                    .unwrap_or_else(|e| {
                        tracing::warn!(%kind, "failed to count posts: {e}");
                        0
                    });
                (kind, total)
            }
        }));
        let media = async {
            upstream
                .execute(Select(By::<Page<Media>, _>::new(args)))
                .await
                .map(|p| p.total)
                .unwrap_or_else(|e| {
                    tracing::warn!("failed to count media: {e}");
                    0
                })
        };
        let (posts, media) = future::join(posts, media).await;

        Ok(Output {
            posts: posts.into_iter().collect(),
            media,
        })
    }
}

#[cfg(test)]
mod spec {
    use std::{
        collections::BTreeMap,
        sync::{Arc, Mutex},
    };

    use common::{
        operations::{Authorize, By, Select},
        pagination::{self, Page},
        Handler,
    };
    use tracerr::Traced;

    use crate::{
        domain::{post, user::Credentials, Media, Post},
        infra::upstream,
        query::DashboardStats,
        Query as _,
    };

    /// Upstream counting `posts` of every kind, failing for `gear`.
    #[derive(Clone, Debug, Default)]
    struct Counting {
        requests: Arc<Mutex<usize>>,
    }

    fn page<T>(total: u64) -> Page<T> {
        Page {
            items: vec![],
            page: 1,
            per_page: 1,
            total,
            total_pages: u32::try_from(total).unwrap(),
        }
    }

    impl Handler<Authorize<Credentials>> for Counting {
        type Ok = Self;
        type Err = Traced<upstream::Error>;

        async fn execute(
            &self,
            _: Authorize<Credentials>,
        ) -> Result<Self::Ok, Self::Err> {
            Ok(self.clone())
        }
    }

    impl Handler<Select<By<Page<Post>, post::Selector>>> for Counting {
        type Ok = Page<Post>;
        type Err = Traced<upstream::Error>;

        async fn execute(
            &self,
            Select(by): Select<By<Page<Post>, post::Selector>>,
        ) -> Result<Self::Ok, Self::Err> {
            *self.requests.lock().unwrap() += 1;
            match by.into_inner().kind {
                post::Kind::Equipment => {
                    Err(tracerr::new!(upstream::Error::Rejected(
                        upstream::Rejection {
                            status: 500,
                            code: None,
                            message: "boom".into(),
                        },
                    )))
                }
                post::Kind::Post => Ok(page(7)),
                post::Kind::Artist
                | post::Kind::LiveReference
                | post::Kind::Recording
                | post::Kind::AudioSample => Ok(page(2)),
            }
        }
    }

    impl Handler<Select<By<Page<Media>, pagination::Arguments>>> for Counting {
        type Ok = Page<Media>;
        type Err = Traced<upstream::Error>;

        async fn execute(
            &self,
            _: Select<By<Page<Media>, pagination::Arguments>>,
        ) -> Result<Self::Ok, Self::Err> {
            *self.requests.lock().unwrap() += 1;
            Ok(page(13))
        }
    }

    #[tokio::test]
    async fn degrades_failed_counts_to_zero() {
        let upstream = Counting::default();
        let service = crate::command::spec::service(upstream.clone());

        let stats = service
            .execute(DashboardStats {
                credentials: crate::command::spec::credentials(),
            })
            .await
            .unwrap();

        assert_eq!(
            stats.posts,
            BTreeMap::from([
                (post::Kind::Post, 7),
                (post::Kind::Artist, 2),
                (post::Kind::Equipment, 0),
                (post::Kind::LiveReference, 2),
                (post::Kind::Recording, 2),
                (post::Kind::AudioSample, 2),
            ]),
        );
        assert_eq!(stats.media, 13);
        assert_eq!(*upstream.requests.lock().unwrap(), 7);
    }
}
