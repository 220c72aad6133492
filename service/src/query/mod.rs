//! [`Query`] definition.

pub mod app_password;
pub mod dashboard_stats;
pub mod media;
pub mod post;
pub mod user;

use common::operations::{Authorize, Authorized, By, Select};
use tracerr::Traced;

use crate::{
    domain::user::Credentials,
    infra::{upstream, Upstream},
    Service,
};

pub use self::dashboard_stats::DashboardStats;

/// [`Query`] of the [`Service`].
pub use common::Handler as Query;

/// [`Query`] [`Select`]ing a `T`ype from an anonymous [`Upstream`].
///
/// Sees the public content only.
#[derive(Clone, Copy, Debug)]
#[expect(clippy::module_name_repetitions, reason = "more readable")]
pub struct UpstreamQuery<T>(T);

impl<W, B> UpstreamQuery<By<W, B>> {
    /// Creates a new [`UpstreamQuery`] selecting a `W` by the provided `B`.
    #[must_use]
    pub fn by(by: B) -> Self {
        Self(By::new(by))
    }
}

impl<Up, Ml, Pg, W, B> Query<UpstreamQuery<By<W, B>>> for Service<Up, Ml, Pg>
where
    Up: Upstream<Select<By<W, B>>, Ok = W, Err = Traced<upstream::Error>>,
{
    type Ok = W;
    type Err = Traced<upstream::Error>;

    async fn execute(
        &self,
        UpstreamQuery(by): UpstreamQuery<By<W, B>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.upstream()
            .execute(Select(by))
            .await
            .map_err(tracerr::wrap!())
    }
}

/// [`Query`] [`Select`]ing a `T`ype from an [`Upstream`] [`Authorize`]d with
/// the [`Credentials`] of a [`Session`].
///
/// [`Session`]: crate::domain::user::Session
#[derive(Clone, Debug)]
#[expect(clippy::module_name_repetitions, reason = "more readable")]
pub struct AuthorizedQuery<T> {
    /// [`Credentials`] to [`Authorize`] the [`Upstream`] with.
    credentials: Credentials,

    /// Selector of the [`Query`].
    selector: T,
}

impl<W, B> AuthorizedQuery<By<W, B>> {
    /// Creates a new [`AuthorizedQuery`] selecting a `W` by the provided `B`
    /// on behalf of the provided [`Credentials`].
    #[must_use]
    pub fn by(credentials: Credentials, by: B) -> Self {
        Self {
            credentials,
            selector: By::new(by),
        }
    }
}

impl<Up, Ml, Pg, W, B> Query<AuthorizedQuery<By<W, B>>> for Service<Up, Ml, Pg>
where
    Up: Upstream<Authorize<Credentials>, Err = Traced<upstream::Error>>,
    Authorized<Up, Credentials>:
        Upstream<Select<By<W, B>>, Ok = W, Err = Traced<upstream::Error>>,
{
    type Ok = W;
    type Err = Traced<upstream::Error>;

    async fn execute(
        &self,
        query: AuthorizedQuery<By<W, B>>,
    ) -> Result<Self::Ok, Self::Err> {
        let AuthorizedQuery {
            credentials,
            selector,
        } = query;

        self.upstream()
            .execute(Authorize(credentials))
            .await
            .map_err(tracerr::wrap!())?
            .execute(Select(selector))
            .await
            .map_err(tracerr::wrap!())
    }
}
