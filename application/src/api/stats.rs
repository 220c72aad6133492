//! Dashboard statistics endpoint.

use axum::Extension;
use service::{query::dashboard_stats, Query as _};

use crate::{api::Json, session::Session, AsError, Error, Service};

/// Counts the content managed through the admin dashboard.
///
/// A count failing upstream is reported as `0`.
///
/// # Errors
///
/// If the session credentials can't be used upstream at all.
#[tracing::instrument(name = "stats.dashboard", skip_all)]
pub async fn dashboard(
    Extension(service): Extension<Service>,
    Session(session): Session,
) -> Result<Json<dashboard_stats::Output>, Error> {
    service
        .execute(dashboard_stats::DashboardStats {
            credentials: session.credentials,
        })
        .await
        .map(Json)
        .map_err(AsError::into_error)
}
