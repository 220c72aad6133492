//! Gate of the static admin UI.

use axum::{
    extract::{OriginalUri, Request},
    middleware::Next,
    response::{IntoResponse as _, Redirect, Response},
    Extension,
};
use axum_extra::extract::CookieJar;

use crate::{
    session::{CookieConfig, MaybeSession},
    Service,
};

/// Path the admin UI is served under.
pub const PATH: &str = "/admin";

/// Path of the admin login page.
pub const LOGIN_PATH: &str = "/admin/login";

/// Middleware letting through the admin UI requests having a valid session
/// cookie only.
///
/// Others are redirected to the [`LOGIN_PATH`], remembering where they were
/// heading to.
pub async fn gate(
    OriginalUri(uri): OriginalUri,
    Extension(service): Extension<Service>,
    Extension(cookies): Extension<CookieConfig>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Response {
    if is_public(uri.path())
        || MaybeSession::resolve(&service, &cookies, &jar)
            .await
            .is_some()
    {
        return next.run(request).await;
    }

    let target = uri
        .path_and_query()
        .map_or_else(|| uri.path(), http::uri::PathAndQuery::as_str);
    Redirect::to(&login_redirect(target)).into_response()
}

/// Indicates whether the provided admin UI `path` is reachable without a
/// session.
fn is_public(path: &str) -> bool {
    path.strip_prefix(LOGIN_PATH)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

/// Returns the [`LOGIN_PATH`] URL redirecting back to the provided `target`
/// after the login.
fn login_redirect(target: &str) -> String {
    format!("{LOGIN_PATH}?redirect={}", urlencoding::encode(target))
}

#[cfg(test)]
mod spec {
    use super::{is_public, login_redirect};

    #[test]
    fn exempts_login_page_only() {
        assert!(is_public("/admin/login"));
        assert!(is_public("/admin/login/"));
        assert!(is_public("/admin/login/index.html"));

        assert!(!is_public("/admin"));
        assert!(!is_public("/admin/"));
        assert!(!is_public("/admin/posts"));
        assert!(!is_public("/admin/loginx"));
    }

    #[test]
    fn encodes_redirect_target() {
        assert_eq!(
            login_redirect("/admin/posts?kind=gear&page=2"),
            "/admin/login?redirect=%2Fadmin%2Fposts%3Fkind%3Dgear%26page%3D2",
        );
    }
}
