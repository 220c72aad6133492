use std::sync::{Arc, Mutex};

use application::{Config, Service};
use axum::{
    body::{to_bytes, Body},
    extract::{Path, State},
    http::{header, HeaderMap, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use secrecy::SecretString;
use serde_json::{json, Value};
use service::infra::{Frontend, Resend, WordPress};
use tokio::net::TcpListener;
use tower::ServiceExt as _;

/// `admin:abcd efgh ijkl mnop` in HTTP Basic form.
const APP_PASSWORD: &str = "Basic YWRtaW46YWJjZCBlZmdoIGlqa2wgbW5vcA==";

/// `admin:primary-password` in HTTP Basic form.
const PRIMARY_PASSWORD: &str = "Basic YWRtaW46cHJpbWFyeS1wYXNzd29yZA==";

/// State of the fake WordPress.
#[derive(Debug, Default)]
struct Fake {
    /// Custom fields of the `gear` post `5`.
    acf: serde_json::Map<String, Value>,

    /// Amount of calls to the dedicated custom field endpoint.
    acf_endpoint_calls: usize,
}

type Shared = Arc<Mutex<Fake>>;

async fn me(headers: HeaderMap) -> Response {
    match headers.get(header::AUTHORIZATION).and_then(|h| h.to_str().ok()) {
        Some(APP_PASSWORD) => Json(json!({
            "id": 1,
            "name": "Studio Admin",
            "email": "admin@example.com",
        }))
        .into_response(),
        Some(PRIMARY_PASSWORD) => (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "code": "application_password_required",
                "message": "An application password is required.",
            })),
        )
            .into_response(),
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "code": "incorrect_password",
                "message": "The password you entered is incorrect.",
            })),
        )
            .into_response(),
    }
}

fn gear(acf: &serde_json::Map<String, Value>) -> Value {
    json!({
        "id": 5,
        "type": "gear",
        "status": "publish",
        "slug": "u87",
        "title": {"rendered": "U87"},
        "acf": acf,
    })
}

async fn read_gear(
    State(fake): State<Shared>,
    Path(id): Path<u64>,
) -> Response {
    if id == 9 {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "code": "db_connect_error",
                "message": "Error establishing a database connection.",
            })),
        )
            .into_response();
    }
    if id != 5 {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({
                "code": "rest_post_invalid_id",
                "message": "Invalid post ID.",
            })),
        )
            .into_response();
    }
    Json(gear(&fake.lock().unwrap().acf)).into_response()
}

/// Entity update silently dropping the inline custom fields.
async fn update_gear(State(fake): State<Shared>) -> Json<Value> {
    Json(gear(&fake.lock().unwrap().acf))
}

async fn update_gear_fields(
    State(fake): State<Shared>,
    Json(body): Json<Value>,
) -> Json<Value> {
    let mut fake = fake.lock().unwrap();
    fake.acf_endpoint_calls += 1;
    if let Some(fields) = body["fields"].as_object() {
        for (k, v) in fields {
            // Upstream stores every value as a string.
            let v = match v {
                Value::Number(n) => Value::String(n.to_string()),
                v => v.clone(),
            };
            drop(fake.acf.insert(k.clone(), v));
        }
    }
    Json(json!({ "acf": fake.acf }))
}

/// Spawns a fake WordPress, returning the root URL of its REST API.
async fn wordpress(fake: Shared) -> String {
    let app = Router::new()
        .route("/wp-json/wp/v2/users/me", get(me))
        .route("/wp-json/wp/v2/gear/:id", get(read_gear).post(update_gear))
        .route("/wp-json/acf/v3/gear/:id", post(update_gear_fields))
        .with_state(fake);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    }));
    format!("http://{addr}/wp-json")
}

fn app(wordpress_url: &str, revalidation_secret: Option<&str>) -> Router {
    let mut config = Config::default();
    config.wordpress.url = wordpress_url.to_owned();
    config.session.secure = false;
    config.revalidation.secret =
        revalidation_secret.map(|s| SecretString::from(s.to_owned()));

    let service = Service::new(
        config.service(),
        WordPress::new(&config.wordpress.clone().into()).unwrap(),
        Resend::new(config.mail.clone().into()).unwrap(),
        Frontend::new(config.revalidation.clone().into()).unwrap(),
    );
    application::router(service, config.session.cookie(), "no-admin-assets")
}

/// [`app`] without a reachable WordPress.
fn offline_app() -> Router {
    app("http://127.0.0.1:9/wp-json", Some("hook"))
}

async fn send(
    app: &Router,
    request: Request<Body>,
) -> (StatusCode, HeaderMap, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let (status, headers) = (response.status(), response.headers().clone());
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, headers, body)
}

fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut request = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        request = request.header(header::COOKIE, cookie);
    }
    request.body(Body::empty()).unwrap()
}

/// Logs in with the application password, returning the session cookie pair.
async fn login(app: &Router) -> String {
    let (status, headers, _) = send(
        app,
        json_request(
            "POST",
            "/api/auth/login",
            &json!({"username": "admin", "password": "abcd efgh ijkl mnop"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let cookie = headers[header::SET_COOKIE].to_str().unwrap();
    cookie.split(';').next().unwrap().to_owned()
}

#[tokio::test]
async fn rejects_empty_password_before_upstream() {
    let (status, _, body) = send(
        &offline_app(),
        json_request(
            "POST",
            "/api/auth/login",
            &json!({"username": "admin", "password": ""}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["message"], "Passwort ist erforderlich.");
}

#[tokio::test]
async fn rejects_wrong_credentials() {
    let app = app(&wordpress(Shared::default()).await, None);

    let (status, headers, body) = send(
        &app,
        json_request(
            "POST",
            "/api/auth/login",
            &json!({"username": "admin", "password": "wrong"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "WRONG_CREDENTIALS");
    assert!(!headers.contains_key(header::SET_COOKIE));
}

#[tokio::test]
async fn distinguishes_application_password_policy() {
    let app = app(&wordpress(Shared::default()).await, None);

    let (status, _, body) = send(
        &app,
        json_request(
            "POST",
            "/api/auth/login",
            &json!({"username": "admin", "password": "primary-password"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "APPLICATION_PASSWORD_REQUIRED");
}

#[tokio::test]
async fn opens_and_closes_session() {
    let app = app(&wordpress(Shared::default()).await, None);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            &json!({"username": "admin", "password": "abcd efgh ijkl mnop"}),
        ))
        .await
        .unwrap();
    let set_cookie = response.headers()[header::SET_COOKIE]
        .to_str()
        .unwrap()
        .to_owned();
    assert!(set_cookie.starts_with("studio_session="));
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Lax"));
    assert!(set_cookie.contains("Path=/"));
    assert!(set_cookie.contains("Max-Age=604800"));

    let cookie = set_cookie.split(';').next().unwrap();
    let (status, _, body) =
        send(&app, get_request("/api/auth/session", Some(cookie))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["name"], "Studio Admin");
    assert_eq!(body["user"]["email"], "admin@example.com");

    let (status, headers, _) = send(
        &app,
        Request::builder()
            .method("POST")
            .uri("/api/auth/logout")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let removal = headers[header::SET_COOKIE].to_str().unwrap();
    assert!(removal.starts_with("studio_session=;"));
    assert!(removal.contains("Max-Age=0"));

    let (status, _, body) =
        send(&app, get_request("/api/auth/session", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn refuses_tampered_session() {
    let app = app(&wordpress(Shared::default()).await, None);
    let cookie = login(&app).await;

    let (status, _, _) = send(
        &app,
        get_request("/api/admin/stats", Some(&format!("{cookie}x"))),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn guards_admin_api() {
    let (status, headers, body) =
        send(&offline_app(), get_request("/api/admin/posts/gear", None)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");
    assert!(!headers.contains_key(header::LOCATION));
}

#[tokio::test]
async fn redirects_admin_ui_to_login() {
    let app = offline_app();

    let (status, headers, _) =
        send(&app, get_request("/admin/posts?kind=gear", None)).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(
        headers[header::LOCATION],
        "/admin/login?redirect=%2Fadmin%2Fposts%3Fkind%3Dgear",
    );

    let (status, _, _) = send(&app, get_request("/admin/login", None)).await;
    assert_ne!(status, StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn lets_session_into_admin_ui() {
    let app = app(&wordpress(Shared::default()).await, None);
    let cookie = login(&app).await;

    let (status, _, _) =
        send(&app, get_request("/admin/posts", Some(&cookie))).await;

    // No assets in tests, but the gate is passed.
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn reconciles_dropped_gear_fields() {
    let fake = Shared::default();
    let app = app(&wordpress(Arc::clone(&fake)).await, None);
    let cookie = login(&app).await;

    let mut request = json_request(
        "PUT",
        "/api/admin/posts/gear/5",
        &json!({"title": "U87 Ai", "acf": {"price": 42}}),
    );
    drop(
        request
            .headers_mut()
            .insert(header::COOKIE, cookie.parse().unwrap()),
    );
    let (status, _, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"], "gear");
    assert_eq!(body["acf"]["price"], "42");
    assert_eq!(fake.lock().unwrap().acf_endpoint_calls, 1);
}

#[tokio::test]
async fn hides_missing_public_posts() {
    let app = app(&wordpress(Shared::default()).await, None);

    let (status, _, body) =
        send(&app, get_request("/api/posts/gear/7", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    let (status, _, body) =
        send(&app, get_request("/api/posts/equipment/5", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["slug"], "u87");
}

#[tokio::test]
async fn hides_upstream_failure_details() {
    let app = app(&wordpress(Shared::default()).await, None);

    let (status, _, body) =
        send(&app, get_request("/api/posts/gear/9", None)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "UPSTREAM_ERROR");
    assert_eq!(body["message"], "WordPress hat die Anfrage nicht verarbeitet.");
}

#[tokio::test]
async fn revalidates_pages_of_post_type() {
    let (status, _, body) = send(
        &offline_app(),
        get_request("/api/revalidate?secret=hook&postType=gear", None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["revalidated"], true);
    assert_eq!(body["paths"], json!(["/equipment-verleih", "/"]));
    assert!(body["now"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn revalidates_path_from_body() {
    let (status, _, body) = send(
        &offline_app(),
        json_request(
            "POST",
            "/api/revalidate",
            &json!({"secret": "hook", "path": "/blog/new-song"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["paths"], json!(["/blog/new-song"]));
}

#[tokio::test]
async fn refuses_wrong_revalidation_secret() {
    let (status, _, body) = send(
        &offline_app(),
        get_request("/api/revalidate?secret=nope&postType=gear", None),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid token");
}

#[tokio::test]
async fn refuses_revalidation_without_configured_secret() {
    let app = app("http://127.0.0.1:9/wp-json", None);

    let (status, _, body) = send(
        &app,
        get_request("/api/revalidate?secret=hook&postType=gear", None),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "NOT_CONFIGURED");
}

#[tokio::test]
async fn validates_contact_form_before_mailing() {
    let app = offline_app();

    let (status, _, body) = send(
        &app,
        json_request(
            "POST",
            "/api/contact",
            &json!({"name": "", "email": "eva@example.com", "message": "x"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Name ist erforderlich.");

    let (status, _, body) = send(
        &app,
        json_request(
            "POST",
            "/api/contact",
            &json!({
                "name": "Eva",
                "email": "eva@example.com",
                "message": "Ich brauche ein Angebot.",
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "NOT_CONFIGURED");
}
