use std::{io, net::SocketAddr, sync::OnceLock, time};

use application::{Args, Config, Service};
use axum::extract::MatchedPath;
use axum_client_ip::InsecureClientIp;
use service::infra::{Frontend, Resend, WordPress};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing as log;
use tracing_subscriber::{
    filter::filter_fn,
    layer::{Layer as _, SubscriberExt as _},
    util::SubscriberInitExt as _,
};

const STDERR_LEVELS: &[log::Level] = &[log::Level::WARN, log::Level::ERROR];

static LOG_LEVEL: OnceLock<log::Level> = OnceLock::new();

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_ansi(true)
                .with_thread_names(true)
                .with_writer(io::stdout)
                .with_filter(filter_fn(|meta| {
                    meta.is_span()
                        || (!STDERR_LEVELS.contains(meta.level()))
                            && LOG_LEVEL
                                .get()
                                .copied()
                                .unwrap_or(log::Level::INFO)
                                >= *meta.level()
                })),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_ansi(true)
                .with_thread_names(true)
                .with_writer(io::stderr)
                .with_filter(filter_fn(|meta| {
                    meta.is_span()
                        || (STDERR_LEVELS.contains(meta.level()))
                            && LOG_LEVEL
                                .get()
                                .copied()
                                .unwrap_or(log::Level::INFO)
                                >= *meta.level()
                })),
        )
        .init();

    _ = start().await;
}

async fn start() -> Result<(), ()> {
    let Args { config } = Args::parse().map_err(|e| {
        log::error!("failed to parse command line arguments: {e}");
    })?;

    let config = Config::new(config).map_err(|e| {
        log::error!("failed to load `Config`: {e}");
    })?;
    let service_config = config.service();
    let Config {
        server,
        session,
        wordpress,
        mail,
        revalidation,
        log,
    } = config;

    LOG_LEVEL
        .set(log.level.into())
        .unwrap_or_else(|_| unreachable!("first initialization"));

    if session.secret == application::config::Session::default().secret {
        log::warn!("`session.secret` is the default one, set a real secret");
    }

    let wordpress = WordPress::new(&wordpress.into()).map_err(|e| {
        log::error!("failed to initialize `WordPress` client: {e}");
    })?;
    let mailer = Resend::new(mail.into()).map_err(|e| {
        log::error!("failed to initialize `Resend` client: {e}");
    })?;
    let pages = Frontend::new(revalidation.into()).map_err(|e| {
        log::error!("failed to initialize `Frontend` client: {e}");
    })?;

    let service = Service::new(service_config, wordpress, mailer, pages);

    let mut cors = CorsLayer::new()
        .allow_methods([
            http::Method::DELETE,
            http::Method::GET,
            http::Method::OPTIONS,
            http::Method::POST,
            http::Method::PUT,
        ])
        .allow_headers([http::header::CONTENT_TYPE]);
    if server.cors.origins.iter().any(|o| o == "*") {
        cors = cors.allow_origin(AllowOrigin::any());
    } else {
        let mut origins = Vec::with_capacity(server.cors.origins.len());
        for origin in &server.cors.origins {
            origins.push(
                origin.parse::<http::header::HeaderValue>().map_err(|e| {
                    log::error!("`{origin}` is not correct CORS origin: {e}");
                })?,
            );
        }
        cors = cors
            .allow_origin(AllowOrigin::list(origins))
            .allow_credentials(true);
    }

    let app =
        application::router(service, session.cookie(), &server.admin_dir)
            .layer(cors)
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(|r: &http::Request<_>| {
                        tracing::info_span!(
                            "HTTP request",
                            http.client_ip = InsecureClientIp::from(
                                r.headers(),
                                r.extensions()
                            )
                                .map(|ip| ip.0.to_string())
                                .ok(),
                            http.flavor = ?r.version(),
                            http.host = r.uri().host(),
                            http.method = r.method().as_str(),
                            http.route = r
                                .extensions()
                                .get::<MatchedPath>()
                                .map(MatchedPath::as_str),
                            http.scheme = r
                                .uri()
                                .scheme()
                                .map(http::uri::Scheme::as_str),
                            http.target = r
                                .uri()
                                .path_and_query()
                                .map(http::uri::PathAndQuery::as_str),
                            http.user_agent = r
                                .headers()
                                .get("User-Agent")
                                .and_then(|h| h.to_str().ok()),
                            http.status_code = tracing::field::Empty,
                        )
                    })
                    .on_response(
                        |r: &http::Response<_>,
                         dur: time::Duration,
                         span: &tracing::Span| {
                            span.record(
                                "http.status_code",
                                tracing::field::display(r.status().as_u16()),
                            );

                            if r.status().is_server_error() {
                                tracing::error!(
                                    duration = format!("{}ms", dur.as_millis()),
                                );
                            } else if r.status().is_client_error() {
                                tracing::warn!(
                                    duration = format!("{}ms", dur.as_millis()),
                                );
                            } else {
                                tracing::info!(
                                    duration = format!("{}ms", dur.as_millis()),
                                );
                            }
                        },
                    ),
            );

    let listener = TcpListener::bind((server.host.clone(), server.port))
        .await
        .map_err(|e| {
            log::error!(
                "failed to listen on `{}:{}`: {e}",
                server.host,
                server.port,
            );
        })?;

    log::info!("listening on `{}:{}`", server.host, server.port);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .map_err(|e| log::error!("webserver failed: {e}"))
}
