//! [`Config`]-related definitions.

use std::time;

use config::{builder::DefaultState, ConfigBuilder, ConfigError};
use secrecy::{ExposeSecret as _, SecretBox, SecretString};
use service::domain::page;
use serde::Deserialize;
use smart_default::SmartDefault;

use crate::CookieConfig;

/// Application configuration.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    /// Server configuration.
    pub server: Server,

    /// Session configuration.
    pub session: Session,

    /// WordPress configuration.
    pub wordpress: WordPress,

    /// Mail configuration.
    pub mail: Mail,

    /// Revalidation configuration.
    pub revalidation: Revalidation,

    /// Log configuration.
    pub log: Log,
}

impl Config {
    /// Creates a new [`Config`] by:
    /// - loading it from the provided `path` (if any);
    /// - merging it with the environment variables (if any);
    /// - using default values for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(path: impl AsRef<str>) -> Result<Self, ConfigError> {
        ConfigBuilder::<DefaultState>::default()
            .add_source(config::File::with_name(path.as_ref()).required(false))
            .add_source(config::Environment::with_prefix("CONF").separator("."))
            .build()?
            .try_deserialize()
    }

    /// Builds the [`service::Config`] out of this [`Config`].
    #[must_use]
    pub fn service(&self) -> service::Config {
        let secret = self.session.secret.as_bytes();
        service::Config {
            jwt_encoding_key: jsonwebtoken::EncodingKey::from_secret(secret),
            jwt_decoding_key: jsonwebtoken::DecodingKey::from_secret(secret),
            session_ttl: self.session.ttl,
            revalidation_secret: self
                .revalidation
                .secret
                .as_ref()
                .and_then(|s| page::Secret::new(s.expose_secret()))
                .map(|s| SecretBox::init_with(move || s)),
        }
    }
}

/// Server configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Server {
    /// Host to bind the server to.
    #[default("0.0.0.0".to_owned())]
    pub host: String,

    /// Port to bind the server to.
    #[default(8080)]
    pub port: u16,

    /// [CORS] configuration.
    ///
    /// [CORS]: https://developer.mozilla.org/en-US/docs/Web/HTTP/CORS
    pub cors: Cors,

    /// Directory with the static admin panel assets served under `/admin`.
    #[default("admin".to_owned())]
    pub admin_dir: String,
}

/// [CORS] configuration.
///
/// [CORS]: https://developer.mozilla.org/en-US/docs/Web/HTTP/CORS
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Cors {
    /// List of allowed origins.
    #[default(vec!["*".to_owned()])]
    pub origins: Vec<String>,
}

/// Session configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Session {
    /// Secret signing the session cookies.
    ///
    /// Changing it invalidates every issued session.
    #[default("secret".to_owned())]
    pub secret: String,

    /// Lifetime of a session.
    #[default(time::Duration::from_secs(7 * 24 * 60 * 60))]
    #[serde(with = "humantime_serde")]
    pub ttl: time::Duration,

    /// Name of the session cookie.
    #[default("studio_session".to_owned())]
    pub cookie_name: String,

    /// Whether the session cookie is sent over HTTPS only.
    #[default(true)]
    pub secure: bool,
}

impl Session {
    /// Returns the [`CookieConfig`] of the session cookie.
    #[must_use]
    pub fn cookie(&self) -> CookieConfig {
        CookieConfig {
            name: self.cookie_name.clone(),
            secure: self.secure,
            max_age: self.ttl,
        }
    }
}

/// WordPress configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct WordPress {
    /// Root URL of the WordPress REST API.
    #[default("http://127.0.0.1:8000/wp-json".to_owned())]
    pub url: String,

    /// Timeout of a single request to WordPress.
    #[default(time::Duration::from_secs(30))]
    #[serde(with = "humantime_serde")]
    pub timeout: time::Duration,
}

impl From<WordPress> for service::infra::upstream::wordpress::Config {
    fn from(value: WordPress) -> Self {
        let WordPress { url, timeout } = value;
        Self { url, timeout }
    }
}

/// Mail configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Mail {
    /// Root URL of the Resend API.
    #[default("https://api.resend.com".to_owned())]
    pub api_url: String,

    /// Resend API key.
    ///
    /// Contact and newsletter forms fail without it.
    pub api_key: Option<SecretString>,

    /// Sender address of the emails.
    #[default("Studio <noreply@example.com>".to_owned())]
    pub from: String,

    /// Recipient address of the emails.
    #[default("studio@example.com".to_owned())]
    pub to: String,
}

impl From<Mail> for service::infra::mailer::resend::Config {
    fn from(value: Mail) -> Self {
        let Mail {
            api_url,
            api_key,
            from,
            to,
        } = value;
        Self {
            url: api_url,
            api_key,
            from,
            to,
            ..Self::default()
        }
    }
}

/// Revalidation configuration.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Revalidation {
    /// Secret shared with the CMS webhook.
    ///
    /// Revalidation requests are refused without it.
    pub secret: Option<SecretString>,

    /// URL of the frontend hook to forward invalidations to.
    pub hook_url: Option<String>,
}

impl From<Revalidation> for service::infra::pages::frontend::Config {
    fn from(value: Revalidation) -> Self {
        Self {
            hook_url: value.hook_url,
            ..Self::default()
        }
    }
}

/// Log configuration.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Log {
    /// Log level.
    pub level: LogLevel,
}

/// Log level.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    /// Designates very low priority, often extremely verbose, information.
    Trace,

    /// Designates lower priority information.
    Debug,

    /// Designates useful information.
    #[default]
    Info,

    /// Designates hazardous situations.
    Warn,

    /// Designates very serious errors.
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}
