//! [`Error`]-related definitions.

use std::fmt;

use axum::{
    extract::{
        multipart::MultipartError,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    response::{IntoResponse, Response},
    Json,
};
use derive_more::Error as StdError;
use itertools::Itertools as _;
use serde::Serialize;
use service::infra::{mailer, pages, upstream};
use tracerr::{Trace, Traced};

/// Defines a new error type.
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_error {
    (
        enum $name:ident {
            $(
                #[code = $code:literal]
                #[status = $status_code:ident]
                #[message = $message:literal]
                $variant:ident
            ),* $(,)?
        }
    ) => {
        /// Error type.
        #[derive(
            Clone,
            Copy,
            Debug,
            ::derive_more::Display,
            ::derive_more::Error
        )]
        #[repr(u16)]
        pub enum $name {
            $(
                #[display($message)]
                #[doc = $message]
                $variant,
            )*
        }

        impl From<$name> for $crate::Error {
            fn from(err: $name) -> Self {
                match err {
                    $(
                        $name::$variant => Self {
                            code: $code,
                            status_code: ::http::StatusCode::$status_code,
                            message: $message.to_string(),
                            backtrace: None,
                        },
                    )*
                }
            }
        }
    };
}

/// HTTP API [`Error`].
#[derive(Clone, Debug, StdError)]
pub struct Error {
    /// [`Error`] code.
    pub code: Code,

    /// [`http::StatusCode`] of this [`Error`].
    pub status_code: http::StatusCode,

    /// Backtrace of this [`Error`].
    #[error(not(backtrace))]
    pub backtrace: Option<Trace>,

    /// [`Error`] message.
    pub message: String,
}

impl Error {
    /// Message shown instead of the details of internal errors.
    pub const INTERNAL_MESSAGE: &'static str =
        "Ein interner Fehler ist aufgetreten. Bitte versuche es später \
         erneut.";

    /// Message shown for failed upstream operations.
    pub const UPSTREAM_MESSAGE: &'static str =
        "WordPress hat die Anfrage nicht verarbeitet.";

    /// Create a new [`Error`] representing an internal server error.
    #[must_use]
    pub fn internal(msg: &impl ToString) -> Self {
        Self {
            code: "INTERNAL_SERVER_ERROR",
            status_code: http::StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.to_string(),
            backtrace: None,
        }
    }

    /// Creates a new [`Error`] representing invalid input, described by the
    /// provided `msg`.
    #[must_use]
    pub fn validation(msg: impl Into<String>) -> Self {
        Self {
            code: "VALIDATION_ERROR",
            status_code: http::StatusCode::BAD_REQUEST,
            message: msg.into(),
            backtrace: None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            code,
            status_code: _,
            backtrace,
            message,
        } = self;

        write!(
            f,
            "[{code}]: {message}{}",
            backtrace
                .iter()
                .format_with("\n", |trace, f| f(&format_args!("{trace}"))),
        )
    }
}

/// JSON body of an [`Error`] response.
#[derive(Debug, Serialize)]
struct Body<'e> {
    /// [`Error`] code.
    code: Code,

    /// [`Error`] message.
    message: &'e str,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let message = if self.status_code.is_server_error() {
            tracing::error!("{self}");
            if self.code == "INTERNAL_SERVER_ERROR" {
                Self::INTERNAL_MESSAGE
            } else {
                self.message.as_str()
            }
        } else {
            self.message.as_str()
        };

        (
            self.status_code,
            Json(Body {
                code: self.code,
                message,
            }),
        )
            .into_response()
    }
}

/// [`Error`] code.
pub type Code = &'static str;

/// Helper trait for converting types into [`Error`]s.
pub trait AsError {
    /// Tries to convert the type into an [`Error`].
    ///
    /// [`None`] is returned if the type cannot be converted into an [`Error`].
    fn try_as_error(&self) -> Option<Error>;

    /// Converts the type into an [`Error`].
    fn as_error(&self) -> Error
    where
        Self: fmt::Display,
    {
        self.try_as_error()
            .unwrap_or_else(|| Error::internal(&self))
    }

    /// Converts the type into an [`Error`] by consuming it.
    fn into_error(self) -> Error
    where
        Self: fmt::Display + Sized,
    {
        self.as_error()
    }
}

impl<E: AsError> AsError for Traced<E> {
    fn try_as_error(&self) -> Option<Error> {
        let mut error = self.as_ref().try_as_error()?;
        error.backtrace = Some(self.trace().clone());
        Some(error)
    }
}

impl AsError for upstream::Error {
    fn try_as_error(&self) -> Option<Error> {
        if self.is_not_found() {
            return Some(RequestError::NotFound.into());
        }
        Some(Error {
            code: "UPSTREAM_ERROR",
            status_code: http::StatusCode::INTERNAL_SERVER_ERROR,
            message: Error::UPSTREAM_MESSAGE.to_owned(),
            backtrace: None,
        })
    }
}

impl AsError for mailer::Error {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "NOT_CONFIGURED"]
                #[status = INTERNAL_SERVER_ERROR]
                #[message = "Der E-Mail-Versand ist nicht eingerichtet."]
                NotConfigured,

                #[code = "MAIL_ERROR"]
                #[status = INTERNAL_SERVER_ERROR]
                #[message = "Die Nachricht konnte nicht gesendet werden. \
                             Bitte versuche es später erneut."]
                Undelivered,
            }
        }

        Some(match self {
            Self::NotConfigured => Error::NotConfigured.into(),
            Self::Resend(_) => Error::Undelivered.into(),
        })
    }
}

impl AsError for pages::Error {
    fn try_as_error(&self) -> Option<Error> {
        None
    }
}

impl AsError for JsonRejection {
    fn try_as_error(&self) -> Option<Error> {
        Some(Error::validation(self.body_text()))
    }
}

impl AsError for PathRejection {
    fn try_as_error(&self) -> Option<Error> {
        Some(RequestError::NotFound.into())
    }
}

impl AsError for QueryRejection {
    fn try_as_error(&self) -> Option<Error> {
        Some(Error::validation(self.body_text()))
    }
}

impl AsError for MultipartError {
    fn try_as_error(&self) -> Option<Error> {
        Some(Error::validation(self.body_text()))
    }
}

impl From<JsonRejection> for Error {
    fn from(e: JsonRejection) -> Self {
        e.into_error()
    }
}

impl From<PathRejection> for Error {
    fn from(e: PathRejection) -> Self {
        e.into_error()
    }
}

impl From<QueryRejection> for Error {
    fn from(e: QueryRejection) -> Self {
        e.into_error()
    }
}

impl From<MultipartError> for Error {
    fn from(e: MultipartError) -> Self {
        e.into_error()
    }
}

define_error! {
    enum RequestError {
        #[code = "NOT_FOUND"]
        #[status = NOT_FOUND]
        #[message = "Der Eintrag wurde nicht gefunden."]
        NotFound,
    }
}
