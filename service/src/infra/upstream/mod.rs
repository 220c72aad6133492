//! [`Upstream`]-related implementations.

#[cfg(feature = "http")]
pub mod wordpress;

use derive_more::{Display, Error as StdError, From};
use serde::Deserialize;

#[cfg(feature = "http")]
pub use self::wordpress::WordPress;

/// Upstream content management system operation.
pub use common::Handler as Upstream;

/// [`Upstream`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// [`Upstream`] answered with an error response.
    #[display("`Upstream` rejected the request: {_0}")]
    Rejected(Rejection),

    #[cfg(feature = "http")]
    /// [`WordPress`] client error.
    WordPress(wordpress::Error),
}

impl Error {
    /// Returns the [`Rejection`] of this [`Error`], if it's the one.
    #[must_use]
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Self::Rejected(r) => Some(r),
            #[cfg(feature = "http")]
            Self::WordPress(_) => None,
        }
    }

    /// Indicates whether this [`Error`] means the requested entity doesn't
    /// exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.rejection().is_some_and(Rejection::is_not_found)
    }
}

/// Error response of an [`Upstream`].
#[derive(Clone, Debug, Deserialize, Display, Eq, PartialEq, StdError)]
#[display("[{status}] {message}")]
pub struct Rejection {
    /// HTTP status code of the response.
    #[serde(skip)]
    pub status: u16,

    /// Machine-readable error code, if any.
    #[serde(default)]
    pub code: Option<String>,

    /// Human-readable error message.
    #[serde(default)]
    pub message: String,
}

impl Rejection {
    /// Error codes meaning plainly wrong credentials.
    const WRONG_CREDENTIALS_CODES: &'static [&'static str] = &[
        "incorrect_password",
        "invalid_username",
        "invalid_email",
        "invalid_application_password",
        "rest_not_logged_in",
    ];

    /// Indicates whether this [`Rejection`] signals that the upstream
    /// security policy requires an application password instead of a primary
    /// one.
    #[must_use]
    pub fn requires_application_password(&self) -> bool {
        let code = self.code.as_deref().unwrap_or_default();
        if Self::WRONG_CREDENTIALS_CODES.contains(&code) {
            return false;
        }
        let message = self.message.to_lowercase();
        code.contains("application_password")
            || (message.contains("application password")
                && message.contains("required"))
            || message.contains("anwendungspasswort")
    }

    /// Indicates whether this [`Rejection`] means the requested entity
    /// doesn't exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status == 404
            || self.code.as_deref().is_some_and(|c| c.ends_with("_invalid_id"))
    }
}

#[cfg(test)]
mod spec {
    use super::Rejection;

    fn rejection(code: &str, message: &str) -> Rejection {
        Rejection {
            status: 401,
            code: Some(code.to_owned()),
            message: message.to_owned(),
        }
    }

    #[test]
    fn detects_application_password_policy() {
        assert!(rejection(
            "application_passwords_required",
            "Please use an application password.",
        )
        .requires_application_password());
        assert!(rejection(
            "rest_forbidden",
            "An application password is required to log in via REST.",
        )
        .requires_application_password());

        assert!(!rejection("incorrect_password", "Wrong password.")
            .requires_application_password());
        assert!(!rejection(
            "invalid_application_password",
            "The provided application password is invalid.",
        )
        .requires_application_password());
        assert!(!rejection("invalid_username", "Unknown username.")
            .requires_application_password());
    }

    #[test]
    fn detects_not_found() {
        assert!(Rejection {
            status: 404,
            code: None,
            message: String::new(),
        }
        .is_not_found());
        assert!(Rejection {
            status: 400,
            code: Some("rest_post_invalid_id".to_owned()),
            message: String::new(),
        }
        .is_not_found());
        assert!(!rejection("incorrect_password", "").is_not_found());
    }
}
