//! [`Mailer`]-related implementations.

#[cfg(feature = "http")]
pub mod resend;

use derive_more::{Display, Error as StdError, From};

#[cfg(feature = "http")]
pub use self::resend::Resend;

/// Transactional email delivery.
pub use common::Handler as Mailer;

/// [`Mailer`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// [`Mailer`] has no credentials to deliver with.
    #[display("`Mailer` is not configured")]
    NotConfigured,

    #[cfg(feature = "http")]
    /// [`Resend`] client error.
    Resend(resend::Error),
}
