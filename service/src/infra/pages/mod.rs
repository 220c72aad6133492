//! [`Pages`]-related implementations.

#[cfg(feature = "http")]
pub mod frontend;

use derive_more::{Display, Error as StdError, From};

#[cfg(feature = "http")]
pub use self::frontend::Frontend;

/// Statically rendered pages cache.
pub use common::Handler as Pages;

/// [`Pages`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    #[cfg(feature = "http")]
    /// [`Frontend`] error.
    Frontend(frontend::Error),
}
