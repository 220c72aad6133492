//! Infrastructure layer.

pub mod mailer;
pub mod pages;
pub mod upstream;

#[cfg(feature = "http")]
pub use self::{mailer::Resend, pages::Frontend, upstream::WordPress};
pub use self::{mailer::Mailer, pages::Pages, upstream::Upstream};
