//! Domain definitions.

pub mod app_password;
pub mod field;
pub mod mail;
pub mod media;
pub mod page;
pub mod post;
pub mod user;

pub use self::{
    app_password::AppPassword, field::Fields, media::Media, post::Post,
    user::User,
};
