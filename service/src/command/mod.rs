//! [`Command`] definition.

pub mod authorize_user_session;
pub mod create_app_password;
pub mod create_post;
pub mod create_user_session;
pub mod delete_media;
pub mod delete_post;
mod reconcile;
pub mod revalidate_pages;
pub mod revoke_app_password;
pub mod send_contact_message;
pub mod subscribe_newsletter;
pub mod update_post;
pub mod upload_media;

#[cfg(test)]
pub(crate) mod spec;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    authorize_user_session::AuthorizeUserSession,
    create_app_password::CreateAppPassword, create_post::CreatePost,
    create_user_session::CreateUserSession, delete_media::DeleteMedia,
    delete_post::DeletePost, revalidate_pages::RevalidatePages,
    revoke_app_password::RevokeAppPassword,
    send_contact_message::SendContactMessage,
    subscribe_newsletter::SubscribeNewsletter, update_post::UpdatePost,
    upload_media::UploadMedia,
};
