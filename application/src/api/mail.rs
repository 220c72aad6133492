//! Public form endpoints relaying emails to the studio.

use axum::Extension;
use serde::Deserialize;
use service::{
    command::{self, Command as _},
    domain::{
        mail::{self, ContactMessage, NewsletterSignup},
        user,
    },
};

use crate::{
    api::{Done, Json},
    define_error, AsError, Error, Service,
};

/// Contact form.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ContactInput {
    /// Name of the sender.
    pub name: String,

    /// Email of the sender.
    pub email: String,

    /// Phone of the sender.
    pub phone: Option<String>,

    /// Subject of the message.
    pub subject: Option<String>,

    /// Text of the message.
    pub message: String,
}

impl ContactInput {
    /// Validates this [`ContactInput`] into a [`ContactMessage`].
    ///
    /// # Errors
    ///
    /// With the first violated rule.
    fn validate(self) -> Result<ContactMessage, FormError> {
        let name =
            mail::Name::new(&self.name).ok_or(FormError::NameRequired)?;
        let email = user::Email::new(self.email.trim())
            .ok_or(FormError::InvalidEmail)?;
        let phone = non_blank(self.phone)
            .map(|p| mail::Phone::new(p).ok_or(FormError::InvalidPhone))
            .transpose()?;
        let subject = non_blank(self.subject).and_then(mail::Subject::new);
        let message = mail::Message::new(&self.message)
            .ok_or(FormError::MessageLength)?;

        Ok(ContactMessage {
            name,
            email,
            phone,
            subject,
            message,
        })
    }
}

/// Newsletter opt-in form.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct NewsletterInput {
    /// Email to subscribe.
    pub email: String,

    /// Name of the subscriber.
    pub name: Option<String>,
}

impl NewsletterInput {
    /// Validates this [`NewsletterInput`] into a [`NewsletterSignup`].
    ///
    /// # Errors
    ///
    /// With the first violated rule.
    fn validate(self) -> Result<NewsletterSignup, FormError> {
        Ok(NewsletterSignup {
            email: user::Email::new(self.email.trim())
                .ok_or(FormError::InvalidEmail)?,
            name: non_blank(self.name).and_then(mail::Name::new),
        })
    }
}

/// Filters out a blank optional form value.
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Relays a contact form submission to the studio.
///
/// # Errors
///
/// If the form is invalid, or the email can't be delivered.
#[tracing::instrument(name = "mail.contact", skip_all)]
pub async fn contact(
    Extension(service): Extension<Service>,
    Json(input): Json<ContactInput>,
) -> Result<Json<Done>, Error> {
    let msg = input.validate()?;

    service
        .execute(command::SendContactMessage(msg))
        .await
        .map(|()| Done::OK)
        .map_err(AsError::into_error)
}

/// Relays a newsletter opt-in to the studio.
///
/// # Errors
///
/// If the form is invalid, or the email can't be delivered.
#[tracing::instrument(name = "mail.newsletter", skip_all)]
pub async fn newsletter(
    Extension(service): Extension<Service>,
    Json(input): Json<NewsletterInput>,
) -> Result<Json<Done>, Error> {
    let signup = input.validate()?;

    service
        .execute(command::SubscribeNewsletter(signup))
        .await
        .map(|()| Done::OK)
        .map_err(AsError::into_error)
}

impl AsError for command::send_contact_message::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Mailer(e) => e.try_as_error(),
        }
    }
}

impl AsError for command::subscribe_newsletter::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Mailer(e) => e.try_as_error(),
        }
    }
}

define_error! {
    enum FormError {
        #[code = "VALIDATION_ERROR"]
        #[status = BAD_REQUEST]
        #[message = "Name ist erforderlich."]
        NameRequired,

        #[code = "VALIDATION_ERROR"]
        #[status = BAD_REQUEST]
        #[message = "Bitte gib eine gültige E-Mail-Adresse an."]
        InvalidEmail,

        #[code = "VALIDATION_ERROR"]
        #[status = BAD_REQUEST]
        #[message = "Bitte gib eine gültige Telefonnummer an."]
        InvalidPhone,

        #[code = "VALIDATION_ERROR"]
        #[status = BAD_REQUEST]
        #[message = "Die Nachricht muss mindestens 10 Zeichen lang sein."]
        MessageLength,
    }
}
