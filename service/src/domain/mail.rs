//! Transactional [`Email`] definitions.

use std::fmt::Write as _;

use derive_more::{AsRef, Display};

use crate::domain::user;

/// Message submitted through the public contact form.
#[derive(Clone, Debug)]
pub struct ContactMessage {
    /// [`Name`] of the sender.
    pub name: Name,

    /// [`user::Email`] of the sender, used as the reply address.
    pub email: user::Email,

    /// [`Phone`] of the sender, if provided.
    pub phone: Option<Phone>,

    /// [`Subject`] of the message, if provided.
    pub subject: Option<Subject>,

    /// Text of the message.
    pub message: Message,
}

impl ContactMessage {
    /// Renders this [`ContactMessage`] into an [`Email`] for the studio.
    #[must_use]
    pub fn to_email(&self) -> Email {
        let subject = format!(
            "Neue Kontaktanfrage: {}",
            self.subject.as_ref().map_or(self.name.as_ref(), AsRef::as_ref),
        );

        let mut rows = vec![
            ("Name", self.name.as_ref()),
            ("E-Mail", self.email.as_ref()),
        ];
        if let Some(phone) = &self.phone {
            rows.push(("Telefon", phone.as_ref()));
        }
        if let Some(subject) = &self.subject {
            rows.push(("Betreff", subject.as_ref()));
        }

        let mut html = String::from("<h2>Neue Kontaktanfrage</h2><table>");
        let mut text = String::new();
        for (label, value) in &rows {
            _ = write!(
                html,
                "<tr><th align=\"left\">{label}</th><td>{}</td></tr>",
                escape(value),
            );
            _ = writeln!(text, "{label}: {value}");
        }
        _ = write!(
            html,
            "</table><p>{}</p>",
            escape(self.message.as_ref()).replace('\n', "<br>"),
        );
        _ = write!(text, "\n{}", self.message);

        Email {
            subject,
            html,
            text,
            reply_to: Some(self.email.clone()),
        }
    }
}

/// Opt-in to the studio newsletter.
#[derive(Clone, Debug)]
pub struct NewsletterSignup {
    /// [`user::Email`] to subscribe.
    pub email: user::Email,

    /// [`Name`] of the subscriber, if provided.
    pub name: Option<Name>,
}

impl NewsletterSignup {
    /// Renders this [`NewsletterSignup`] into an [`Email`] for the studio.
    #[must_use]
    pub fn to_email(&self) -> Email {
        let who = self.name.as_ref().map_or_else(
            || self.email.to_string(),
            |name| format!("{name} <{}>", self.email),
        );

        Email {
            subject: "Neue Newsletter-Anmeldung".to_owned(),
            html: format!(
                "<h2>Neue Newsletter-Anmeldung</h2>\
                 <p>{} möchte den Newsletter erhalten.</p>",
                escape(&who),
            ),
            text: format!("{who} möchte den Newsletter erhalten."),
            reply_to: Some(self.email.clone()),
        }
    }
}

/// Rendered transactional email.
///
/// Sender and recipient are fixed by the delivering infrastructure.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Email {
    /// Subject line.
    pub subject: String,

    /// HTML body.
    pub html: String,

    /// Plain text body.
    pub text: String,

    /// Address replies should go to.
    pub reply_to: Option<user::Email>,
}

/// Name of a person contacting the studio.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str)]
pub struct Name(String);

impl Name {
    /// Creates a new [`Name`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl AsRef<str>) -> Option<Self> {
        let name = name.as_ref().trim();
        (!name.is_empty() && name.chars().count() <= 200)
            .then(|| Self(name.to_owned()))
    }
}

/// Phone number provided through the contact form.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str)]
pub struct Phone(String);

impl Phone {
    /// Creates a new [`Phone`] if the given `number` is valid.
    ///
    /// Digits, spaces and the usual `+-/()` separators are accepted.
    #[must_use]
    pub fn new(number: impl AsRef<str>) -> Option<Self> {
        let number = number.as_ref().trim();
        (number.chars().filter(char::is_ascii_digit).count() >= 4
            && number.len() <= 50
            && number.chars().all(|c| {
                c.is_ascii_digit()
                    || matches!(c, ' ' | '+' | '-' | '/' | '(' | ')')
            }))
        .then(|| Self(number.to_owned()))
    }
}

/// Subject of a [`ContactMessage`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str)]
pub struct Subject(String);

impl Subject {
    /// Creates a new [`Subject`] if the given `subject` is valid.
    #[must_use]
    pub fn new(subject: impl AsRef<str>) -> Option<Self> {
        let subject = subject.as_ref().trim();
        (!subject.is_empty() && subject.chars().count() <= 200)
            .then(|| Self(subject.to_owned()))
    }
}

/// Text of a [`ContactMessage`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str)]
pub struct Message(String);

impl Message {
    /// Minimal amount of characters in a [`Message`].
    pub const MIN_LENGTH: usize = 10;

    /// Maximal amount of characters in a [`Message`].
    pub const MAX_LENGTH: usize = 5000;

    /// Creates a new [`Message`] if the given `text` is valid.
    #[must_use]
    pub fn new(text: impl AsRef<str>) -> Option<Self> {
        let text = text.as_ref().trim();
        (Self::MIN_LENGTH..=Self::MAX_LENGTH)
            .contains(&text.chars().count())
            .then(|| Self(text.to_owned()))
    }
}

/// Escapes the provided `text` for embedding into HTML.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
