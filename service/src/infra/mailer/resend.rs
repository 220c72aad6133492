//! [Resend] [`Mailer`] implementation.
//!
//! [Resend]: https://resend.com/docs/api-reference/emails/send-email

use std::time::Duration;

use common::operations::Deliver;
use derive_more::{Display, Error as StdError, From};
use secrecy::{ExposeSecret as _, SecretString};
use serde::Serialize;
use smart_default::SmartDefault;
use tracerr::Traced;

#[cfg(doc)]
use crate::infra::Mailer;
use crate::{domain::mail::Email, infra::mailer};

/// [`Resend`] client configuration.
#[derive(Clone, Debug, SmartDefault)]
pub struct Config {
    /// Root URL of the [Resend] API.
    ///
    /// [Resend]: https://resend.com
    #[default("https://api.resend.com".to_owned())]
    pub url: String,

    /// API key to authenticate with.
    ///
    /// Delivery fails with [`mailer::Error::NotConfigured`] without it.
    pub api_key: Option<SecretString>,

    /// Sender address of every [`Email`].
    #[default("Studio <noreply@example.com>".to_owned())]
    pub from: String,

    /// Recipient address of every [`Email`].
    #[default("studio@example.com".to_owned())]
    pub to: String,

    /// Timeout of a single request.
    #[default(Duration::from_secs(10))]
    pub timeout: Duration,
}

/// [Resend] API client.
///
/// [Resend]: https://resend.com
#[derive(Clone, Debug)]
pub struct Resend {
    /// Underlying HTTP client.
    client: reqwest::Client,

    /// [`Config`] of this [`Resend`] client.
    config: Config,
}

impl Resend {
    /// Creates a new [`Resend`] client with the provided [`Config`].
    ///
    /// # Errors
    ///
    /// If failed to initialize the underlying HTTP client.
    pub fn new(config: Config) -> Result<Self, Traced<mailer::Error>> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?;
        Ok(Self { client, config })
    }
}

/// Request body of the [Resend] email sending endpoint.
///
/// [Resend]: https://resend.com/docs/api-reference/emails/send-email
#[derive(Debug, Serialize)]
struct Request<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<&'a str>,
}

impl mailer::Mailer<Deliver<Email>> for Resend {
    type Ok = ();
    type Err = Traced<mailer::Error>;

    async fn execute(
        &self,
        Deliver(email): Deliver<Email>,
    ) -> Result<Self::Ok, Self::Err> {
        let Some(api_key) = &self.config.api_key else {
            return Err(tracerr::new!(mailer::Error::NotConfigured));
        };

        let url =
            format!("{}/emails", self.config.url.trim_end_matches('/'));
        let response = self
            .client
            .post(url)
            .bearer_auth(api_key.expose_secret())
            .json(&Request {
                from: &self.config.from,
                to: [&self.config.to],
                subject: &email.subject,
                html: &email.html,
                text: &email.text,
                reply_to: email.reply_to.as_ref().map(AsRef::as_ref),
            })
            .send()
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(tracerr::new!(mailer::Error::from(Error::Rejected {
                status: status.as_u16(),
                body,
            })));
        }

        tracing::info!(subject = %email.subject, "email delivered");
        Ok(())
    }
}

/// [`Resend`] client error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// HTTP transport error.
    #[display("HTTP request to Resend failed: {_0}")]
    Http(reqwest::Error),

    /// [Resend] API answered with an error.
    ///
    /// [Resend]: https://resend.com
    #[display("Resend rejected the email with `{status}`: {body}")]
    #[from(ignore)]
    Rejected {
        /// HTTP status code of the response.
        status: u16,

        /// Body of the response.
        body: String,
    },
}
