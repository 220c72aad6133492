//! Rendering frontend [`Pages`] implementation.

use std::time::Duration;

use common::operations::Invalidate;
use derive_more::{Display, Error as StdError, From};
use serde_json::json;
use smart_default::SmartDefault;
use tracerr::Traced;

#[cfg(doc)]
use crate::infra::Pages;
use crate::{domain::page, infra::pages};

/// [`Frontend`] configuration.
#[derive(Clone, Debug, SmartDefault)]
pub struct Config {
    /// URL of the frontend hook accepting invalidations.
    ///
    /// Invalidations are only logged without it.
    pub hook_url: Option<String>,

    /// Timeout of a single request.
    #[default(Duration::from_secs(10))]
    pub timeout: Duration,
}

/// Frontend rendering the public pages, notified about their invalidation.
#[derive(Clone, Debug)]
pub struct Frontend {
    /// Underlying HTTP client.
    client: reqwest::Client,

    /// URL of the frontend hook, if any.
    hook_url: Option<String>,
}

impl Frontend {
    /// Creates a new [`Frontend`] with the provided [`Config`].
    ///
    /// # Errors
    ///
    /// If failed to initialize the underlying HTTP client.
    pub fn new(config: Config) -> Result<Self, Traced<pages::Error>> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?;
        Ok(Self {
            client,
            hook_url: config.hook_url.filter(|u| !u.trim().is_empty()),
        })
    }
}

impl pages::Pages<Invalidate<page::Target>> for Frontend {
    type Ok = ();
    type Err = Traced<pages::Error>;

    async fn execute(
        &self,
        Invalidate(target): Invalidate<page::Target>,
    ) -> Result<Self::Ok, Self::Err> {
        let Some(url) = &self.hook_url else {
            tracing::info!(%target, "pages invalidated");
            return Ok(());
        };

        let body = match &target {
            page::Target::Path(p) => json!({ "path": p.as_ref() }),
            page::Target::Tag(t) => json!({ "tag": t.as_ref() }),
        };
        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?;

        let status = response.status();
        if !status.is_success() {
            return Err(tracerr::new!(pages::Error::from(
                Error::Rejected(status.as_u16()),
            )));
        }

        tracing::info!(%target, "pages invalidated on frontend");
        Ok(())
    }
}

/// [`Frontend`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// HTTP transport error.
    #[display("HTTP request to frontend failed: {_0}")]
    Http(reqwest::Error),

    /// Frontend hook answered with an error status.
    #[display("Frontend rejected the invalidation with `{_0}`")]
    #[from(ignore)]
    Rejected(#[error(not(source))] u16),
}
