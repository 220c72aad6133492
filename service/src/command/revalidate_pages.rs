//! [`Command`] for revalidating statically rendered pages.

use common::{operations::Invalidate, DateTime};
use derive_more::{Display, Error, From};
use secrecy::ExposeSecret as _;
use tracerr::Traced;

use crate::{
    domain::page,
    infra::{pages, Pages},
    Service,
};

use super::Command;

/// [`Command`] for revalidating statically rendered pages, requested by the
/// CMS webhook.
///
/// The most specific target wins: a path over a tag over a post type.
#[derive(Clone, Debug, Default)]
pub struct RevalidatePages {
    /// Shared secret provided by the caller.
    pub secret: Option<String>,

    /// Path of a single page to revalidate.
    pub path: Option<String>,

    /// Cache tag of the pages to revalidate.
    pub tag: Option<String>,

    /// Upstream post type whose pages should be revalidated.
    pub post_type: Option<String>,
}

/// Output of [`RevalidatePages`] [`Command`].
#[derive(Clone, Debug)]
pub struct Output {
    /// Revalidated [`page::Target`]s.
    pub targets: Vec<page::Target>,

    /// [`DateTime`] of the revalidation.
    pub revalidated_at: DateTime,
}

impl<Up, Ml, Pg> Command<RevalidatePages> for Service<Up, Ml, Pg>
where
    Pg: Pages<Invalidate<page::Target>, Ok = (), Err = Traced<pages::Error>>,
{
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: RevalidatePages,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RevalidatePages {
            secret,
            path,
            tag,
            post_type,
        } = cmd;

        let expected = self
            .config()
            .revalidation_secret
            .as_ref()
            .ok_or_else(|| tracerr::new!(E::NotConfigured))?;
        if !secret.is_some_and(|s| expected.expose_secret().matches(&s)) {
            return Err(tracerr::new!(E::InvalidSecret));
        }

        let non_empty = |s: Option<String>| s.filter(|s| !s.trim().is_empty());
        let targets = if let Some(path) = non_empty(path) {
            vec![page::Target::Path(
                page::Path::new(path)
                    .ok_or_else(|| tracerr::new!(E::InvalidPath))?,
            )]
        } else if let Some(tag) = non_empty(tag) {
            vec![page::Target::Tag(
                page::Tag::new(tag)
                    .ok_or_else(|| tracerr::new!(E::InvalidTag))?,
            )]
        } else if let Some(post_type) = non_empty(post_type) {
            page::paths_of(&post_type)
                .into_iter()
                .map(page::Target::Path)
                .collect()
        } else {
            return Err(tracerr::new!(E::NoTarget));
        };

        for target in &targets {
            self.pages()
                .execute(Invalidate(target.clone()))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
        }

        Ok(Output {
            targets,
            revalidated_at: DateTime::now(),
        })
    }
}

/// Error of [`RevalidatePages`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// No [`page::Secret`] is configured, so no request can be authorized.
    #[display("Revalidation secret is not configured")]
    NotConfigured,

    /// Provided secret doesn't match the configured [`page::Secret`].
    #[display("Invalid revalidation secret")]
    InvalidSecret,

    /// Provided path is not a valid [`page::Path`].
    #[display("Invalid page path")]
    InvalidPath,

    /// Provided tag is not a valid [`page::Tag`].
    #[display("Invalid cache tag")]
    InvalidTag,

    /// Neither a path, a tag nor a post type is provided.
    #[display("Nothing to revalidate")]
    NoTarget,

    /// [`Pages`] error.
    #[display("`Pages` operation failed: {_0}")]
    Pages(pages::Error),
}

#[cfg(test)]
mod spec {
    use crate::command::spec::{service, Fake};

    use super::{Command as _, ExecutionError, RevalidatePages};

    fn request() -> RevalidatePages {
        RevalidatePages {
            secret: Some("hook".to_owned()),
            ..RevalidatePages::default()
        }
    }

    #[tokio::test]
    async fn revalidates_pages_of_post_type() {
        let service = service(Fake::default());

        let out = service
            .execute(RevalidatePages {
                post_type: Some("equipment".to_owned()),
                ..request()
            })
            .await
            .unwrap();

        let invalidated = service
            .pages()
            .invalidated
            .lock()
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>();
        assert_eq!(invalidated, ["path `/equipment-verleih`", "path `/`"]);
        assert_eq!(out.targets.len(), 2);
    }

    #[tokio::test]
    async fn prefers_path_over_tag_and_post_type() {
        let service = service(Fake::default());

        let out = service
            .execute(RevalidatePages {
                path: Some("/blog/neues-mikrofon".to_owned()),
                tag: Some("posts".to_owned()),
                post_type: Some("post".to_owned()),
                ..request()
            })
            .await
            .unwrap();

        assert_eq!(out.targets.len(), 1);
        assert_eq!(out.targets[0].to_string(), "path `/blog/neues-mikrofon`");
    }

    #[tokio::test]
    async fn refuses_wrong_or_missing_secret() {
        let mut service = service(Fake::default());

        let err = service
            .execute(RevalidatePages {
                secret: Some("nope".to_owned()),
                tag: Some("posts".to_owned()),
                ..RevalidatePages::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::InvalidSecret));

        service.config.revalidation_secret = None;
        let err = service
            .execute(RevalidatePages {
                tag: Some("posts".to_owned()),
                ..request()
            })
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::NotConfigured));
        assert!(service.pages().invalidated.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn requires_target() {
        let err = service(Fake::default())
            .execute(request())
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::NoTarget));
    }
}
