//! [`Command`] for uploading a new [`Media`].

use common::operations::{Authorize, Authorized, Insert};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{media, user::Credentials, Media},
    infra::{upstream, Upstream},
    Service,
};

use super::Command;

/// [`Command`] for uploading a new [`Media`].
#[derive(Clone, Debug)]
pub struct UploadMedia {
    /// [`Credentials`] to act with.
    pub credentials: Credentials,

    /// [`media::Upload`] to perform.
    pub upload: media::Upload,
}

impl<Up, Ml, Pg> Command<UploadMedia> for Service<Up, Ml, Pg>
where
    Up: Upstream<Authorize<Credentials>, Err = Traced<upstream::Error>>,
    Authorized<Up, Credentials>: Upstream<
        Insert<media::Upload>,
        Ok = Media,
        Err = Traced<upstream::Error>,
    >,
{
    type Ok = Media;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: UploadMedia) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UploadMedia {
            credentials,
            upload,
        } = cmd;
        if upload.bytes.is_empty() {
            return Err(tracerr::new!(E::EmptyFile));
        }
        let (file_name, size) = (upload.file_name.clone(), upload.bytes.len());

        let media = self
            .authorized_upstream(credentials)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .execute(Insert(upload))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tracing::info!(%file_name, size, id = %media.id, "media uploaded");

        Ok(media)
    }
}

/// Error of [`UploadMedia`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// Uploaded file has no contents.
    #[display("Uploaded file is empty")]
    EmptyFile,

    /// [`Upstream`] error.
    #[display("`Upstream` operation failed: {_0}")]
    Upstream(upstream::Error),
}

#[cfg(test)]
mod spec {
    use crate::{
        command::spec::{credentials, service, Call, Fake},
        domain::media::{FileName, Upload},
    };

    use super::{Command as _, ExecutionError, UploadMedia};

    fn upload(bytes: Vec<u8>) -> UploadMedia {
        UploadMedia {
            credentials: credentials(),
            upload: Upload {
                file_name: FileName::sanitize("regie.jpg").unwrap(),
                mime_type: "image/jpeg".to_owned(),
                bytes,
                title: Some("Regie".to_owned()),
                alt_text: None,
            },
        }
    }

    #[tokio::test]
    async fn uploads_file() {
        let fake = Fake::default();

        let media = service(fake.clone())
            .execute(upload(vec![0xFF, 0xD8, 0xFF]))
            .await
            .unwrap();

        assert_eq!(media.title.rendered, "Regie");
        assert!(media.source_url.ends_with("/regie.jpg"));
        assert_eq!(fake.calls(), [Call::Insert]);
    }

    #[tokio::test]
    async fn refuses_empty_file() {
        let fake = Fake::default();

        let err = service(fake.clone())
            .execute(upload(vec![]))
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::EmptyFile));
        assert!(fake.calls().is_empty());
    }
}
