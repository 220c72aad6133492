//! In-memory doubles of the [`Service`] infrastructure.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use common::{
    operations::{
        Authorize, By, Deliver, Delete, Insert, Invalidate, Select, Update,
    },
    pagination::{self, Page},
    Handler,
};
use tracerr::Traced;
use uuid::Uuid;

use crate::{
    domain::{
        app_password::{self, Issued},
        field::Fields,
        mail::Email,
        media, page, post,
        user::{self, Credentials},
        AppPassword, Media, Post, User,
    },
    infra::{mailer, pages, upstream},
    Config, Service,
};

/// Call recorded by the [`Fake`] upstream.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Call {
    Me,
    Read,
    List,
    Insert,
    Update,
    FieldsEndpoint,
    Delete,
}

/// Behaviour and contents of the [`Fake`] upstream.
#[derive(Debug, Default)]
pub(crate) struct State {
    pub(crate) posts: HashMap<post::Id, Post>,
    pub(crate) calls: Vec<Call>,
    pub(crate) rejection: Option<upstream::Rejection>,
    pub(crate) inline_acf: bool,
    pub(crate) fail_reads: bool,
    pub(crate) fail_updates: bool,
    pub(crate) fail_fields_endpoint: bool,
    pub(crate) fail_reads_after_fields_endpoint: bool,
}

/// In-memory upstream.
///
/// Drops custom fields written inline unless told otherwise, the way the
/// real one does for some post types.
#[derive(Clone, Debug, Default)]
pub(crate) struct Fake(Arc<Mutex<State>>);

impl Fake {
    pub(crate) fn state(&self) -> MutexGuard<'_, State> {
        self.0.lock().unwrap()
    }

    pub(crate) fn store(&self, post: Post) {
        drop(self.state().posts.insert(post.id, post));
    }

    pub(crate) fn stored(&self, id: u64) -> Option<Post> {
        self.state().posts.get(&post::Id::from(id)).cloned()
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.state().calls.clone()
    }

    pub(crate) fn reject_logins(&self, code: &str, message: &str) {
        self.state().rejection = Some(upstream::Rejection {
            status: 401,
            code: Some(code.to_owned()),
            message: message.to_owned(),
        });
    }

    pub(crate) fn apply_inline_acf(&self) {
        self.state().inline_acf = true;
    }

    pub(crate) fn fail_reads(&self) {
        self.state().fail_reads = true;
    }

    pub(crate) fn fail_updates(&self) {
        self.state().fail_updates = true;
    }

    pub(crate) fn fail_fields_endpoint(&self) {
        self.state().fail_fields_endpoint = true;
    }

    pub(crate) fn fail_reads_after_fields_endpoint(&self) {
        self.state().fail_reads_after_fields_endpoint = true;
    }

    fn record(&self, call: Call) -> MutexGuard<'_, State> {
        let mut state = self.state();
        state.calls.push(call);
        state
    }

    fn write(state: &mut State, post: &mut Post, changes: post::Changes) {
        let post::Changes {
            title,
            content,
            excerpt,
            status,
            slug,
            featured_media,
            acf,
            meta,
        } = changes;
        if let Some(title) = title {
            post.title.rendered = title;
        }
        if let Some(content) = content {
            post.content.rendered = content;
        }
        if let Some(excerpt) = excerpt {
            post.excerpt.rendered = excerpt;
        }
        if let Some(status) = status {
            post.status = status;
        }
        if let Some(slug) = slug {
            post.slug = slug;
        }
        if featured_media.is_some() {
            post.featured_media = featured_media;
        }
        if state.inline_acf || !post.kind.reconciles_fields() {
            merge(&mut post.acf, acf);
        }
        merge(&mut post.meta, meta);
        drop(state.posts.insert(post.id, post.clone()));
    }
}

fn merge(into: &mut Fields, from: Fields) {
    for (k, v) in serde_json::Map::from(from) {
        into.set(k, v);
    }
}

fn rejected(status: u16, message: &str) -> Traced<upstream::Error> {
    tracerr::new!(upstream::Error::Rejected(upstream::Rejection {
        status,
        code: None,
        message: message.to_owned(),
    }))
}

/// Creates an empty [`Post`] of the provided [`post::Kind`].
pub(crate) fn post(kind: post::Kind, id: u64) -> Post {
    Post {
        id: id.into(),
        kind,
        status: post::Status::Draft,
        slug: String::new(),
        link: String::new(),
        title: post::Rendered::default(),
        content: post::Rendered::default(),
        excerpt: post::Rendered::default(),
        featured_media: None,
        published_at: None,
        modified_at: None,
        acf: Fields::default(),
        meta: Fields::default(),
    }
}

pub(crate) fn credentials() -> Credentials {
    Credentials::new(
        user::Login::new("admin").unwrap(),
        user::Password::new("abcd efgh ijkl mnop").unwrap(),
    )
}

pub(crate) fn config() -> Config {
    Config {
        jwt_encoding_key: jsonwebtoken::EncodingKey::from_secret(b"secret"),
        jwt_decoding_key: jsonwebtoken::DecodingKey::from_secret(b"secret"),
        session_ttl: Duration::from_secs(7 * 24 * 60 * 60),
        revalidation_secret: page::Secret::new("hook")
            .map(|s| secrecy::SecretBox::init_with(move || s)),
    }
}

pub(crate) fn service<Up>(upstream: Up) -> Service<Up, Mailbox, Cache> {
    Service::new(config(), upstream, Mailbox::default(), Cache::default())
}

impl Handler<Authorize<Credentials>> for Fake {
    type Ok = Self;
    type Err = Traced<upstream::Error>;

    async fn execute(
        &self,
        _: Authorize<Credentials>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.clone())
    }
}

impl Handler<Select<By<User, user::Current>>> for Fake {
    type Ok = User;
    type Err = Traced<upstream::Error>;

    async fn execute(
        &self,
        _: Select<By<User, user::Current>>,
    ) -> Result<Self::Ok, Self::Err> {
        let state = self.record(Call::Me);
        if let Some(rejection) = state.rejection.clone() {
            return Err(tracerr::new!(upstream::Error::Rejected(rejection)));
        }
        Ok(User {
            id: 1.into(),
            name: user::Name::new("Admin").unwrap(),
            email: user::Email::new("admin@example.com"),
        })
    }
}

impl Handler<Select<By<Option<Post>, post::Key>>> for Fake {
    type Ok = Option<Post>;
    type Err = Traced<upstream::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Post>, post::Key>>,
    ) -> Result<Self::Ok, Self::Err> {
        let state = self.record(Call::Read);
        if state.fail_reads {
            return Err(rejected(500, "read failed"));
        }
        let key = by.into_inner();
        Ok(state.posts.get(&key.id).filter(|p| p.kind == key.kind).cloned())
    }
}

impl Handler<Select<By<Page<Post>, post::Selector>>> for Fake {
    type Ok = Page<Post>;
    type Err = Traced<upstream::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Page<Post>, post::Selector>>,
    ) -> Result<Self::Ok, Self::Err> {
        let state = self.record(Call::List);
        let selector = by.into_inner();
        let items = state
            .posts
            .values()
            .filter(|p| p.kind == selector.kind)
            .cloned()
            .collect::<Vec<_>>();
        Ok(Page {
            total: items.len() as u64,
            total_pages: 1,
            items,
            page: selector.page.page,
            per_page: selector.page.per_page,
        })
    }
}

impl Handler<Insert<post::Draft>> for Fake {
    type Ok = Post;
    type Err = Traced<upstream::Error>;

    async fn execute(
        &self,
        Insert(draft): Insert<post::Draft>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut state = self.record(Call::Insert);
        let id = state.posts.len() as u64 + 100;
        let mut created = post(draft.kind, id);
        Self::write(&mut state, &mut created, draft.changes);
        Ok(created)
    }
}

impl Handler<Update<post::Edit>> for Fake {
    type Ok = Post;
    type Err = Traced<upstream::Error>;

    async fn execute(
        &self,
        Update(edit): Update<post::Edit>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut state = self.record(Call::Update);
        if state.fail_updates {
            return Err(rejected(500, "update failed"));
        }
        let Some(mut existing) = state.posts.get(&edit.key.id).cloned() else {
            return Err(rejected(404, "Ungültige Beitrags-ID."));
        };
        Self::write(&mut state, &mut existing, edit.changes);
        Ok(existing)
    }
}

impl Handler<Update<post::FieldsEdit>> for Fake {
    type Ok = ();
    type Err = Traced<upstream::Error>;

    async fn execute(
        &self,
        Update(edit): Update<post::FieldsEdit>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut state = self.record(Call::FieldsEndpoint);
        if state.fail_fields_endpoint {
            return Err(rejected(404, "No route was found"));
        }
        let existing = state
            .posts
            .get_mut(&edit.key.id)
            .ok_or_else(|| rejected(404, "not found"))?;
        merge(&mut existing.acf, edit.fields);
        if state.fail_reads_after_fields_endpoint {
            state.fail_reads = true;
        }
        Ok(())
    }
}

impl Handler<Delete<post::Removal>> for Fake {
    type Ok = ();
    type Err = Traced<upstream::Error>;

    async fn execute(
        &self,
        Delete(removal): Delete<post::Removal>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut state = self.record(Call::Delete);
        let id = removal.key.id;
        if removal.force {
            _ = state.posts.remove(&id).ok_or_else(|| rejected(404, "gone"))?;
        } else {
            state
                .posts
                .get_mut(&id)
                .ok_or_else(|| rejected(404, "gone"))?
                .status = post::Status::Trash;
        }
        Ok(())
    }
}

impl Handler<Select<By<Page<Media>, pagination::Arguments>>> for Fake {
    type Ok = Page<Media>;
    type Err = Traced<upstream::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Page<Media>, pagination::Arguments>>,
    ) -> Result<Self::Ok, Self::Err> {
        drop(self.record(Call::List));
        let args = by.into_inner();
        Ok(Page {
            items: vec![],
            page: args.page,
            per_page: args.per_page,
            total: 0,
            total_pages: 0,
        })
    }
}

impl Handler<Insert<media::Upload>> for Fake {
    type Ok = Media;
    type Err = Traced<upstream::Error>;

    async fn execute(
        &self,
        Insert(upload): Insert<media::Upload>,
    ) -> Result<Self::Ok, Self::Err> {
        drop(self.record(Call::Insert));
        Ok(Media {
            id: 7.into(),
            title: post::Rendered {
                rendered: upload.title.unwrap_or_default(),
                raw: None,
            },
            alt_text: upload.alt_text.unwrap_or_default(),
            source_url: format!("https://cms.example.com/{}", upload.file_name),
            mime_type: upload.mime_type,
            media_type: "image".to_owned(),
        })
    }
}

impl Handler<Delete<media::Id>> for Fake {
    type Ok = ();
    type Err = Traced<upstream::Error>;

    async fn execute(
        &self,
        _: Delete<media::Id>,
    ) -> Result<Self::Ok, Self::Err> {
        drop(self.record(Call::Delete));
        Ok(())
    }
}

impl Handler<Select<By<Vec<AppPassword>, user::Current>>> for Fake {
    type Ok = Vec<AppPassword>;
    type Err = Traced<upstream::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<AppPassword>, user::Current>>,
    ) -> Result<Self::Ok, Self::Err> {
        drop(self.record(Call::List));
        Ok(vec![])
    }
}

impl Handler<Insert<app_password::Name>> for Fake {
    type Ok = Issued;
    type Err = Traced<upstream::Error>;

    async fn execute(
        &self,
        Insert(name): Insert<app_password::Name>,
    ) -> Result<Self::Ok, Self::Err> {
        drop(self.record(Call::Insert));
        Ok(Issued {
            app_password: AppPassword {
                uuid: Uuid::nil(),
                name,
                created: common::DateTime::now().coerce(),
                last_used: None,
                last_ip: None,
            },
            password: "abcd efgh ijkl mnop qrst uvwx".to_owned(),
        })
    }
}

impl Handler<Delete<By<AppPassword, Uuid>>> for Fake {
    type Ok = ();
    type Err = Traced<upstream::Error>;

    async fn execute(
        &self,
        _: Delete<By<AppPassword, Uuid>>,
    ) -> Result<Self::Ok, Self::Err> {
        drop(self.record(Call::Delete));
        Ok(())
    }
}

/// In-memory mailer collecting the delivered [`Email`]s.
#[derive(Clone, Debug, Default)]
pub(crate) struct Mailbox {
    pub(crate) delivered: Arc<Mutex<Vec<Email>>>,
    pub(crate) unconfigured: bool,
}

impl Handler<Deliver<Email>> for Mailbox {
    type Ok = ();
    type Err = Traced<mailer::Error>;

    async fn execute(
        &self,
        Deliver(email): Deliver<Email>,
    ) -> Result<Self::Ok, Self::Err> {
        if self.unconfigured {
            return Err(tracerr::new!(mailer::Error::NotConfigured));
        }
        self.delivered.lock().unwrap().push(email);
        Ok(())
    }
}

/// In-memory pages cache collecting the invalidated [`page::Target`]s.
#[derive(Clone, Debug, Default)]
pub(crate) struct Cache {
    pub(crate) invalidated: Arc<Mutex<Vec<page::Target>>>,
}

impl Handler<Invalidate<page::Target>> for Cache {
    type Ok = ();
    type Err = Traced<pages::Error>;

    async fn execute(
        &self,
        Invalidate(target): Invalidate<page::Target>,
    ) -> Result<Self::Ok, Self::Err> {
        self.invalidated.lock().unwrap().push(target);
        Ok(())
    }
}
