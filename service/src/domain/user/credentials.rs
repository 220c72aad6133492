//! [`Credentials`] definitions.

use std::fmt;

use secrecy::{ExposeSecret as _, SecretBox};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

#[cfg(doc)]
use crate::domain::User;

use super::{Login, Password};

/// Credential pair acting as a [`User`] against the upstream API.
///
/// Serialized as a single `login:password` string, the same form the upstream
/// HTTP Basic authentication expects.
#[derive(Clone)]
pub struct Credentials {
    /// [`Login`] of the [`User`].
    pub login: Login,

    /// [`Password`] of the [`User`].
    pub password: SecretBox<Password>,
}

impl Credentials {
    /// Creates new [`Credentials`] out of the provided halves.
    #[must_use]
    pub fn new(login: Login, password: Password) -> Self {
        Self {
            login,
            password: SecretBox::init_with(move || password),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("login", &self.login)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl PartialEq for Credentials {
    fn eq(&self, other: &Self) -> bool {
        self.login == other.login
            && self.password.expose_secret() == other.password.expose_secret()
    }
}

impl Serialize for Credentials {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&format_args!(
            "{}:{}",
            self.login,
            self.password.expose_secret(),
        ))
    }
}

impl<'de> Deserialize<'de> for Credentials {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        let (login, password) = raw
            .split_once(':')
            .ok_or_else(|| de::Error::custom("missing `:` separator"))?;
        let login = Login::new(login)
            .ok_or_else(|| de::Error::custom("invalid `Login`"))?;
        let password = Password::new(password)
            .ok_or_else(|| de::Error::custom("invalid `Password`"))?;
        Ok(Self::new(login, password))
    }
}
