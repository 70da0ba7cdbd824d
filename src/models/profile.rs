//! Profile data as it moves through a provisioning task: the seed handed to
//! the automation engine, the unvalidated draft it returns, and the hashed
//! record handed to the store.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::credentials::{CredentialHasher, PasswordDigest, Salt};

/// Input to one automation attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileSeed {
    pub first_name: String,
    pub last_name: String,
    pub email_hint: String,
}

/// Unvalidated engine output.
///
/// `raw_password` is `None` when the engine leaves password generation to the
/// caller.
#[derive(Clone, Default)]
pub struct ProfileDraft {
    pub email: String,
    pub profile_url: String,
    pub avatar_url: String,
    pub cover_url: String,
    pub raw_password: Option<String>,
}

impl fmt::Debug for ProfileDraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProfileDraft")
            .field("email", &self.email)
            .field("profile_url", &self.profile_url)
            .field("avatar_url", &self.avatar_url)
            .field("cover_url", &self.cover_url)
            .field(
                "raw_password",
                &self.raw_password.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

/// Name of the first required field found empty while building a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissingField(pub &'static str);

impl fmt::Display for MissingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Persistence-ready profile carrying only the salted digest of its password.
///
/// Fields are private and every field is non-empty; the only way in is
/// [`ProfileRecord::from_draft`], which hashes with a fresh salt.
#[derive(Clone, PartialEq, Eq)]
pub struct ProfileRecord {
    first_name: String,
    last_name: String,
    email: String,
    profile_url: String,
    avatar_url: String,
    cover_url: String,
    password_hash: PasswordDigest,
    salt: Salt,
}

impl ProfileRecord {
    /// Validate `draft` and hash `raw_password` under a newly generated salt.
    pub fn from_draft(
        seed: &ProfileSeed,
        draft: &ProfileDraft,
        raw_password: &str,
        hasher: &CredentialHasher,
    ) -> Result<Self, MissingField> {
        let required = [
            ("first_name", seed.first_name.as_str()),
            ("last_name", seed.last_name.as_str()),
            ("email", draft.email.as_str()),
            ("profile_url", draft.profile_url.as_str()),
            ("avatar_url", draft.avatar_url.as_str()),
            ("cover_url", draft.cover_url.as_str()),
            ("password", raw_password),
        ];
        if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(MissingField(field));
        }

        let salt = hasher.generate_salt();
        let password_hash = hasher.hash(raw_password, &salt);

        Ok(Self {
            first_name: seed.first_name.clone(),
            last_name: seed.last_name.clone(),
            email: draft.email.clone(),
            profile_url: draft.profile_url.clone(),
            avatar_url: draft.avatar_url.clone(),
            cover_url: draft.cover_url.clone(),
            password_hash,
            salt,
        })
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// `first last`, as written to the store's username column
    pub fn username(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn profile_url(&self) -> &str {
        &self.profile_url
    }

    pub fn avatar_url(&self) -> &str {
        &self.avatar_url
    }

    pub fn cover_url(&self) -> &str {
        &self.cover_url
    }

    pub fn password_hash(&self) -> &PasswordDigest {
        &self.password_hash
    }

    pub fn salt(&self) -> &Salt {
        &self.salt
    }
}

impl fmt::Debug for ProfileRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProfileRecord")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("profile_url", &self.profile_url)
            .field("avatar_url", &self.avatar_url)
            .field("cover_url", &self.cover_url)
            .field("password_hash", &self.password_hash)
            .field("salt", &self.salt)
            .finish()
    }
}

/// Identifier assigned by the profile store on save
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProfileId(pub Uuid);

impl ProfileId {
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
