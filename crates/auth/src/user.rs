//! Authenticated user identity.

use serde::{Deserialize, Serialize};

use authstatus_core::{DomainError, DomainResult};

use crate::{Metadata, Role};

/// Who is authenticated: the identity facts the authentication subsystem
/// resolved for a request.
///
/// # Invariants
/// - `username` is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UserDocument")]
pub struct User {
    username: String,
    roles: Vec<Role>,
    full_name: Option<String>,
    email: Option<String>,
    metadata: Metadata,
    enabled: bool,
}

impl User {
    /// Create an enabled user with no full name, email or metadata.
    pub fn new(username: impl Into<String>, roles: Vec<Role>) -> DomainResult<Self> {
        let username = username.into();
        if username.is_empty() {
            return Err(DomainError::validation("username must not be empty"));
        }

        Ok(Self {
            username,
            roles,
            full_name: None,
            email: None,
            metadata: Metadata::new(),
            enabled: true,
        })
    }

    pub fn with_full_name(mut self, full_name: Option<String>) -> Self {
        self.full_name = full_name;
        self
    }

    pub fn with_email(mut self, email: Option<String>) -> Self {
        self.email = email;
        self
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    pub fn full_name(&self) -> Option<&str> {
        self.full_name.as_deref()
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }
}

#[derive(Deserialize)]
struct UserDocument {
    username: String,
    #[serde(default)]
    roles: Vec<Role>,
    #[serde(default)]
    full_name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    metadata: Metadata,
    #[serde(default = "enabled_by_default")]
    enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

impl TryFrom<UserDocument> for User {
    type Error = DomainError;

    fn try_from(doc: UserDocument) -> Result<Self, Self::Error> {
        Ok(User::new(doc.username, doc.roles)?
            .with_full_name(doc.full_name)
            .with_email(doc.email)
            .with_metadata(doc.metadata)
            .with_enabled(doc.enabled))
    }
}
