//! The authentication record: who is authenticated, and how.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use authstatus_core::{DomainError, DomainResult};

use crate::{Metadata, MetadataValue, RealmRef, User};

/// Metadata key holding the id of the API key used to authenticate.
pub const API_KEY_ID_KEY: &str = "api_key_id";

/// Metadata key holding the (optional) name of the API key.
pub const API_KEY_NAME_KEY: &str = "api_key_name";

/// How a user was authenticated.
///
/// Encoded as the upper-snake name; decoded case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum AuthenticationType {
    Realm,
    ApiKey,
    Token,
    Delegated,
    Anonymous,
    Internal,
}

impl AuthenticationType {
    pub const ALL: [AuthenticationType; 6] = [
        AuthenticationType::Realm,
        AuthenticationType::ApiKey,
        AuthenticationType::Token,
        AuthenticationType::Delegated,
        AuthenticationType::Anonymous,
        AuthenticationType::Internal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AuthenticationType::Realm => "REALM",
            AuthenticationType::ApiKey => "API_KEY",
            AuthenticationType::Token => "TOKEN",
            AuthenticationType::Delegated => "DELEGATED",
            AuthenticationType::Anonymous => "ANONYMOUS",
            AuthenticationType::Internal => "INTERNAL",
        }
    }
}

impl From<AuthenticationType> for &'static str {
    fn from(value: AuthenticationType) -> Self {
        value.as_str()
    }
}

impl TryFrom<String> for AuthenticationType {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl core::fmt::Display for AuthenticationType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthenticationType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| DomainError::validation(format!("unknown authentication type '{s}'")))
    }
}

/// Realms involved in a non API key authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RealmLogin {
    /// The realm that performed the credential check.
    pub authenticated_by: RealmRef,
    /// The realm that resolved the user, when different from the authenticating one.
    pub looked_up_by: Option<RealmRef>,
}

impl RealmLogin {
    pub fn new(authenticated_by: RealmRef) -> Self {
        Self {
            authenticated_by,
            looked_up_by: None,
        }
    }

    pub fn looked_up_by(mut self, realm: RealmRef) -> Self {
        self.looked_up_by = Some(realm);
        self
    }
}

/// One case per [`AuthenticationType`].
///
/// API key authentication has no lookup realm, so that case does not carry one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthenticationKind {
    Realm(RealmLogin),
    ApiKey { authenticated_by: RealmRef },
    Token(RealmLogin),
    Delegated(RealmLogin),
    Anonymous(RealmLogin),
    Internal(RealmLogin),
}

impl AuthenticationKind {
    pub fn authentication_type(&self) -> AuthenticationType {
        match self {
            AuthenticationKind::Realm(_) => AuthenticationType::Realm,
            AuthenticationKind::ApiKey { .. } => AuthenticationType::ApiKey,
            AuthenticationKind::Token(_) => AuthenticationType::Token,
            AuthenticationKind::Delegated(_) => AuthenticationType::Delegated,
            AuthenticationKind::Anonymous(_) => AuthenticationType::Anonymous,
            AuthenticationKind::Internal(_) => AuthenticationType::Internal,
        }
    }

    fn realm_login(&self) -> Option<&RealmLogin> {
        match self {
            AuthenticationKind::Realm(login)
            | AuthenticationKind::Token(login)
            | AuthenticationKind::Delegated(login)
            | AuthenticationKind::Anonymous(login)
            | AuthenticationKind::Internal(login) => Some(login),
            AuthenticationKind::ApiKey { .. } => None,
        }
    }

    pub fn authenticated_by(&self) -> &RealmRef {
        match self {
            AuthenticationKind::ApiKey { authenticated_by } => authenticated_by,
            AuthenticationKind::Realm(login)
            | AuthenticationKind::Token(login)
            | AuthenticationKind::Delegated(login)
            | AuthenticationKind::Anonymous(login)
            | AuthenticationKind::Internal(login) => &login.authenticated_by,
        }
    }

    pub fn looked_up_by(&self) -> Option<&RealmRef> {
        self.realm_login().and_then(|login| login.looked_up_by.as_ref())
    }
}

/// An authentication record, as produced by the authentication subsystem.
///
/// The record has a single metadata bag, the user's: API key entries live
/// next to the user's own metadata and are visible to clients.
///
/// Immutable once built; freely shareable across threads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AuthenticationDocument", into = "AuthenticationDocument")]
pub struct Authentication {
    user: User,
    kind: AuthenticationKind,
}

impl Authentication {
    pub fn new(user: User, kind: AuthenticationKind) -> Self {
        Self { user, kind }
    }

    /// Build a record from its flat shape.
    ///
    /// `metadata` is merged into the user's metadata. Rejects an API key
    /// authentication that names a lookup realm, and a key whose value differs
    /// between `metadata` and the user's metadata.
    pub fn from_parts(
        user: User,
        authenticated_by: RealmRef,
        looked_up_by: Option<RealmRef>,
        authentication_type: AuthenticationType,
        metadata: Metadata,
    ) -> DomainResult<Self> {
        let login = RealmLogin {
            authenticated_by,
            looked_up_by,
        };

        let kind = match authentication_type {
            AuthenticationType::Realm => AuthenticationKind::Realm(login),
            AuthenticationType::Token => AuthenticationKind::Token(login),
            AuthenticationType::Delegated => AuthenticationKind::Delegated(login),
            AuthenticationType::Anonymous => AuthenticationKind::Anonymous(login),
            AuthenticationType::Internal => AuthenticationKind::Internal(login),
            AuthenticationType::ApiKey => {
                if let Some(realm) = login.looked_up_by {
                    tracing::warn!(
                        username = user.username(),
                        lookup_realm = %realm,
                        "api key authentication must not carry a lookup realm"
                    );
                    return Err(DomainError::invalid_record(format!(
                        "api key authentication must not have a lookup realm (got '{realm}')"
                    )));
                }
                AuthenticationKind::ApiKey {
                    authenticated_by: login.authenticated_by,
                }
            }
        };

        let merged = merge_metadata(user.metadata(), metadata)?;
        Ok(Self::new(user.with_metadata(merged), kind))
    }

    /// API key authentication through the reserved API key realm.
    ///
    /// Sets `api_key_id` and `api_key_name` in the user's metadata.
    pub fn api_key(user: User, api_key_id: impl Into<String>, api_key_name: Option<String>) -> Self {
        let metadata = user
            .metadata()
            .clone()
            .with(API_KEY_ID_KEY, api_key_id.into())
            .with(API_KEY_NAME_KEY, MetadataValue::from(api_key_name));

        Self::new(
            user.with_metadata(metadata),
            AuthenticationKind::ApiKey {
                authenticated_by: RealmRef::api_key(),
            },
        )
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn kind(&self) -> &AuthenticationKind {
        &self.kind
    }

    /// The record's metadata bag (the same map as `user().metadata()`).
    pub fn metadata(&self) -> &Metadata {
        self.user.metadata()
    }

    pub fn authenticated_by(&self) -> &RealmRef {
        self.kind.authenticated_by()
    }

    pub fn looked_up_by(&self) -> Option<&RealmRef> {
        self.kind.looked_up_by()
    }

    pub fn authentication_type(&self) -> AuthenticationType {
        self.kind.authentication_type()
    }

    pub fn is_api_key(&self) -> bool {
        matches!(self.kind, AuthenticationKind::ApiKey { .. })
    }
}

/// Flat document shape of [`Authentication`].
#[derive(Debug, Clone, Serialize, Deserialize)]
struct AuthenticationDocument {
    user: User,
    authenticated_by: RealmRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    looked_up_by: Option<RealmRef>,
    authentication_type: AuthenticationType,
    /// Extra record metadata, merged into the user's on decode.
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    metadata: Metadata,
}

fn merge_metadata(user_metadata: &Metadata, record_metadata: Metadata) -> DomainResult<Metadata> {
    let mut merged = user_metadata.clone();
    for (key, value) in record_metadata {
        match merged.get(&key) {
            Some(existing) if *existing != value => {
                return Err(DomainError::invalid_record(format!(
                    "metadata key '{key}' differs between user and authentication ({} vs {})",
                    existing.kind(),
                    value.kind()
                )));
            }
            Some(_) => {}
            None => {
                merged.insert(key, value);
            }
        }
    }
    Ok(merged)
}

impl TryFrom<AuthenticationDocument> for Authentication {
    type Error = DomainError;

    fn try_from(doc: AuthenticationDocument) -> Result<Self, Self::Error> {
        Authentication::from_parts(
            doc.user,
            doc.authenticated_by,
            doc.looked_up_by,
            doc.authentication_type,
            doc.metadata,
        )
    }
}

impl From<Authentication> for AuthenticationDocument {
    fn from(auth: Authentication) -> Self {
        let authentication_type = auth.authentication_type();
        let (authenticated_by, looked_up_by) = match auth.kind {
            AuthenticationKind::ApiKey { authenticated_by } => (authenticated_by, None),
            AuthenticationKind::Realm(login)
            | AuthenticationKind::Token(login)
            | AuthenticationKind::Delegated(login)
            | AuthenticationKind::Anonymous(login)
            | AuthenticationKind::Internal(login) => (login.authenticated_by, login.looked_up_by),
        };

        Self {
            user: auth.user,
            authenticated_by,
            looked_up_by,
            authentication_type,
            metadata: Metadata::new(),
        }
    }
}
