//! Client-facing authentication status.
//!
//! These types are wire-stable: field names and optionality are part of the
//! contract with API clients.

use serde::{Deserialize, Serialize};

use authstatus_auth::{Metadata, RealmRef};
use authstatus_core::ValueObject;

/// The authenticated user as seen by clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUser {
    #[serde(alias = "username")]
    pub principal: String,

    #[serde(default)]
    pub roles: Vec<String>,

    #[serde(default)]
    pub metadata: Metadata,

    #[serde(default)]
    pub full_name: Option<String>,

    #[serde(default)]
    pub email: Option<String>,
}

/// Realm name/type pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RealmInfo {
    pub name: String,

    #[serde(rename = "type")]
    pub realm_type: String,
}

impl RealmInfo {
    pub fn new(name: impl Into<String>, realm_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            realm_type: realm_type.into(),
        }
    }
}

impl From<&RealmRef> for RealmInfo {
    fn from(realm: &RealmRef) -> Self {
        Self::new(realm.name.clone(), realm.realm_type.clone())
    }
}

/// Bearer token descriptor. Reserved; never filled in by projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub name: String,

    #[serde(rename = "type")]
    pub token_type: String,
}

/// Identity of the API key used to authenticate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKeyInfo {
    pub id: String,

    #[serde(default)]
    pub name: Option<String>,
}

/// Flattened authentication status returned to API clients.
///
/// # Invariants
/// - `lookup_realm` is always present (falls back to `authentication_realm`).
/// - `api_key_info` is present iff `authentication_type == "api_key"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticationStatus {
    #[serde(flatten)]
    pub user: StatusUser,

    pub enabled: bool,

    pub authentication_realm: RealmInfo,

    pub lookup_realm: RealmInfo,

    pub authentication_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<TokenInfo>,

    #[serde(default, rename = "api_key", skip_serializing_if = "Option::is_none")]
    pub api_key_info: Option<ApiKeyInfo>,
}

impl ValueObject for StatusUser {}
impl ValueObject for RealmInfo {}
impl ValueObject for TokenInfo {}
impl ValueObject for ApiKeyInfo {}
impl ValueObject for AuthenticationStatus {}
