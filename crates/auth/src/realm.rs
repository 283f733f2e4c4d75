use serde::{Deserialize, Serialize};

use authstatus_core::ValueObject;

/// Reserved realm name carried by every API key authentication.
pub const API_KEY_REALM_NAME: &str = "_es_api_key";

/// Reserved realm type carried by every API key authentication.
pub const API_KEY_REALM_TYPE: &str = "_es_api_key";

/// Realm types implemented by the authentication subsystem.
pub const KNOWN_REALM_TYPES: &[&str] = &[
    "file",
    "native",
    "ldap",
    "active_directory",
    "saml",
    "kerberos",
    "pki",
];

/// Reference to the realm that authenticated (or looked up) a user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RealmRef {
    pub name: String,

    #[serde(rename = "type")]
    pub realm_type: String,

    /// Node on which the realm ran. Never part of the projected status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_name: Option<String>,
}

impl RealmRef {
    pub fn new(name: impl Into<String>, realm_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            realm_type: realm_type.into(),
            node_name: None,
        }
    }

    /// The reserved realm reference used for API key authentication.
    pub fn api_key() -> Self {
        Self::new(API_KEY_REALM_NAME, API_KEY_REALM_TYPE)
    }

    pub fn with_node_name(mut self, node_name: impl Into<String>) -> Self {
        self.node_name = Some(node_name.into());
        self
    }

    /// Whether this reference carries the reserved API key name/type pair.
    pub fn is_api_key_realm(&self) -> bool {
        self.name == API_KEY_REALM_NAME && self.realm_type == API_KEY_REALM_TYPE
    }

    pub fn is_known_type(&self) -> bool {
        KNOWN_REALM_TYPES.contains(&self.realm_type.as_str())
    }
}

impl ValueObject for RealmRef {}

impl core::fmt::Display for RealmRef {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}/{}", self.realm_type, self.name)
    }
}
