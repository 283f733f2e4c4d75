//! `authstatus-auth` — the identity model: who is authenticated, and how.
//!
//! This crate holds facts only. Turning them into the client-facing status
//! lives in `authstatus-status`.

pub mod authentication;
pub mod metadata;
pub mod realm;
pub mod roles;
pub mod user;

pub use authentication::{
    API_KEY_ID_KEY, API_KEY_NAME_KEY, Authentication, AuthenticationKind, AuthenticationType,
    RealmLogin,
};
pub use metadata::{Metadata, MetadataValue};
pub use realm::{API_KEY_REALM_NAME, API_KEY_REALM_TYPE, KNOWN_REALM_TYPES, RealmRef};
pub use roles::Role;
pub use user::User;
