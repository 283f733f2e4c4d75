//! `authstatus-status` — projection of authentication records onto the
//! client-facing authentication status.
//!
//! Pure and synchronous: no IO, no shared state. Every function here may be
//! called concurrently.

pub mod delegate_pki;
pub mod equivalence;
pub mod projector;
pub mod status;

pub use delegate_pki::{BEARER_TOKEN_TYPE, DelegatePkiAuthenticationResponse, DelegatedPkiGrant};
pub use equivalence::{
    EquivalenceError, FieldMismatch, diff, round_trip_json, verify_equivalent,
    verify_equivalent_response,
};
pub use projector::{RealmStatusProjector, StatusProjector, project};
pub use status::{ApiKeyInfo, AuthenticationStatus, RealmInfo, StatusUser, TokenInfo};
