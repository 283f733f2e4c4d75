//! Structural equivalence between a decoded [`AuthenticationStatus`] and the
//! projection of the [`Authentication`] it was produced from.
//!
//! Used to check that an independently written client-side parser agrees with
//! the projector. A mismatch is reported field by field.

use std::collections::BTreeSet;

use thiserror::Error;

use authstatus_auth::{Authentication, MetadataValue};
use authstatus_core::DomainError;

use crate::delegate_pki::{DelegatePkiAuthenticationResponse, DelegatedPkiGrant};
use crate::projector::project;
use crate::status::AuthenticationStatus;

/// One field whose decoded value differs from the projected one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMismatch {
    /// Dotted path of the field, e.g. `lookup_realm.name` or `metadata.string`.
    pub field: String,
    pub expected: String,
    pub actual: String,
}

impl core::fmt::Display for FieldMismatch {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}: expected {}, got {}", self.field, self.expected, self.actual)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EquivalenceError {
    /// The reference record could not be projected.
    #[error("projection failed: {0}")]
    Projection(#[from] DomainError),

    #[error("status differs from projection: {}", join(.0))]
    Mismatch(Vec<FieldMismatch>),

    #[error("codec failure: {0}")]
    Codec(String),
}

fn join(mismatches: &[FieldMismatch]) -> String {
    mismatches
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Check that `decoded` equals `project(authentication)` in every field.
pub fn verify_equivalent(
    authentication: &Authentication,
    decoded: &AuthenticationStatus,
) -> Result<(), EquivalenceError> {
    let expected = project(authentication)?;
    into_result(diff(&expected, decoded))
}

/// Check a decoded delegated PKI response against the grant it was built from.
pub fn verify_equivalent_response(
    grant: &DelegatedPkiGrant,
    decoded: &DelegatePkiAuthenticationResponse,
) -> Result<(), EquivalenceError> {
    let expected = project(&grant.authentication)?;

    let mut mismatches = Vec::new();
    compare(&mut mismatches, "access_token", &grant.access_token.as_str(), &decoded.access_token());
    compare(&mut mismatches, "expires_in", &grant.expires_in, &decoded.expires_in());
    mismatches.extend(
        diff(&expected, decoded.authentication())
            .into_iter()
            .map(|m| FieldMismatch {
                field: format!("authentication.{}", m.field),
                ..m
            }),
    );

    into_result(mismatches)
}

/// Encode a status to JSON and decode it back.
pub fn round_trip_json(status: &AuthenticationStatus) -> Result<AuthenticationStatus, EquivalenceError> {
    let encoded = serde_json::to_vec(status).map_err(|e| EquivalenceError::Codec(e.to_string()))?;
    serde_json::from_slice(&encoded).map_err(|e| EquivalenceError::Codec(e.to_string()))
}

/// Every field in which `actual` differs from `expected`.
///
/// Empty iff `expected == actual`.
pub fn diff(expected: &AuthenticationStatus, actual: &AuthenticationStatus) -> Vec<FieldMismatch> {
    let mut out = Vec::new();

    compare(&mut out, "principal", &expected.user.principal, &actual.user.principal);
    compare(&mut out, "roles", &expected.user.roles, &actual.user.roles);
    compare(&mut out, "full_name", &expected.user.full_name, &actual.user.full_name);
    compare(&mut out, "email", &expected.user.email, &actual.user.email);

    let keys: BTreeSet<&str> = expected
        .user
        .metadata
        .keys()
        .chain(actual.user.metadata.keys())
        .collect();
    for key in keys {
        compare_metadata(
            &mut out,
            key,
            expected.user.metadata.get(key),
            actual.user.metadata.get(key),
        );
    }

    compare(&mut out, "enabled", &expected.enabled, &actual.enabled);
    compare(
        &mut out,
        "authentication_realm.name",
        &expected.authentication_realm.name,
        &actual.authentication_realm.name,
    );
    compare(
        &mut out,
        "authentication_realm.type",
        &expected.authentication_realm.realm_type,
        &actual.authentication_realm.realm_type,
    );
    compare(&mut out, "lookup_realm.name", &expected.lookup_realm.name, &actual.lookup_realm.name);
    compare(
        &mut out,
        "lookup_realm.type",
        &expected.lookup_realm.realm_type,
        &actual.lookup_realm.realm_type,
    );
    compare(
        &mut out,
        "authentication_type",
        &expected.authentication_type,
        &actual.authentication_type,
    );
    compare(&mut out, "token", &expected.token, &actual.token);

    match (&expected.api_key_info, &actual.api_key_info) {
        (Some(e), Some(a)) => {
            compare(&mut out, "api_key.id", &e.id, &a.id);
            compare(&mut out, "api_key.name", &e.name, &a.name);
        }
        (e, a) => compare(&mut out, "api_key", e, a),
    }

    out
}

fn compare<T: PartialEq + core::fmt::Debug + ?Sized>(
    out: &mut Vec<FieldMismatch>,
    field: &str,
    expected: &T,
    actual: &T,
) {
    if expected != actual {
        out.push(FieldMismatch {
            field: field.to_string(),
            expected: format!("{expected:?}"),
            actual: format!("{actual:?}"),
        });
    }
}

fn compare_metadata(
    out: &mut Vec<FieldMismatch>,
    key: &str,
    expected: Option<&MetadataValue>,
    actual: Option<&MetadataValue>,
) {
    if expected == actual {
        return;
    }

    let describe = |value: Option<&MetadataValue>| match value {
        None => "<absent>".to_string(),
        Some(v) => format!("{v:?}"),
    };

    out.push(FieldMismatch {
        field: format!("metadata.{key}"),
        expected: describe(expected),
        actual: describe(actual),
    });
}

fn into_result(mismatches: Vec<FieldMismatch>) -> Result<(), EquivalenceError> {
    if mismatches.is_empty() {
        Ok(())
    } else {
        Err(EquivalenceError::Mismatch(mismatches))
    }
}

#[cfg(test)]
mod tests {
    use authstatus_auth::{API_KEY_ID_KEY, AuthenticationKind, Metadata, RealmRef, Role, User};

    use super::*;
    use crate::status::{ApiKeyInfo, RealmInfo};

    fn realm_auth() -> Authentication {
        let user = User::new("alice", vec![Role::new("admin")])
            .unwrap()
            .with_metadata(Metadata::new().with("string", "x").with("nothing", MetadataValue::Null));
        Authentication::new(
            user,
            AuthenticationKind::Realm(authstatus_auth::RealmLogin::new(RealmRef::new("realm1", "native"))),
        )
    }

    fn fields(err: EquivalenceError) -> Vec<String> {
        match err {
            EquivalenceError::Mismatch(m) => m.into_iter().map(|m| m.field).collect(),
            other => panic!("expected mismatch, got {other:?}"),
        }
    }

    #[test]
    fn projection_is_equivalent_to_itself() {
        let auth = realm_auth();
        let status = project(&auth).unwrap();

        assert_eq!(verify_equivalent(&auth, &status), Ok(()));
        assert_eq!(verify_equivalent(&auth, &round_trip_json(&status).unwrap()), Ok(()));
    }

    #[test]
    fn dropped_lookup_realm_fallback_is_reported() {
        let auth = realm_auth();
        let mut status = project(&auth).unwrap();
        status.lookup_realm = RealmInfo::new("", "");

        assert_eq!(
            fields(verify_equivalent(&auth, &status).unwrap_err()),
            vec!["lookup_realm.name", "lookup_realm.type"]
        );
    }

    #[test]
    fn null_metadata_differs_from_absent_key() {
        let auth = realm_auth();
        let mut status = project(&auth).unwrap();
        status.user.metadata = Metadata::new().with("string", "x");

        let err = verify_equivalent(&auth, &status).unwrap_err();
        let EquivalenceError::Mismatch(mismatches) = &err else {
            panic!("expected mismatch");
        };
        assert_eq!(mismatches.len(), 1);
        assert_eq!(mismatches[0].field, "metadata.nothing");
        assert_eq!(mismatches[0].expected, "Null");
        assert_eq!(mismatches[0].actual, "<absent>");
        assert!(err.to_string().contains("metadata.nothing"));
    }

    #[test]
    fn api_key_presence_and_fields_are_compared() {
        let auth = realm_auth();
        let mut status = project(&auth).unwrap();
        status.api_key_info = Some(ApiKeyInfo {
            id: "k1".to_string(),
            name: None,
        });
        assert_eq!(fields(verify_equivalent(&auth, &status).unwrap_err()), vec!["api_key"]);

        let auth = Authentication::api_key(User::new("svc", vec![]).unwrap(), "k1", Some("n".to_string()));
        let mut status = project(&auth).unwrap();
        status.api_key_info = Some(ApiKeyInfo {
            id: "k1".to_string(),
            name: None,
        });
        assert_eq!(fields(verify_equivalent(&auth, &status).unwrap_err()), vec!["api_key.name"]);
    }

    #[test]
    fn unprojectable_reference_is_a_projection_error() {
        let auth = Authentication::new(
            User::new("svc", vec![]).unwrap(),
            AuthenticationKind::ApiKey {
                authenticated_by: RealmRef::api_key(),
            },
        );
        let status = project(&realm_auth()).unwrap();

        assert_eq!(
            verify_equivalent(&auth, &status),
            Err(EquivalenceError::Projection(DomainError::missing_field(API_KEY_ID_KEY)))
        );
    }

    #[test]
    fn diff_is_empty_only_for_equal_statuses() {
        let a = project(&realm_auth()).unwrap();
        let mut b = a.clone();
        assert!(diff(&a, &b).is_empty());

        b.enabled = false;
        b.user.roles.push("extra".to_string());
        assert_eq!(diff(&a, &b).len(), 2);
    }
}
