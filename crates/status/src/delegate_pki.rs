//! Response to a delegated PKI authentication.
//!
//! A trusted proxy presents a client certificate chain on behalf of the end
//! user; the answer is a bearer access token plus the authentication status of
//! the user the certificate resolved to.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use authstatus_auth::Authentication;
use authstatus_core::{DomainError, DomainResult};

use crate::projector::project;
use crate::status::AuthenticationStatus;

/// Token type of every delegated PKI access token.
pub const BEARER_TOKEN_TYPE: &str = "Bearer";

/// What the token service granted for a delegated PKI authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelegatedPkiGrant {
    pub access_token: String,
    pub expires_in: Duration,
    pub authentication: Authentication,
}

/// Client-facing response to a delegated PKI authentication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DelegatePkiDocument", into = "DelegatePkiDocument")]
pub struct DelegatePkiAuthenticationResponse {
    access_token: String,
    expires_in: Duration,
    authentication: AuthenticationStatus,
}

impl DelegatePkiAuthenticationResponse {
    pub fn new(
        access_token: impl Into<String>,
        expires_in: Duration,
        authentication: &Authentication,
    ) -> DomainResult<Self> {
        if expires_in < Duration::zero() {
            return Err(DomainError::validation("expires_in must not be negative"));
        }
        // Encoded as whole seconds.
        if expires_in.subsec_nanos() != 0 {
            return Err(DomainError::validation(format!(
                "expires_in must be a whole number of seconds (got {} ms)",
                expires_in.num_milliseconds()
            )));
        }

        Ok(Self {
            access_token: access_token.into(),
            expires_in,
            authentication: project(authentication)?,
        })
    }

    pub fn from_grant(grant: &DelegatedPkiGrant) -> DomainResult<Self> {
        Self::new(grant.access_token.clone(), grant.expires_in, &grant.authentication)
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn expires_in(&self) -> Duration {
        self.expires_in
    }

    pub fn token_type(&self) -> &'static str {
        BEARER_TOKEN_TYPE
    }

    pub fn authentication(&self) -> &AuthenticationStatus {
        &self.authentication
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct DelegatePkiDocument {
    access_token: String,
    #[serde(rename = "type")]
    token_type: String,
    /// Seconds.
    expires_in: i64,
    authentication: AuthenticationStatus,
}

impl TryFrom<DelegatePkiDocument> for DelegatePkiAuthenticationResponse {
    type Error = DomainError;

    fn try_from(doc: DelegatePkiDocument) -> Result<Self, Self::Error> {
        if !doc.token_type.eq_ignore_ascii_case(BEARER_TOKEN_TYPE) {
            return Err(DomainError::validation(format!(
                "unsupported token type '{}' (expected '{BEARER_TOKEN_TYPE}')",
                doc.token_type
            )));
        }

        let expires_in = Duration::try_seconds(doc.expires_in)
            .filter(|d| *d >= Duration::zero())
            .ok_or_else(|| DomainError::validation(format!("invalid expires_in: {}", doc.expires_in)))?;

        Ok(Self {
            access_token: doc.access_token,
            expires_in,
            authentication: doc.authentication,
        })
    }
}

impl From<DelegatePkiAuthenticationResponse> for DelegatePkiDocument {
    fn from(response: DelegatePkiAuthenticationResponse) -> Self {
        Self {
            access_token: response.access_token,
            token_type: BEARER_TOKEN_TYPE.to_string(),
            expires_in: response.expires_in.num_seconds(),
            authentication: response.authentication,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use authstatus_auth::{Metadata, RealmRef, Role, User};

    use super::*;

    fn pki_auth() -> Authentication {
        Authentication::from_parts(
            User::new("CN=alice", vec![Role::new("viewer")]).unwrap(),
            RealmRef::new("pki1", "pki"),
            None,
            authstatus_auth::AuthenticationType::Delegated,
            Metadata::new(),
        )
        .unwrap()
    }

    #[test]
    fn encodes_bearer_type_and_seconds() {
        let response = DelegatePkiAuthenticationResponse::new("tok", Duration::minutes(20), &pki_auth()).unwrap();
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["access_token"], "tok");
        assert_eq!(json["type"], "Bearer");
        assert_eq!(json["expires_in"], 1200);
        assert_eq!(json["authentication"]["authentication_type"], "delegated");
        assert_eq!(json["authentication"]["lookup_realm"], json!({ "name": "pki1", "type": "pki" }));
    }

    #[test]
    fn decodes_back_to_the_same_response() {
        let response = DelegatePkiAuthenticationResponse::new("tok", Duration::seconds(5), &pki_auth()).unwrap();
        let decoded: DelegatePkiAuthenticationResponse =
            serde_json::from_str(&serde_json::to_string(&response).unwrap()).unwrap();

        assert_eq!(decoded, response);
        assert_eq!(decoded.token_type(), "Bearer");
    }

    #[test]
    fn non_bearer_type_is_rejected() {
        let mut json = serde_json::to_value(
            DelegatePkiAuthenticationResponse::new("tok", Duration::seconds(5), &pki_auth()).unwrap(),
        )
        .unwrap();
        json["type"] = json!("mac");

        let err = serde_json::from_value::<DelegatePkiAuthenticationResponse>(json).unwrap_err();
        assert!(err.to_string().contains("unsupported token type"));
    }

    #[test]
    fn negative_expiry_is_rejected() {
        let result = DelegatePkiAuthenticationResponse::new("tok", Duration::seconds(-1), &pki_auth());
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn sub_second_expiry_is_rejected() {
        let result = DelegatePkiAuthenticationResponse::new("tok", Duration::milliseconds(1500), &pki_auth());
        let err = result.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert!(err.to_string().contains("whole number of seconds"));

        let grant = DelegatedPkiGrant {
            access_token: "tok".to_string(),
            expires_in: Duration::milliseconds(1500),
            authentication: pki_auth(),
        };
        assert!(DelegatePkiAuthenticationResponse::from_grant(&grant).is_err());
    }

    #[test]
    fn whole_second_expiry_round_trips_exactly() {
        let response = DelegatePkiAuthenticationResponse::new("tok", Duration::milliseconds(2000), &pki_auth()).unwrap();
        let decoded: DelegatePkiAuthenticationResponse =
            serde_json::from_value(serde_json::to_value(&response).unwrap()).unwrap();

        assert_eq!(decoded.expires_in(), Duration::seconds(2));
        assert_eq!(decoded, response);
    }

    #[test]
    fn projection_errors_propagate() {
        let bad = Authentication::new(
            User::new("svc", vec![]).unwrap(),
            authstatus_auth::AuthenticationKind::ApiKey {
                authenticated_by: RealmRef::api_key(),
            },
        );

        let result = DelegatePkiAuthenticationResponse::new("tok", Duration::seconds(5), &bad);
        assert!(matches!(result, Err(DomainError::MissingField(_))));
    }
}
