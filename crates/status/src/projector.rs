//! Projection of an [`Authentication`] record onto the client-facing
//! [`AuthenticationStatus`].

use authstatus_auth::{
    API_KEY_ID_KEY, API_KEY_NAME_KEY, Authentication, AuthenticationKind, Metadata, MetadataValue,
    RealmRef,
};
use authstatus_core::{DomainError, DomainResult};

use crate::status::{ApiKeyInfo, AuthenticationStatus, RealmInfo, StatusUser};

/// Seam for components that hand out authentication status.
pub trait StatusProjector: Send + Sync {
    fn project(&self, authentication: &Authentication) -> DomainResult<AuthenticationStatus>;
}

/// The standard projector; delegates to [`project`].
#[derive(Debug, Default, Clone, Copy)]
pub struct RealmStatusProjector;

impl StatusProjector for RealmStatusProjector {
    fn project(&self, authentication: &Authentication) -> DomainResult<AuthenticationStatus> {
        project(authentication)
    }
}

/// Project an authentication record onto its client-facing status.
///
/// - No IO
/// - No partial output: all checks run before the status is assembled
///
/// Fails with [`DomainError::InvalidRecord`] when an API key record does not
/// use the reserved API key realm, and with [`DomainError::MissingField`] when
/// it lacks `api_key_id`.
pub fn project(authentication: &Authentication) -> DomainResult<AuthenticationStatus> {
    let api_key_info = match authentication.kind() {
        AuthenticationKind::ApiKey { authenticated_by } => {
            Some(api_key_info(authenticated_by, authentication.metadata()))
        }
        _ => None,
    }
    .transpose()
    .inspect_err(|err| {
        tracing::warn!(
            username = authentication.user().username(),
            error = %err,
            "rejected authentication record"
        );
    })?;

    let user = authentication.user();
    let authenticated_by = authentication.authenticated_by();

    let lookup_realm = match authentication.looked_up_by() {
        Some(looked_up_by) => RealmInfo::from(looked_up_by),
        // No separate lookup: clients see the authenticating realm.
        None => RealmInfo::from(authenticated_by),
    };

    let authentication_type = authentication.authentication_type().as_str().to_lowercase();

    tracing::debug!(
        principal = user.username(),
        authentication_type = %authentication_type,
        "projected authentication status"
    );

    Ok(AuthenticationStatus {
        user: StatusUser {
            principal: user.username().to_string(),
            roles: user.roles().iter().map(|r| r.as_str().to_string()).collect(),
            metadata: user.metadata().clone(),
            full_name: user.full_name().map(str::to_string),
            email: user.email().map(str::to_string),
        },
        enabled: user.enabled(),
        authentication_realm: RealmInfo::from(authenticated_by),
        lookup_realm,
        authentication_type,
        token: None,
        api_key_info,
    })
}

fn api_key_info(authenticated_by: &RealmRef, metadata: &Metadata) -> DomainResult<ApiKeyInfo> {
    if !authenticated_by.is_api_key_realm() {
        return Err(DomainError::invalid_record(format!(
            "api key authentication must use the reserved api key realm (got '{authenticated_by}')"
        )));
    }

    let id = match metadata.get(API_KEY_ID_KEY) {
        None | Some(MetadataValue::Null) => return Err(DomainError::missing_field(API_KEY_ID_KEY)),
        Some(MetadataValue::String(id)) if id.is_empty() => {
            return Err(DomainError::invalid_record(format!("'{API_KEY_ID_KEY}' must not be empty")));
        }
        Some(MetadataValue::String(id)) => id.clone(),
        Some(other) => {
            return Err(DomainError::invalid_record(format!(
                "'{API_KEY_ID_KEY}' must be a string (got {})",
                other.kind()
            )));
        }
    };

    let name = match metadata.get(API_KEY_NAME_KEY) {
        None | Some(MetadataValue::Null) => None,
        Some(MetadataValue::String(name)) => Some(name.clone()),
        Some(other) => {
            return Err(DomainError::invalid_record(format!(
                "'{API_KEY_NAME_KEY}' must be a string (got {})",
                other.kind()
            )));
        }
    };

    Ok(ApiKeyInfo { id, name })
}
