//! Generated authentication records covering every authentication type and
//! both presence and absence of each optional field.

#![allow(dead_code)]

use proptest::prelude::*;

use authstatus_auth::{
    API_KEY_ID_KEY, API_KEY_NAME_KEY, Authentication, AuthenticationKind, AuthenticationType,
    KNOWN_REALM_TYPES, Metadata, MetadataValue, RealmRef, Role, User,
};

pub fn metadata_value() -> impl Strategy<Value = MetadataValue> {
    prop_oneof![
        Just(MetadataValue::Null),
        "[a-z]{0,4}".prop_map(MetadataValue::String),
        prop::collection::vec("[a-z]{1,4}", 0..4).prop_map(MetadataValue::StringList),
    ]
}

pub fn user() -> impl Strategy<Value = User> {
    (
        "[a-z]{1,4}",
        prop::collection::vec("[a-z]{1,4}", 0..4),
        prop::option::of("[a-z]{0,4}"),
        prop::option::of("[a-z]{0,4}"),
        prop::option::of(metadata_value()),
        prop::option::of(metadata_value()),
        any::<bool>(),
    )
        .prop_map(|(username, roles, full_name, email, string, string_list, enabled)| {
            let mut metadata = Metadata::new();
            if let Some(v) = string {
                metadata.insert("string", v);
            }
            if let Some(v) = string_list {
                metadata.insert("string_list", v);
            }

            User::new(username, roles.into_iter().map(Role::from).collect())
                .expect("generated username is non-empty")
                .with_full_name(full_name)
                .with_email(email)
                .with_metadata(metadata)
                .with_enabled(enabled)
        })
}

pub fn realm() -> impl Strategy<Value = RealmRef> {
    (
        "[a-z]{5}",
        prop::sample::select(KNOWN_REALM_TYPES.to_vec()),
        "[a-z]{1,10}",
    )
        .prop_map(|(name, realm_type, node)| RealmRef::new(name, realm_type).with_node_name(node))
}

pub fn realm_type_login() -> impl Strategy<Value = AuthenticationType> {
    prop::sample::select(
        AuthenticationType::ALL
            .into_iter()
            .filter(|t| *t != AuthenticationType::ApiKey)
            .collect::<Vec<_>>(),
    )
}

pub fn realm_authentication() -> impl Strategy<Value = Authentication> {
    (user(), realm(), prop::option::of(realm()), realm_type_login()).prop_map(
        |(user, authenticated_by, looked_up_by, authentication_type)| {
            Authentication::from_parts(user, authenticated_by, looked_up_by, authentication_type, Metadata::new())
                .expect("realm logins accept any lookup realm")
        },
    )
}

pub fn api_key_authentication() -> impl Strategy<Value = Authentication> {
    (
        user(),
        "[A-Za-z0-9]{1,10}",
        prop::option::of("[a-z]{1,10}"),
        any::<bool>(),
        "[a-z]{1,10}",
    )
        .prop_map(|(user, id, name, name_key_present, node)| {
            let mut metadata = user.metadata().clone().with(API_KEY_ID_KEY, id);
            if name_key_present || name.is_some() {
                metadata.insert(API_KEY_NAME_KEY, MetadataValue::from(name));
            }

            Authentication::new(
                user.with_metadata(metadata),
                AuthenticationKind::ApiKey {
                    authenticated_by: RealmRef::api_key().with_node_name(node),
                },
            )
        })
}

pub fn authentication() -> impl Strategy<Value = Authentication> {
    prop_oneof![realm_authentication(), api_key_authentication()]
}
