//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by their attribute values. Realm
/// references, metadata values and every projected status type are value
/// objects: two instances with the same fields describe the same thing.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct RealmInfo {
///     name: String,
///     realm_type: String,
/// }
///
/// impl ValueObject for RealmInfo {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
