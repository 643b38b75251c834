//! Matching policies and the policy-aware cache key.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::representation::TypeRepresentation;

/// Policy for handling several loaded versions of an assembly during resolution.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize,
)]
pub enum AssemblyMatchStrategy {
    /// Every referenced assembly must be loaded in exactly one version; the recorded
    /// version is not required to match it.
    #[default]
    AnySingleVersion,
    /// The recorded version must be loaded.
    SpecificVersion,
    /// The newest loaded version wins.
    LatestVersion,
}

/// How a representation is matched against a loaded type.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize,
)]
pub enum TypeMatchStrategy {
    /// Namespace, name and generic arguments must match; assemblies are ignored.
    NamespaceAndName,
    /// As [`TypeMatchStrategy::NamespaceAndName`], and the assembly simple names of the
    /// type and every generic argument must match. Versions are ignored.
    #[default]
    AssemblyQualifiedName,
}

/// What to do when more than one loaded type matches.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize,
)]
pub enum MultipleMatchStrategy {
    /// Fail with an ambiguity error.
    #[default]
    ThrowOnMultiple,
    /// Take the first match in assembly load order.
    FirstMatch,
    /// Take the match from the newest assembly version.
    NewestVersion,
    /// Take the match from the oldest assembly version.
    OldestVersion,
}

/// Key for caches whose entries depend on matching policy.
///
/// Equality and hashing are structural across all three fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeRepresentationCacheKey {
    /// The representation being resolved.
    pub representation: TypeRepresentation,
    /// The type match strategy in effect.
    pub type_match_strategy: TypeMatchStrategy,
    /// The multiple match strategy in effect.
    pub multiple_match_strategy: MultipleMatchStrategy,
}

impl TypeRepresentationCacheKey {
    /// Create a new cache key.
    #[must_use]
    pub fn new(
        representation: TypeRepresentation,
        type_match_strategy: TypeMatchStrategy,
        multiple_match_strategy: MultipleMatchStrategy,
    ) -> Self {
        TypeRepresentationCacheKey {
            representation,
            type_match_strategy,
            multiple_match_strategy,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use strum::IntoEnumIterator;

    use super::*;

    fn representation(name: &str) -> TypeRepresentation {
        TypeRepresentation::new("System", name, "mscorlib", Some("4.0.0.0"), Some(vec![]))
            .unwrap()
    }

    #[test]
    fn test_cache_key_equality_requires_all_fields() {
        let key = TypeRepresentationCacheKey::new(
            representation("Int32"),
            TypeMatchStrategy::NamespaceAndName,
            MultipleMatchStrategy::FirstMatch,
        );

        assert_eq!(key, key.clone());

        let mut other = key.clone();
        other.representation = representation("Int64");
        assert_ne!(key, other);

        let mut other = key.clone();
        other.type_match_strategy = TypeMatchStrategy::AssemblyQualifiedName;
        assert_ne!(key, other);

        let mut other = key.clone();
        other.multiple_match_strategy = MultipleMatchStrategy::NewestVersion;
        assert_ne!(key, other);
    }

    #[test]
    fn test_cache_key_as_map_key() {
        let mut map = HashMap::new();
        for type_match in TypeMatchStrategy::iter() {
            for multiple_match in MultipleMatchStrategy::iter() {
                let key = TypeRepresentationCacheKey::new(
                    representation("Guid"),
                    type_match,
                    multiple_match,
                );
                map.insert(key, format!("{type_match}/{multiple_match}"));
            }
        }
        assert_eq!(map.len(), 8);

        let lookup = TypeRepresentationCacheKey::new(
            representation("Guid"),
            TypeMatchStrategy::AssemblyQualifiedName,
            MultipleMatchStrategy::OldestVersion,
        );
        assert_eq!(
            map.get(&lookup).map(String::as_str),
            Some("AssemblyQualifiedName/OldestVersion")
        );
    }

    #[test]
    fn test_strategy_defaults() {
        assert_eq!(AssemblyMatchStrategy::default(), AssemblyMatchStrategy::AnySingleVersion);
        assert_eq!(AssemblyMatchStrategy::AnySingleVersion.to_string(), "AnySingleVersion");
        assert_eq!(MultipleMatchStrategy::default(), MultipleMatchStrategy::ThrowOnMultiple);
    }
}
