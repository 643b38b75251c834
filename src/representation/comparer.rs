//! Version-insensitive equality for representations and runtime types.
//!
//! Two representations are versionlessly equal when they are equal after
//! [`codec::remove_assembly_versions`]; hashing follows the same rule, so comparer-equal
//! values always share a hash. `None` equals only `None` and hashes to [`NULL_HASH`].

use std::hash::{Hash, Hasher};

use crate::{
    reflection::TypeIntrospection,
    representation::{codec, convert::to_representation, RepresentationHash, TypeRepresentation},
    Result,
};

/// Hash of an absent value.
pub const NULL_HASH: u64 = 0;

/// Compares representations ignoring every assembly version.
#[derive(Debug, Clone, Copy, Default)]
pub struct VersionlessTypeRepresentationComparer;

impl VersionlessTypeRepresentationComparer {
    /// `true` if both are absent, or both are present and equal once versions are removed.
    #[must_use]
    pub fn equals(&self, x: Option<&TypeRepresentation>, y: Option<&TypeRepresentation>) -> bool {
        match (x, y) {
            (None, None) => true,
            (Some(x), Some(y)) => {
                codec::remove_assembly_versions(x) == codec::remove_assembly_versions(y)
            }
            _ => false,
        }
    }

    /// Version-insensitive hash, [`NULL_HASH`] for `None`.
    #[must_use]
    pub fn hash_of(&self, value: Option<&TypeRepresentation>) -> u64 {
        value.map_or(NULL_HASH, |representation| {
            RepresentationHash::new()
                .add_representation(&codec::remove_assembly_versions(representation))
                .finalize()
        })
    }
}

/// Compares runtime types by converting them to representations first.
#[derive(Debug, Clone, Copy, Default)]
pub struct VersionlessTypeComparer;

impl VersionlessTypeComparer {
    /// See [`VersionlessTypeRepresentationComparer::equals`].
    ///
    /// # Errors
    /// Returns an error if either type cannot be converted, see
    /// [`to_representation`](crate::representation::to_representation).
    pub fn equals<T: TypeIntrospection>(&self, x: Option<&T>, y: Option<&T>) -> Result<bool> {
        let x = x.map(to_representation).transpose()?;
        let y = y.map(to_representation).transpose()?;
        Ok(VersionlessTypeRepresentationComparer.equals(x.as_ref(), y.as_ref()))
    }

    /// See [`VersionlessTypeRepresentationComparer::hash_of`].
    ///
    /// # Errors
    /// Returns an error if the type cannot be converted.
    pub fn hash_of<T: TypeIntrospection>(&self, value: Option<&T>) -> Result<u64> {
        let representation = value.map(to_representation).transpose()?;
        Ok(VersionlessTypeRepresentationComparer.hash_of(representation.as_ref()))
    }
}

/// Wraps a representation so that std collections key it version-insensitively.
///
/// ```rust
/// use std::collections::HashSet;
/// use dotrepr::representation::{TypeRepresentation, Versionless};
///
/// let v1 = TypeRepresentation::new("Models", "Customer", "Models", Some("1.0.0.0"), None)?;
/// let v2 = v1.with_assembly_version(Some("2.0.0.0"))?;
///
/// let mut seen = HashSet::new();
/// assert!(seen.insert(Versionless(&v1)));
/// assert!(!seen.insert(Versionless(&v2)));
/// # Ok::<(), dotrepr::Error>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Versionless<'a>(pub &'a TypeRepresentation);

impl PartialEq for Versionless<'_> {
    fn eq(&self, other: &Self) -> bool {
        VersionlessTypeRepresentationComparer.equals(Some(self.0), Some(other.0))
    }
}

impl Eq for Versionless<'_> {}

impl Hash for Versionless<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(VersionlessTypeRepresentationComparer.hash_of(Some(self.0)));
    }
}
