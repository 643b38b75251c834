//! Type representations and everything built directly on them.
//!
//! # Key Components
//!
//! - [`TypeRepresentation`] - Immutable description of a type
//! - [`codec`] - Qualified-name build and parse
//! - [`to_representation`] - Conversion from runtime types
//! - [`VersionlessTypeRepresentationComparer`] / [`VersionlessTypeComparer`] - Equality
//!   ignoring assembly versions
//! - [`MemberRepresentation`] / [`ConstructorRepresentation`] / [`MethodRepresentation`] -
//!   Members located by signature hash
//! - [`AssemblyMatchStrategy`] / [`TypeMatchStrategy`] / [`MultipleMatchStrategy`] -
//!   Resolution policies
//!
//! # Serialization
//!
//! Representations derive `serde` traits with camelCase field names. Deserialization runs
//! the same validation as the constructors, so a blank name is rejected at the boundary.

pub mod codec;
mod comparer;
mod convert;
mod hash;
mod member;
pub mod signature;
mod strategy;
mod typerepr;

pub use comparer::{
    Versionless, VersionlessTypeComparer, VersionlessTypeRepresentationComparer, NULL_HASH,
};
pub use convert::{to_representation, ToRepresentation};
pub use hash::RepresentationHash;
pub use member::{ConstructorRepresentation, MemberRepresentation, MethodRepresentation};
pub use strategy::{
    AssemblyMatchStrategy, MultipleMatchStrategy, TypeMatchStrategy, TypeRepresentationCacheKey,
};
pub use typerepr::TypeRepresentation;
