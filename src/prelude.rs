//! # dotrepr Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the dotrepr library.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all dotrepr operations
pub use crate::Error;

/// The result type used throughout dotrepr
pub use crate::Result;

// ================================================================================================
// Representations
// ================================================================================================

/// Type representation data model and matching policies
pub use crate::representation::{
    AssemblyMatchStrategy, MultipleMatchStrategy, TypeMatchStrategy, TypeRepresentation,
    TypeRepresentationCacheKey,
};

/// Conversion from runtime types
pub use crate::representation::{to_representation, ToRepresentation};

/// Member, constructor and method representations
pub use crate::representation::{
    ConstructorRepresentation, MemberRepresentation, MethodRepresentation,
};

/// Version-insensitive comparison
pub use crate::representation::{
    Versionless, VersionlessTypeComparer, VersionlessTypeRepresentationComparer,
};

// ================================================================================================
// Resolution
// ================================================================================================

/// Caching type resolver and its configuration
pub use crate::resolver::{ResolverConfig, TypeResolver};

// ================================================================================================
// Introspection
// ================================================================================================

/// Traits every type runtime implements
pub use crate::reflection::{
    AssemblyUniverse, MemberIntrospection, MemberKind, MethodIntrospection, TypeIntrospection,
};

/// Reference runtime
pub use crate::runtime::{
    Assembly, AssemblyIdentity, AssemblyVersion, MemberDefinition, RuntimeType, TypeUniverse,
};
