//! Reference type runtime.
//!
//! An in-memory model of assemblies, types and members that implements the
//! [`crate::reflection`] traits. It stands in for a CLR host: the resolver, converter and
//! member re-location run against it in tests, benchmarks and embedding scenarios where no
//! real runtime is available.
//!
//! # Key Components
//!
//! - [`AssemblyIdentity`] / [`AssemblyVersion`] - Assembly names and four-part versions
//! - [`TypeDefinition`] / [`RuntimeType`] - Declared and constructed types
//! - [`MemberDefinition`] / [`RuntimeMethod`] / [`RuntimeMember`] - Members and their views
//! - [`Assembly`] / [`TypeUniverse`] - Assemblies and the loaded set
//!
//! # Thread Safety
//!
//! All types are `Send + Sync`. Definitions use append-only storage, so members and
//! interfaces can be added while other threads read.

mod identity;
mod members;
mod types;
mod universe;

pub use identity::{AssemblyIdentity, AssemblyVersion};
pub use members::{
    MemberDefinition, MemberDefinitionRc, ParameterDefinition, RuntimeMember, RuntimeMethod,
    CONSTRUCTOR_NAME,
};
pub use types::{
    GenericParameter, GenericParameterOwner, RuntimeType, TypeDefinition, TypeDefinitionRc,
};
pub use universe::{Assembly, AssemblyRc, TypeUniverse};
