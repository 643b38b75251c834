//! Introspection seam between the representation layer and a type runtime.
//!
//! The converter, the resolver and member re-location never touch a concrete runtime. They
//! consume the traits in this module, which any runtime (the in-crate [`crate::runtime`]
//! model, a metadata reader, an FFI bridge to a CLR host) can implement.
//!
//! # Key Components
//!
//! - [`TypeIntrospection`] - Queries on a type handle (generics, arrays, nesting, assembly)
//! - [`MethodIntrospection`] - Queries on a method or constructor handle
//! - [`MemberIntrospection`] - Queries on any member handle
//! - [`AssemblyUniverse`] - The set of loaded assemblies and load-by-name type lookup

use std::sync::Arc;

use strum::{Display, EnumIter};

use crate::{runtime::AssemblyIdentity, Result};

/// The category of a type member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum MemberKind {
    /// A constructor (`.ctor`).
    Constructor,
    /// A method.
    Method,
    /// A field.
    Field,
    /// A property.
    Property,
    /// An event.
    Event,
    /// A nested type.
    NestedType,
}

/// A method or constructor parameter as seen by [`MethodIntrospection::parameters`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterInfo<T> {
    /// Parameter name.
    pub name: String,
    /// Parameter type, with generic parameters substituted where the method is closed.
    pub parameter_type: T,
}

/// Read-only reflection queries on a runtime type handle.
pub trait TypeIntrospection: Clone + PartialEq + Sized {
    /// Method and constructor handle type of this runtime.
    type Method: MethodIntrospection<Type = Self>;
    /// Member handle type of this runtime.
    type Member: MemberIntrospection<Type = Self, Method = Self::Method>;

    /// Namespace of the type; nested types report their outermost type's namespace.
    fn namespace(&self) -> String;

    /// Simple name as reflection renders it (`List`1`, `Int32[]`, `Inner`).
    fn name(&self) -> String;

    /// Full name as reflection renders it, `None` for types containing generic parameters
    /// that are not generic type definitions.
    fn full_name(&self) -> Option<String>;

    /// `true` for generic type definitions and constructed generic types.
    fn is_generic_type(&self) -> bool;

    /// `true` for an open generic type definition such as `List`1`.
    fn is_generic_type_definition(&self) -> bool;

    /// `true` if the type is, or has anywhere inside it, an unsubstituted generic parameter.
    fn contains_generic_parameters(&self) -> bool;

    /// The generic type definition of a generic type.
    fn generic_type_definition(&self) -> Option<Self>;

    /// Generic arguments of a constructed generic type, or the parameters of a definition.
    fn generic_arguments(&self) -> Vec<Self>;

    /// `true` for array types.
    fn is_array(&self) -> bool;

    /// Rank of an array type.
    fn array_rank(&self) -> Option<u32>;

    /// Element type of an array type.
    fn element_type(&self) -> Option<Self>;

    /// `true` if the type is declared inside another type.
    fn is_nested(&self) -> bool;

    /// Enclosing type of a nested type.
    fn declaring_type(&self) -> Option<Self>;

    /// Simple name of the declaring assembly.
    fn assembly_name(&self) -> String;

    /// Version of the declaring assembly, rendered as a string.
    fn assembly_version(&self) -> Option<String>;

    /// Interfaces this type implements directly.
    fn interfaces(&self) -> Vec<Self>;

    /// Methods declared on this type.
    fn methods(&self) -> Vec<Self::Method>;

    /// Constructors declared on this type.
    fn constructors(&self) -> Vec<Self::Method>;

    /// All members declared on this type.
    fn members(&self) -> Vec<Self::Member>;
}

/// Read-only reflection queries on a method or constructor handle.
pub trait MethodIntrospection: Clone + Sized {
    /// Type handle of this runtime.
    type Type: TypeIntrospection<Method = Self>;

    /// Method name; constructors are named `.ctor`.
    fn name(&self) -> String;

    /// The type declaring this method.
    fn declaring_type(&self) -> Self::Type;

    /// `true` for generic method definitions and constructed generic methods.
    fn is_generic_method(&self) -> bool;

    /// `true` for an open generic method definition.
    fn is_generic_method_definition(&self) -> bool;

    /// Generic arguments (constructed) or generic parameters (definition).
    fn generic_arguments(&self) -> Vec<Self::Type>;

    /// Parameters in declaration order.
    fn parameters(&self) -> Vec<ParameterInfo<Self::Type>>;

    /// Close a generic method definition over `arguments`.
    ///
    /// # Errors
    /// Returns an error if the method is not a generic definition or the arity differs.
    fn make_generic_method(&self, arguments: &[Self::Type]) -> Result<Self>;
}

/// Read-only reflection queries on a member handle.
pub trait MemberIntrospection: Clone + Sized {
    /// Type handle of this runtime.
    type Type: TypeIntrospection;
    /// Method handle of this runtime.
    type Method: MethodIntrospection<Type = Self::Type>;

    /// Member name.
    fn name(&self) -> String;

    /// Member category.
    fn kind(&self) -> MemberKind;

    /// Field, property or event type; nested types report themselves.
    fn member_type(&self) -> Option<Self::Type>;

    /// The type declaring this member.
    fn declaring_type(&self) -> Self::Type;

    /// The method view of a method or constructor member.
    fn as_method(&self) -> Option<Self::Method>;
}

/// The append-only set of assemblies a resolver searches.
pub trait AssemblyUniverse {
    /// Type handle produced by this universe.
    type Type: TypeIntrospection;

    /// Identities of every currently loaded assembly.
    fn loaded_assemblies(&self) -> Vec<AssemblyIdentity>;

    /// Load an assembly by simple name, preferring `version` when several are loadable.
    ///
    /// Returns the identity now loaded under that name, or `None` if none can be loaded.
    /// Loading is at most once per identity.
    fn load_assembly(&self, name: &str, version: Option<&str>) -> Option<AssemblyIdentity>;

    /// Locate a type by its qualified name.
    ///
    /// When `load_assemblies` is set, assemblies named in `qualified_name` that are not yet
    /// loaded may be loaded as a side effect. `Ok(None)` means the type does not exist.
    ///
    /// # Errors
    /// Returns an error if `qualified_name` cannot be parsed.
    fn load_type(&self, qualified_name: &str, load_assemblies: bool) -> Result<Option<Self::Type>>;
}

impl<U: AssemblyUniverse + ?Sized> AssemblyUniverse for Arc<U> {
    type Type = U::Type;

    fn loaded_assemblies(&self) -> Vec<AssemblyIdentity> {
        self.as_ref().loaded_assemblies()
    }

    fn load_assembly(&self, name: &str, version: Option<&str>) -> Option<AssemblyIdentity> {
        self.as_ref().load_assembly(name, version)
    }

    fn load_type(&self, qualified_name: &str, load_assemblies: bool) -> Result<Option<Self::Type>> {
        self.as_ref().load_type(qualified_name, load_assemblies)
    }
}
