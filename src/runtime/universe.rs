//! Loaded assemblies of the reference runtime.
//!
//! A [`TypeUniverse`] holds two sets of assemblies: those already loaded, and a catalog of
//! assemblies that can be loaded on demand by name. Loading moves an assembly from the
//! catalog into the loaded set at most once; the loaded set only ever grows.
//!
//! # Examples
//!
//! ```rust
//! use dotrepr::reflection::{AssemblyUniverse, TypeIntrospection};
//! use dotrepr::runtime::{Assembly, AssemblyIdentity, AssemblyVersion, TypeUniverse};
//!
//! let universe = TypeUniverse::new();
//! let version = AssemblyVersion::new(4, 0, 0, 0);
//! let corlib = Assembly::new(AssemblyIdentity::new("mscorlib", Some(version)));
//! corlib.define_type("System", "Int32");
//! universe.load(corlib);
//!
//! let int32 = universe.load_type("System.Int32, mscorlib", false)?.unwrap();
//! assert_eq!(int32.full_name().as_deref(), Some("System.Int32"));
//! # Ok::<(), dotrepr::Error>(())
//! ```

use std::sync::Arc;

use dashmap::{mapref::entry::Entry, DashMap};
use tracing::debug;

use crate::{
    reflection::AssemblyUniverse,
    representation::{codec, TypeRepresentation},
    runtime::{
        members::MemberDefinition, AssemblyIdentity, RuntimeType, TypeDefinition,
        TypeDefinitionRc,
    },
    Result,
};

/// Reference to an `Assembly`
pub type AssemblyRc = Arc<Assembly>;

/// An assembly and the types it defines.
pub struct Assembly {
    /// Identity of the assembly
    pub identity: AssemblyIdentity,
    types: boxcar::Vec<TypeDefinitionRc>,
}

impl Assembly {
    /// Create an empty assembly
    #[must_use]
    pub fn new(identity: AssemblyIdentity) -> Self {
        Assembly {
            identity,
            types: boxcar::Vec::new(),
        }
    }

    /// Define a non-generic top-level type
    pub fn define_type(&self, namespace: &str, name: &str) -> TypeDefinitionRc {
        self.define_generic_type(namespace, name, &[])
    }

    /// Define a top-level type with generic parameters. `name` carries the arity marker.
    pub fn define_generic_type(
        &self,
        namespace: &str,
        name: &str,
        generic_parameters: &[&str],
    ) -> TypeDefinitionRc {
        self.push(TypeDefinition::new(
            namespace,
            name,
            self.identity.clone(),
            None,
            generic_parameters.iter().map(|p| p.to_string()).collect(),
        ))
    }

    /// Define a type nested in `declaring`, recorded as a nested-type member of it
    pub fn define_nested_type(&self, declaring: &TypeDefinitionRc, name: &str) -> TypeDefinitionRc {
        let nested = self.push(TypeDefinition::new(
            declaring.namespace.clone(),
            name,
            self.identity.clone(),
            Some(declaring.clone()),
            Vec::new(),
        ));
        declaring.add_member(Arc::new(MemberDefinition::nested_type(
            name,
            RuntimeType::Definition(nested.clone()),
        )));
        nested
    }

    fn push(&self, definition: TypeDefinition) -> TypeDefinitionRc {
        let definition = Arc::new(definition);
        self.types.push(definition.clone());
        definition
    }

    /// Every type defined so far, in definition order
    pub fn types(&self) -> impl Iterator<Item = &TypeDefinitionRc> {
        self.types.iter().map(|(_, definition)| definition)
    }

    /// Find a type by namespace and `+`-joined nested name
    #[must_use]
    pub fn find_type(&self, namespace: &str, nested_name: &str) -> Option<TypeDefinitionRc> {
        self.types()
            .find(|definition| {
                definition.namespace == namespace && definition.nested_name() == nested_name
            })
            .cloned()
    }
}

/// The loaded and loadable assemblies of a process.
#[derive(Default)]
pub struct TypeUniverse {
    loaded: DashMap<AssemblyIdentity, AssemblyRc>,
    load_order: boxcar::Vec<AssemblyRc>,
    catalog: DashMap<AssemblyIdentity, AssemblyRc>,
}

impl TypeUniverse {
    /// Create an empty universe
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an assembly to the loaded set.
    ///
    /// If an assembly with the same identity is already loaded, that one is kept and
    /// returned.
    pub fn load(&self, assembly: Assembly) -> AssemblyRc {
        self.load_shared(Arc::new(assembly))
    }

    fn load_shared(&self, assembly: AssemblyRc) -> AssemblyRc {
        match self.loaded.entry(assembly.identity.clone()) {
            Entry::Occupied(existing) => existing.get().clone(),
            Entry::Vacant(slot) => {
                debug!(assembly = %assembly.identity.display_name(), "loading assembly");
                self.load_order.push(assembly.clone());
                slot.insert(assembly.clone());
                assembly
            }
        }
    }

    /// Make an assembly loadable by name without loading it
    pub fn register(&self, assembly: Assembly) {
        self.catalog
            .insert(assembly.identity.clone(), Arc::new(assembly));
    }

    /// Loaded assemblies, in load order
    #[must_use]
    pub fn assemblies(&self) -> Vec<AssemblyRc> {
        self.load_order
            .iter()
            .map(|(_, assembly)| assembly.clone())
            .collect()
    }

    /// Find a loaded assembly by name.
    ///
    /// `version` is a preference: an exact match wins, otherwise the highest loaded version
    /// of that name is returned.
    #[must_use]
    pub fn find_assembly(&self, name: &str, version: Option<&str>) -> Option<AssemblyRc> {
        Self::select(
            self.loaded.iter().map(|entry| entry.value().clone()),
            name,
            version,
        )
    }

    /// Find a loaded assembly, loading it from the catalog if none is loaded
    pub fn load_by_name(&self, name: &str, version: Option<&str>) -> Option<AssemblyRc> {
        if let Some(loaded) = self.find_assembly(name, version) {
            return Some(loaded);
        }

        let candidate = Self::select(
            self.catalog.iter().map(|entry| entry.value().clone()),
            name,
            version,
        )?;
        Some(self.load_shared(candidate))
    }

    fn select(
        assemblies: impl Iterator<Item = AssemblyRc>,
        name: &str,
        version: Option<&str>,
    ) -> Option<AssemblyRc> {
        let candidates: Vec<AssemblyRc> = assemblies
            .filter(|assembly| assembly.identity.name == name)
            .collect();

        candidates
            .iter()
            .find(|assembly| version.is_some() && assembly.identity.satisfies(name, version))
            .or_else(|| {
                candidates
                    .iter()
                    .max_by_key(|assembly| assembly.identity.version)
            })
            .cloned()
    }

    /// Resolve a representation to a runtime type
    pub fn locate(
        &self,
        representation: &TypeRepresentation,
        load_assemblies: bool,
    ) -> Option<RuntimeType> {
        let name = representation.assembly_name();
        let version = representation.assembly_version();
        let assembly = if load_assemblies {
            self.load_by_name(name, version)
        } else {
            self.find_assembly(name, version)
        }?;

        let (base_name, ranks) = codec::array_ranks(representation.name());
        let definition = assembly.find_type(representation.namespace(), base_name)?;
        let mut located = RuntimeType::Definition(definition);

        if let Some(arguments) = representation.generic_arguments() {
            if !arguments.is_empty() {
                let arguments = arguments
                    .iter()
                    .map(|argument| self.locate(argument, load_assemblies))
                    .collect::<Option<Vec<_>>>()?;
                located = located.make_generic_type(arguments).ok()?;
            }
        }

        for rank in ranks {
            located = located.make_array_type(rank);
        }
        Some(located)
    }
}

impl AssemblyUniverse for TypeUniverse {
    type Type = RuntimeType;

    fn loaded_assemblies(&self) -> Vec<AssemblyIdentity> {
        self.load_order
            .iter()
            .map(|(_, assembly)| assembly.identity.clone())
            .collect()
    }

    fn load_assembly(&self, name: &str, version: Option<&str>) -> Option<AssemblyIdentity> {
        self.load_by_name(name, version)
            .map(|assembly| assembly.identity.clone())
    }

    fn load_type(
        &self,
        qualified_name: &str,
        load_assemblies: bool,
    ) -> Result<Option<RuntimeType>> {
        let representation = codec::parse(qualified_name)?;
        Ok(self.locate(&representation, load_assemblies))
    }
}
