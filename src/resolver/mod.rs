//! Caching resolution of representations to loaded runtime types.
//!
//! A [`TypeResolver`] owns its caches and borrows nothing global: construct one per universe
//! and share it (it is `Send + Sync` when the universe is). Cache entries are append-only
//! for the resolver's lifetime, so loading a new assembly version after a lookup does not
//! change that lookup's cached outcome; [`TypeResolver::clear_cache`] is provided for
//! callers that own such a reload point.
//!
//! # Resolution
//!
//! [`TypeResolver::resolve`] requires every assembly named anywhere in the representation
//! (including generic arguments) to be loaded in exactly one version. The recorded versions
//! are then passed to the universe as preferences, so a representation recorded against
//! version 1.0 still resolves when only 2.0 is loaded.
//!
//! # Examples
//!
//! ```rust
//! use dotrepr::prelude::*;
//!
//! let universe = TypeUniverse::new();
//! let corlib = Assembly::new(AssemblyIdentity::new("mscorlib", None));
//! corlib.define_type("System", "Guid");
//! universe.load(corlib);
//!
//! let resolver = TypeResolver::new(universe);
//! let strategy = AssemblyMatchStrategy::AnySingleVersion;
//! let guid = resolver.resolve_name("System.Guid, mscorlib", strategy, true)?;
//! assert!(guid.is_some());
//!
//! let missing = resolver.resolve_name("Acme.Widget, Acme", strategy, false)?;
//! assert!(missing.is_none());
//! # Ok::<(), dotrepr::Error>(())
//! ```

mod config;

pub use config::ResolverConfig;

use std::collections::{BTreeMap, BTreeSet};

use dashmap::DashMap;
use tracing::{debug, warn};

use crate::{
    reflection::{AssemblyUniverse, TypeIntrospection},
    representation::{
        codec, AssemblyMatchStrategy, MultipleMatchStrategy, TypeMatchStrategy,
        TypeRepresentation, TypeRepresentationCacheKey,
    },
    runtime::AssemblyIdentity,
    Error, Result,
};

const UNRESOLVED: &str = "Unable to resolve the specified TypeRepresentation";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ResolutionKey {
    qualified_name: String,
    strategy: AssemblyMatchStrategy,
    throw_if_unresolved: bool,
}

/// Resolves representations against an [`AssemblyUniverse`], caching every outcome.
pub struct TypeResolver<U: AssemblyUniverse> {
    universe: U,
    config: ResolverConfig,
    cache: DashMap<ResolutionKey, Option<U::Type>>,
    loaded_type_cache: DashMap<(TypeRepresentationCacheKey, bool), Option<U::Type>>,
}

impl<U: AssemblyUniverse> TypeResolver<U> {
    /// Create a resolver with [`ResolverConfig::default`]
    pub fn new(universe: U) -> Self {
        Self::with_config(universe, ResolverConfig::default())
    }

    /// Create a resolver with an explicit configuration
    pub fn with_config(universe: U, config: ResolverConfig) -> Self {
        TypeResolver {
            universe,
            config,
            cache: DashMap::new(),
            loaded_type_cache: DashMap::new(),
        }
    }

    /// The universe searched by this resolver
    pub fn universe(&self) -> &U {
        &self.universe
    }

    /// The configuration in effect
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Number of cached outcomes across both caches
    pub fn cached_entries(&self) -> usize {
        self.cache.len() + self.loaded_type_cache.len()
    }

    /// Forget every cached outcome
    pub fn clear_cache(&self) {
        self.cache.clear();
        self.loaded_type_cache.clear();
    }

    /// Parse a qualified name and resolve it, see [`TypeResolver::resolve`].
    ///
    /// # Errors
    /// Returns a parse error for malformed names, otherwise as [`TypeResolver::resolve`].
    pub fn resolve_name(
        &self,
        qualified_name: &str,
        strategy: AssemblyMatchStrategy,
        throw_if_unresolved: bool,
    ) -> Result<Option<U::Type>> {
        let representation = codec::parse(qualified_name)?;
        self.resolve(&representation, strategy, throw_if_unresolved)
    }

    /// Resolve a representation to a loaded type.
    ///
    /// With `throw_if_unresolved` unset, missing assemblies, several loaded versions of one
    /// assembly and unknown types yield `Ok(None)`.
    ///
    /// # Errors
    /// - [`Error::NotSupported`] for any strategy other than
    ///   [`AssemblyMatchStrategy::AnySingleVersion`], regardless of `throw_if_unresolved`
    /// - [`Error::NotFound`] if a referenced assembly is not loaded or the type does not exist
    /// - [`Error::AmbiguousMatch`] if a referenced assembly is loaded in several versions
    pub fn resolve(
        &self,
        representation: &TypeRepresentation,
        strategy: AssemblyMatchStrategy,
        throw_if_unresolved: bool,
    ) -> Result<Option<U::Type>> {
        if strategy != AssemblyMatchStrategy::AnySingleVersion {
            return Err(Error::NotSupported(format!(
                "Assembly match strategy {strategy} is not supported"
            )));
        }

        let key = ResolutionKey {
            qualified_name: codec::build_unversioned(representation),
            strategy,
            throw_if_unresolved,
        };
        if let Some(cached) = self.cache.get(&key) {
            debug!(qualified_name = %key.qualified_name, "type resolution cache hit");
            return Ok(cached.value().clone());
        }

        debug!(qualified_name = %key.qualified_name, "type resolution cache miss");
        let outcome = self.resolve_uncached(representation, throw_if_unresolved)?;

        if self.config.cache_results {
            debug!(
                qualified_name = %key.qualified_name,
                found = outcome.is_some(),
                "storing type resolution"
            );
            let entry = self.cache.entry(key).or_insert(outcome);
            return Ok(entry.value().clone());
        }
        Ok(outcome)
    }

    fn resolve_uncached(
        &self,
        representation: &TypeRepresentation,
        throw_if_unresolved: bool,
    ) -> Result<Option<U::Type>> {
        let qualified_name = codec::build(representation);
        let referenced = referenced_assemblies(representation);

        let mut loaded = self.loaded_versions(&referenced);
        if self.config.load_assemblies && loaded.len() < referenced.len() {
            for (name, version) in &referenced {
                if !loaded.contains_key(name) {
                    self.universe.load_assembly(name, version.as_deref());
                }
            }
            loaded = self.loaded_versions(&referenced);
        }

        let missing: Vec<&str> = referenced
            .keys()
            .filter(|name| !loaded.contains_key(*name))
            .map(String::as_str)
            .collect();
        if !missing.is_empty() {
            if throw_if_unresolved {
                return Err(Error::NotFound(format!(
                    "{UNRESOLVED} ({qualified_name}). These assemblies are not loaded: {}.",
                    missing.join(", ")
                )));
            }
            return Ok(None);
        }

        let ambiguous: Vec<String> = loaded
            .iter()
            .filter(|(_, versions)| versions.len() > 1)
            .flat_map(|(name, versions)| {
                versions.iter().map(move |version| {
                    format!("{name} ({})", version.as_deref().unwrap_or("unversioned"))
                })
            })
            .collect();
        if !ambiguous.is_empty() {
            warn!(
                qualified_name = %qualified_name,
                assemblies = %ambiguous.join(", "),
                "referenced assemblies are loaded in multiple versions"
            );
            if throw_if_unresolved {
                return Err(Error::AmbiguousMatch(format!(
                    "{UNRESOLVED} ({qualified_name}). There were multiple versions of the following assemblies loaded: {}.",
                    ambiguous.join(", ")
                )));
            }
            return Ok(None);
        }

        let resolved = self
            .universe
            .load_type(&qualified_name, self.config.load_assemblies)?;
        if resolved.is_none() && throw_if_unresolved {
            return Err(Error::NotFound(format!(
                "{UNRESOLVED} ({qualified_name}). The type does not exist in the loaded assemblies."
            )));
        }
        Ok(resolved)
    }

    /// Loaded versions of each referenced assembly name that is loaded at all.
    fn loaded_versions(
        &self,
        referenced: &BTreeMap<String, Option<String>>,
    ) -> BTreeMap<String, BTreeSet<Option<String>>> {
        let mut loaded: BTreeMap<String, BTreeSet<Option<String>>> = BTreeMap::new();
        for identity in self.universe.loaded_assemblies() {
            if referenced.contains_key(&identity.name) {
                loaded
                    .entry(identity.name.clone())
                    .or_default()
                    .insert(identity.version_string());
            }
        }
        loaded
    }

    /// Resolve by searching the loaded assemblies rather than the recorded ones.
    ///
    /// Under [`TypeMatchStrategy::NamespaceAndName`] every loaded assembly is a candidate;
    /// under [`TypeMatchStrategy::AssemblyQualifiedName`] only those with the recorded
    /// simple name are. The outer type is looked up in each candidate. Under
    /// `NamespaceAndName` every generic argument is first re-qualified with the first loaded
    /// assembly defining it; under `AssemblyQualifiedName` arguments keep their recorded
    /// assemblies. Assemblies are never loaded.
    ///
    /// # Errors
    /// - [`Error::NotFound`] if nothing matches and `throw_if_unresolved` is set
    /// - [`Error::AmbiguousMatch`] if several candidates match under
    ///   [`MultipleMatchStrategy::ThrowOnMultiple`] and `throw_if_unresolved` is set
    pub fn resolve_from_loaded_types(
        &self,
        representation: &TypeRepresentation,
        type_match: TypeMatchStrategy,
        multiple_match: MultipleMatchStrategy,
        throw_if_unresolved: bool,
    ) -> Result<Option<U::Type>> {
        let key = (
            TypeRepresentationCacheKey::new(representation.clone(), type_match, multiple_match),
            throw_if_unresolved,
        );
        if let Some(cached) = self.loaded_type_cache.get(&key) {
            debug!(representation = %representation, "loaded type cache hit");
            return Ok(cached.value().clone());
        }

        let loaded = self.universe.loaded_assemblies();
        let searched = match type_match {
            TypeMatchStrategy::AssemblyQualifiedName => Some(representation.clone()),
            TypeMatchStrategy::NamespaceAndName => {
                self.requalify_arguments(representation, &loaded)?
            }
        };

        let mut matches: Vec<(AssemblyIdentity, U::Type)> = Vec::new();
        if let Some(searched) = &searched {
            for identity in &loaded {
                if type_match == TypeMatchStrategy::AssemblyQualifiedName
                    && identity.name != representation.assembly_name()
                {
                    continue;
                }

                if let Some(located) = self.locate_in(searched, identity)? {
                    matches.push((identity.clone(), located));
                }
            }
        }

        let outcome = match matches.len() {
            0 if throw_if_unresolved => {
                return Err(Error::NotFound(format!(
                    "{UNRESOLVED} ({representation}) from the loaded types using {type_match}."
                )));
            }
            0 => None,
            1 => matches.pop().map(|(_, located)| located),
            _ => match multiple_match {
                MultipleMatchStrategy::ThrowOnMultiple if throw_if_unresolved => {
                    let names: Vec<String> = matches
                        .iter()
                        .map(|(identity, _)| identity.display_name())
                        .collect();
                    return Err(Error::AmbiguousMatch(format!(
                        "{UNRESOLVED} ({representation}). It matched loaded types in multiple assemblies: {}.",
                        names.join("; ")
                    )));
                }
                MultipleMatchStrategy::ThrowOnMultiple => None,
                MultipleMatchStrategy::FirstMatch => {
                    matches.into_iter().next().map(|(_, located)| located)
                }
                MultipleMatchStrategy::NewestVersion => matches
                    .into_iter()
                    .max_by_key(|(identity, _)| identity.version)
                    .map(|(_, located)| located),
                MultipleMatchStrategy::OldestVersion => matches
                    .into_iter()
                    .min_by_key(|(identity, _)| identity.version)
                    .map(|(_, located)| located),
            },
        };

        if self.config.cache_results {
            let entry = self.loaded_type_cache.entry(key).or_insert(outcome);
            return Ok(entry.value().clone());
        }
        Ok(outcome)
    }

    /// Look `representation` up in one loaded assembly, re-qualifying only the outer type.
    fn locate_in(
        &self,
        representation: &TypeRepresentation,
        identity: &AssemblyIdentity,
    ) -> Result<Option<U::Type>> {
        let requalified = representation
            .with_assembly_name(identity.name.as_str())?
            .with_assembly_version(identity.version_string().as_deref())?;
        let located = self
            .universe
            .load_type(&codec::build(&requalified), false)?
            .filter(|located| {
                located.assembly_name() == identity.name
                    && located.assembly_version() == identity.version_string()
            });
        Ok(located)
    }

    /// Re-qualify every generic argument, recursively, with the first loaded assembly that
    /// defines it by namespace and name. `None` if some argument is defined nowhere.
    fn requalify_arguments(
        &self,
        representation: &TypeRepresentation,
        loaded: &[AssemblyIdentity],
    ) -> Result<Option<TypeRepresentation>> {
        let Some(arguments) = representation.generic_arguments() else {
            return Ok(Some(representation.clone()));
        };

        let mut requalified = Vec::with_capacity(arguments.len());
        for argument in arguments {
            let Some(argument) = self.requalify_arguments(argument, loaded)? else {
                return Ok(None);
            };
            let mut found = None;
            for identity in loaded {
                if self.locate_in(&argument, identity)?.is_some() {
                    found = Some(
                        argument
                            .with_assembly_name(identity.name.as_str())?
                            .with_assembly_version(identity.version_string().as_deref())?,
                    );
                    break;
                }
            }
            match found {
                Some(argument) => requalified.push(argument),
                None => return Ok(None),
            }
        }

        Ok(Some(representation.with_generic_arguments(Some(requalified))))
    }
}

/// Every assembly name in a representation tree, with the first version recorded for it.
fn referenced_assemblies(representation: &TypeRepresentation) -> BTreeMap<String, Option<String>> {
    let mut referenced = BTreeMap::new();
    collect_referenced(representation, &mut referenced);
    referenced
}

fn collect_referenced(
    representation: &TypeRepresentation,
    referenced: &mut BTreeMap<String, Option<String>>,
) {
    referenced
        .entry(representation.assembly_name().to_string())
        .or_insert_with(|| representation.assembly_version().map(str::to_string));
    for argument in representation.generic_arguments().into_iter().flatten() {
        collect_referenced(argument, referenced);
    }
}
