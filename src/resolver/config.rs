//! Resolver configuration
//!
//! Controls the side effects a [`crate::resolver::TypeResolver`] may have on its universe
//! and whether outcomes are remembered.

/// Configuration for type resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Allow assemblies named by a representation to be loaded by name when not yet loaded.
    /// An assembly is reported missing only if it is neither loaded nor loadable.
    pub load_assemblies: bool,

    /// Store resolution outcomes, including "not found", for the resolver's lifetime
    pub cache_results: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            load_assemblies: true,
            cache_results: true,
        }
    }
}

impl ResolverConfig {
    /// Creates a configuration without side effects or memory
    ///
    /// Every call searches the loaded assemblies afresh and never loads new ones.
    #[must_use]
    pub fn minimal() -> Self {
        Self {
            load_assemblies: false,
            cache_results: false,
        }
    }

    /// Creates a configuration that resolves only against already loaded assemblies
    ///
    /// Outcomes are cached.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            load_assemblies: false,
            cache_results: true,
        }
    }
}
