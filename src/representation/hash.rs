//! Order-sensitive hashing of type representations.
//!
//! [`RepresentationHash`] folds the components of a representation into a 64-bit value with
//! FNV-1a inspired sequential mixing. Unlike XOR-based combination, the mixing preserves
//! order, so `Dictionary<int, string>` and `Dictionary<string, int>` hash differently, and
//! repeated components do not cancel out.
//!
//! # Example Usage
//!
//! ```rust
//! use dotrepr::representation::RepresentationHash;
//!
//! let hash = RepresentationHash::new()
//!     .add_fullname("System.Collections.Generic", "List`1")
//!     .add_assembly("mscorlib", None)
//!     .finalize();
//! # let _ = hash;
//! ```

use std::hash::{DefaultHasher, Hash, Hasher};

use crate::representation::TypeRepresentation;

/// Hash builder for type representations using FNV-1a inspired mixing.
pub struct RepresentationHash {
    /// Current hash state using FNV-1a algorithm principles
    state: u64,
}

impl RepresentationHash {
    /// Create a new hash builder
    ///
    /// Initializes with FNV-1a offset basis for good hash distribution
    #[must_use]
    pub fn new() -> Self {
        RepresentationHash {
            state: 0xcbf2_9ce4_8422_2325_u64, // FNV-1a 64-bit offset basis
        }
    }

    /// Mix a 64-bit value into the hash state with additional avalanche rounds
    fn mix(&mut self, value: u64) {
        self.state ^= value;
        self.state = self.state.wrapping_mul(0x0100_0000_01b3_u64); // FNV-1a 64-bit prime

        self.state ^= self.state >> 33;
        self.state = self.state.wrapping_mul(0xff51_afd7_ed55_8ccd_u64);
        self.state ^= self.state >> 33;
    }

    /// Add a hashable component
    ///
    /// ## Arguments
    /// * `component` - Any hashable component to include
    #[must_use]
    pub fn add_component<T: Hash + ?Sized>(mut self, component: &T) -> Self {
        let mut hasher = DefaultHasher::new();
        component.hash(&mut hasher);
        self.mix(hasher.finish());
        self
    }

    /// Add namespace and name
    #[must_use]
    pub fn add_fullname(self, namespace: &str, name: &str) -> Self {
        self.add_component(namespace).add_component(name)
    }

    /// Add assembly simple name and optional version
    #[must_use]
    pub fn add_assembly(self, name: &str, version: Option<&str>) -> Self {
        self.add_component(name).add_component(&version)
    }

    /// Add a whole representation, recursing into its generic arguments
    ///
    /// `None` and empty generic argument lists contribute different markers, matching
    /// [`TypeRepresentation`] equality.
    #[must_use]
    pub fn add_representation(self, representation: &TypeRepresentation) -> Self {
        let mut hash = self
            .add_fullname(representation.namespace(), representation.name())
            .add_assembly(
                representation.assembly_name(),
                representation.assembly_version(),
            );

        match representation.generic_arguments() {
            None => hash.add_component(&u8::MAX),
            Some(arguments) => {
                hash = hash.add_component(&arguments.len());
                for argument in arguments {
                    hash = hash.add_representation(argument);
                }
                hash
            }
        }
    }

    /// Finalize the hash and return the computed value
    #[must_use]
    pub fn finalize(self) -> u64 {
        self.state
    }
}

impl Default for RepresentationHash {
    fn default() -> Self {
        Self::new()
    }
}
