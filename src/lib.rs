// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # dotrepr
//!
//! Serializable, version-tolerant descriptions of .NET types, and the machinery to turn
//! them back into loaded types.
//!
//! A [`representation::TypeRepresentation`] records the namespace, name, assembly and
//! generic arguments of a type. It round-trips through a bit-exact textual *qualified
//! name*, serializes with `serde`, and resolves back to a runtime type through a caching
//! [`resolver::TypeResolver`] that tolerates assembly version drift. Members, methods and
//! constructors are described by their declaring type plus a textual signature hash.
//!
//! ## Features
//!
//! - **Type representations** - Generics (open and closed), arrays of any rank including
//!   jagged arrays, nested types
//! - **Qualified-name codec** - Names in the style of
//!   `System.Collections.Generic.List`1[[System.Int32, mscorlib]], mscorlib`, including names
//!   rendered by a .NET runtime
//! - **Caching resolver** - Explicit, injectable cache service with precise failure modes
//! - **Versionless comparison** - Equality and hashing that ignore assembly versions
//! - **Member re-location** - Signature hashes for fields, properties, events, methods and
//!   constructors
//! - **Pluggable runtime** - All runtime access goes through the [`reflection`] traits; the
//!   [`runtime`] module provides an in-memory implementation
//!
//! ## Quick Start
//!
//! ```rust
//! use dotrepr::prelude::*;
//!
//! let universe = TypeUniverse::new();
//! let version = AssemblyVersion::new(4, 0, 0, 0);
//! let corlib = Assembly::new(AssemblyIdentity::new("mscorlib", Some(version)));
//! corlib.define_type("System", "Int32");
//! corlib.define_generic_type("System.Collections.Generic", "List`1", &["T"]);
//! universe.load(corlib);
//!
//! let resolver = TypeResolver::new(universe);
//! let list = resolver
//!     .resolve_name(
//!         "System.Collections.Generic.List`1[[System.Int32, mscorlib]], mscorlib",
//!         AssemblyMatchStrategy::AnySingleVersion,
//!         true,
//!     )?
//!     .expect("resolved");
//!
//! let representation = list.to_representation()?;
//! assert_eq!(
//!     representation.to_string(),
//!     "System.Collections.Generic.List`1[[System.Int32, mscorlib, Version=4.0.0.0]], mscorlib, Version=4.0.0.0"
//! );
//! # Ok::<(), dotrepr::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`representation`] - Data model, codec, converter, comparers and member representations
//! - [`resolver`] - Caching type resolution and its configuration
//! - [`reflection`] - Introspection traits consumed by the layers above
//! - [`runtime`] - Reference implementation of the introspection traits
//! - [`Error`] and [`Result`] - Error handling
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result<T, Error>`](Result):
//!
//! ```rust
//! use dotrepr::{representation::codec, Error};
//!
//! match codec::parse("System.Int32") {
//!     Ok(_) => unreachable!(),
//!     Err(Error::Malformed { message, .. }) => println!("Malformed name: {}", message),
//!     Err(e) => println!("Other error: {}", e),
//! }
//! ```

#[macro_use]
pub(crate) mod error;

/// Shared functionality which is used in unit tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use dotrepr::prelude::*;
///
/// let representation: TypeRepresentation = "System.Guid, mscorlib".parse()?;
/// assert_eq!(representation.full_name(), "System.Guid");
/// # Ok::<(), dotrepr::Error>(())
/// ```
pub mod prelude;

pub mod reflection;

pub mod representation;

pub mod resolver;

pub mod runtime;

/// `dotrepr` Result type
///
/// A type alias for `std::result::Result<T, Error>` where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `dotrepr` Error type
///
/// The main error type for all operations in this crate.
pub use error::Error;
