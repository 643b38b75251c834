//! Shared test fixtures.
//!
//! - [`factories`] - Sample assemblies and universes built on the reference runtime

pub mod factories;
