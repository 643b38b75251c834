//! Test factories shared by unit tests.

mod universe;

pub use universe::*;
