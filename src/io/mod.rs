//! Structure input.
//!
//! Reads periodic structures from the JSON document layout used by common
//! materials toolkits: a lattice matrix plus a site list with fractional
//! coordinates and per-species occupancies. Unrecognized document fields
//! are ignored.

mod error;
mod json;

pub use error::Error;
pub use json::{parse_structure, read_structure};
