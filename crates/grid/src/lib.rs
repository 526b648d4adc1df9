//! Fireline grid engine
//!
//! Converts between the simulated environment's hierarchical grid tokens
//! (`"D4-5-7"`) and Cartesian vectors in meters, and performs the polar
//! offset and observer-relative correction math built on that conversion.
//!
//! A grid token is a zone designator (letter + number, `"D4"`) followed by
//! zero or more refinement digits. Zone A1's northwest corner is the origin;
//! x grows east and y grows negative to the south. Each refinement digit
//! subdivides the current cell into a 3x3 block, so conversion precision
//! divides by three per level: 300 m, 100 m, 33.3 m, and so on.

#![warn(missing_docs)]

pub mod convert;
pub mod error;
pub mod offset;
pub mod vector;

pub use convert::{to_grid, to_vector, valid, ZONE_SIZE_M};
pub use error::GridError;
pub use offset::{apply_correction, offset};
pub use vector::Vector;
