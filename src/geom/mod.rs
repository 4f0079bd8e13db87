//! Shared geometric foundations: grid indexing and low-level helpers.

pub mod grid;
pub mod util;
