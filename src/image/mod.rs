//! Container image references and content digests


mod digest;
mod grammar;
mod reference;

pub use digest::{Algorithm, Digest};
pub use reference::{Reference, NAME_TOTAL_LENGTH_MAX};
