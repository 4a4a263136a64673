//! Parse and validate Docker-style container image references
//!
//! A reference names an image as `registry:5000/namespace/name:tag@digest`.
//! [Reference::parse] accepts exactly the strings allowed by the Docker
//! distribution reference grammar and splits them into their parts, without
//! filling in any defaults. [Digest::parse] validates a digest on its own.
//!
//! ```
//! use image_reference::{errors::ReferenceError, Reference};
//!
//! let reference: Reference = "registry.local:5000/team/app:v2".parse().unwrap();
//! assert_eq!(reference.split_hostname(), ("registry.local:5000", "team/app"));
//! assert_eq!(reference.tag(), Some("v2"));
//! assert_eq!(reference.digest(), None);
//!
//! assert_eq!(Reference::parse(""), Err(ReferenceError::NameEmpty));
//! ```

#[macro_use] extern crate lazy_static;

pub mod errors;
pub mod image;

pub use crate::image::{Algorithm, Digest, Reference};
