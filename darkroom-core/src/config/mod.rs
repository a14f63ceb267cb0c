//! Configuration types
//!
//! Board-agnostic limits for the exposure engine. Loading and persisting
//! them belongs to the firmware; the types derive serde behind the `serde`
//! feature so any loader can produce them.

pub mod limits;

pub use limits::*;
