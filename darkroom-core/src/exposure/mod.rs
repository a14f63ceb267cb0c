//! Exposure reciprocity engine
//!
//! Keeps the photographic exposure law
//!
//! ```text
//! log2H = log2t - log2N² + log2Phi - log2s²
//! ```
//!
//! true while the user changes one quantity at a time. Requests that run
//! into a bound are redistributed (lamp output first, then time) or
//! refused, and whatever could not be honoured is returned as a carry.

pub mod carry;
pub mod command;
pub mod state;

pub use carry::modify_var_with_carry;
pub use command::{CommandOutcome, ExposureCommand};
pub use state::{Exposure, ExposureReading, ZAPSMALL_EPS};
