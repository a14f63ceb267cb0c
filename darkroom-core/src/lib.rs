//! Board-agnostic core logic for the enlarger exposure timer
//!
//! This crate contains the exposure reciprocity engine, which does not
//! depend on any hardware:
//!
//! - Q8.24 fixed-point arithmetic with log2, exp2 and sqrt
//! - Bounded carry accumulation
//! - Exposure state keeping the reciprocity law across time, lamp output,
//!   aperture and distance
//! - Timed exposure run with idle/exposing state and safelight control
//! - Lamp channel power mapping for the PWM driver
//! - Configuration and error type definitions

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod channel;
pub mod config;
pub mod error;
pub mod exposure;
pub mod fixed;
pub mod timer;

pub use channel::{ChannelDuty, ChannelPower};
pub use config::{Bounds, ExposureLimits};
pub use error::{ExposureError, TimerError};
pub use exposure::{CommandOutcome, Exposure, ExposureCommand, ExposureReading};
pub use fixed::Fix24;
pub use timer::{ExposureTimer, RunState, TimerCommand, TimerStatus};
