//! Error types
//!
//! Construction and configuration can fail, and the timer refuses requests
//! that do not fit its run state. Exposure mutators report what they could
//! not honour as a carry value instead.

/// Errors raised when building an exposure state or validating limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ExposureError {
    /// A bound has min > max, or a bound leaves the representable range
    InvalidLimits,
    /// Exposure time outside its bounds (or not positive)
    TimeOutOfRange,
    /// Lamp output outside its bounds
    OutputOutOfRange,
    /// Aperture-like divisor N outside its bounds (or not positive)
    ApertureOutOfRange,
    /// Distance s outside its bounds (or not positive)
    DistanceOutOfRange,
}

/// Requests the exposure timer refuses in its current state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerError {
    /// Start requested while an exposure is already running
    AlreadyExposing,
    /// Stop requested with no exposure running
    NotExposing,
    /// Settings cannot change while the lamp is lit
    SettingsLocked,
}
