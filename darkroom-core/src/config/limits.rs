//! Exposure limit definitions
//!
//! Every bounded quantity lives in the log2 domain. One unit is one stop.

use crate::error::ExposureError;
use crate::fixed::Fix24;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Largest log2 magnitude whose linear value is representable in Q8.24
const LINEAR_LIMIT: Fix24 = Fix24::from_int(7);

/// Closed interval [min, max]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Bounds {
    /// Lower bound (inclusive)
    pub min: Fix24,
    /// Upper bound (inclusive)
    pub max: Fix24,
}

impl Bounds {
    /// Create bounds from scaled integers (value × 1000)
    pub const fn from_scaled_1000(min_x1000: i32, max_x1000: i32) -> Self {
        Self {
            min: Fix24::from_scaled_1000(min_x1000),
            max: Fix24::from_scaled_1000(max_x1000),
        }
    }

    /// Check if `x` lies within the bounds
    pub fn contains(&self, x: Fix24) -> bool {
        x >= self.min && x <= self.max
    }

    /// Check that min does not exceed max
    pub fn is_valid(&self) -> bool {
        self.min <= self.max
    }

    /// Room left above `x` before hitting max
    pub fn headroom_up(&self, x: Fix24) -> Fix24 {
        self.max - x
    }

    /// Room left below `x` before hitting min
    pub fn headroom_down(&self, x: Fix24) -> Fix24 {
        x - self.min
    }

    /// Snap `x` onto a bound it lies within `eps` of
    pub fn snap(&self, x: Fix24, eps: Fix24) -> Fix24 {
        if (x - self.min).abs() < eps {
            self.min
        } else if (x - self.max).abs() < eps {
            self.max
        } else {
            x
        }
    }
}

/// Default exposure time bounds: 4 s to 32 s
pub const DEFAULT_LOG2_T: Bounds = Bounds::from_scaled_1000(2_000, 5_000);

/// Default lamp output bounds: 1/32 to full output
pub const DEFAULT_LOG2_PHI: Bounds = Bounds::from_scaled_1000(-5_000, 0);

/// Default log2(N²) bounds: f/1.4 to f/5.6
pub const DEFAULT_LOG2_N2: Bounds = Bounds::from_scaled_1000(1_000, 5_000);

/// Default log2(s²) bounds: 16 cm to 128 cm
pub const DEFAULT_LOG2_S2: Bounds = Bounds::from_scaled_1000(8_000, 14_000);

/// Limits of every bounded exposure quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExposureLimits {
    /// log2 of exposure time in seconds
    pub log2_t: Bounds,
    /// log2 of the lamp output fraction
    pub log2_phi: Bounds,
    /// log2 of the squared aperture-like divisor N
    pub log2_n2: Bounds,
    /// log2 of the squared distance s
    pub log2_s2: Bounds,
}

impl Default for ExposureLimits {
    fn default() -> Self {
        Self {
            log2_t: DEFAULT_LOG2_T,
            log2_phi: DEFAULT_LOG2_PHI,
            log2_n2: DEFAULT_LOG2_N2,
            log2_s2: DEFAULT_LOG2_S2,
        }
    }
}

impl ExposureLimits {
    /// Validate the limits
    ///
    /// Every bound must be ordered. Exposure time and lamp output are shown
    /// in linear units, so their bounds must stay within the range where
    /// exp2 is representable; lamp output cannot exceed full power. The
    /// aperture readout takes exp2 of log2(N²)/2.
    pub fn validate(&self) -> Result<(), ExposureError> {
        let all = [self.log2_t, self.log2_phi, self.log2_n2, self.log2_s2];
        if !all.iter().all(Bounds::is_valid) {
            return Err(ExposureError::InvalidLimits);
        }

        if self.log2_t.min <= -LINEAR_LIMIT || self.log2_t.max >= LINEAR_LIMIT {
            return Err(ExposureError::InvalidLimits);
        }

        if self.log2_phi.min <= -LINEAR_LIMIT || self.log2_phi.max > Fix24::ZERO {
            return Err(ExposureError::InvalidLimits);
        }

        let n2_limit = LINEAR_LIMIT + LINEAR_LIMIT;
        if self.log2_n2.min <= -n2_limit || self.log2_n2.max >= n2_limit {
            return Err(ExposureError::InvalidLimits);
        }

        Ok(())
    }
}
