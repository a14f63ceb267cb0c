//! Exposure state
//!
//! Five Q8.24 quantities in log2 space, tied together by
//! `log2H = log2t - log2N² + log2Phi - log2s²`. Only `log2H` is derived;
//! the other four are each bounded by [`ExposureLimits`].
//!
//! Every mutator either redistributes a request across lamp output and
//! time (lamp output first) or refuses it, and returns the part it could
//! not honour. No mutator leaves the law broken.

use super::carry::modify_var_with_carry;
use crate::channel;
use crate::config::{Bounds, ExposureLimits};
use crate::error::ExposureError;
use crate::fixed::{exp2, log2, Fix24};

/// Rounding noise below this is treated as exactly zero (2^-13)
pub const ZAPSMALL_EPS: Fix24 = Fix24::from_raw(1 << 11);

/// Snapshot of every readout, for the display and radio collaborators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ExposureReading {
    /// log2 of total exposure
    pub log2_h: Fix24,
    /// log2 of exposure time in seconds
    pub log2_t: Fix24,
    /// log2 of lamp output fraction
    pub log2_phi: Fix24,
    /// log2 of the aperture-like divisor N
    pub log2_n: Fix24,
    /// log2 of the distance s
    pub log2_s: Fix24,
    /// Exposure time in milliseconds
    pub time_ms: u32,
    /// Lamp channel power (0-255)
    pub lamp_power: u8,
}

/// Lamp output and time after a tentative redistribution
struct Rebalance {
    log2_phi: Fix24,
    log2_t: Fix24,
}

/// Exposure state
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Exposure {
    limits: ExposureLimits,
    log2_h: Fix24,
    log2_t: Fix24,
    log2_phi: Fix24,
    log2_n2: Fix24,
    log2_s2: Fix24,
}

impl Default for Exposure {
    /// 8 s at full lamp output, log2N² = 3, log2s² = 10, default limits
    fn default() -> Self {
        let mut exposure = Self {
            limits: ExposureLimits::default(),
            log2_h: Fix24::ZERO,
            log2_t: Fix24::from_int(3),
            log2_phi: Fix24::ZERO,
            log2_n2: Fix24::from_int(3),
            log2_s2: Fix24::from_int(10),
        };
        exposure.log2_h = exposure.derive_log2_h();
        exposure
    }
}

impl Exposure {
    /// Create an exposure state from log2-domain values
    ///
    /// Validates the limits and that each base quantity lies within its
    /// bounds; `log2H` is derived from the other four.
    pub fn new(
        limits: ExposureLimits,
        log2_t: Fix24,
        log2_phi: Fix24,
        log2_n2: Fix24,
        log2_s2: Fix24,
    ) -> Result<Self, ExposureError> {
        limits.validate()?;

        if !limits.log2_t.contains(log2_t) {
            return Err(ExposureError::TimeOutOfRange);
        }
        if !limits.log2_phi.contains(log2_phi) {
            return Err(ExposureError::OutputOutOfRange);
        }
        if !limits.log2_n2.contains(log2_n2) {
            return Err(ExposureError::ApertureOutOfRange);
        }
        if !limits.log2_s2.contains(log2_s2) {
            return Err(ExposureError::DistanceOutOfRange);
        }

        let mut exposure = Self {
            limits,
            log2_h: Fix24::ZERO,
            log2_t,
            log2_phi,
            log2_n2,
            log2_s2,
        };
        exposure.log2_h = exposure.derive_log2_h();
        Ok(exposure)
    }

    /// Create an exposure state from linear settings
    ///
    /// Time in seconds, aperture-like divisor N and distance s. The lamp
    /// starts at its maximum output.
    pub fn from_settings(
        limits: ExposureLimits,
        t_seconds: Fix24,
        n: Fix24,
        s: Fix24,
    ) -> Result<Self, ExposureError> {
        if t_seconds <= Fix24::ZERO {
            return Err(ExposureError::TimeOutOfRange);
        }
        if n <= Fix24::ZERO {
            return Err(ExposureError::ApertureOutOfRange);
        }
        if s <= Fix24::ZERO {
            return Err(ExposureError::DistanceOutOfRange);
        }

        Self::new(
            limits,
            log2(t_seconds),
            limits.log2_phi.max,
            log2_squared(n),
            log2_squared(s),
        )
    }

    /// log2H from the four base quantities
    fn derive_log2_h(&self) -> Fix24 {
        self.log2_t - self.log2_n2 + self.log2_phi - self.log2_s2
    }

    /// Change total exposure, holding N and s
    ///
    /// The change goes into lamp output first; whatever does not fit
    /// spills into time. Returns what fitted into neither.
    pub fn change_log2_h(&mut self, delta: Fix24) -> Fix24 {
        let carry = modify_var_with_carry(&mut self.log2_phi, delta, self.limits.log2_phi);
        let carry = modify_var_with_carry(&mut self.log2_t, carry, self.limits.log2_t);

        self.log2_h = self.derive_log2_h();

        carry
    }

    /// Change exposure time, holding total exposure
    ///
    /// A longer time needs proportionally less light, so lamp output moves
    /// the opposite way. The request is limited first by the time bounds,
    /// then by how far lamp output can follow. Returns the unhonoured part
    /// in log2 time units.
    pub fn change_log2_t(&mut self, delta: Fix24) -> Fix24 {
        let mut scratch_t = self.log2_t;
        let time_carry = modify_var_with_carry(&mut scratch_t, delta, self.limits.log2_t);
        let accepted = delta - time_carry;

        let output_carry =
            -modify_var_with_carry(&mut self.log2_phi, -accepted, self.limits.log2_phi);

        self.log2_t = self.log2_h + self.log2_n2 - self.log2_phi + self.log2_s2;

        time_carry + output_carry
    }

    /// Change exposure time by a linear amount in seconds, holding total exposure
    ///
    /// Returns the change actually made (new time - old time), which may
    /// differ from `delta` through clamping and quantization.
    pub fn change_t(&mut self, delta: Fix24) -> Fix24 {
        if delta.is_zero() {
            return Fix24::ZERO;
        }

        let original = exp2(self.log2_t);
        // Limit the request to the headroom before adding, so a large delta
        // cannot wrap past the Q8.24 range and flip direction
        let delta = delta.clamp(
            exp2(self.limits.log2_t.min) - original,
            exp2(self.limits.log2_t.max) - original,
        );
        let target = original + delta;

        self.change_log2_t(log2(target) - self.log2_t);

        (exp2(self.log2_t) - original).zapsmall(ZAPSMALL_EPS)
    }

    /// Change exposure time by a number of milliseconds
    ///
    /// Returns the change actually made, in milliseconds.
    pub fn change_t_millis(&mut self, delta_ms: i32) -> i32 {
        self.change_t(Fix24::from_millis(delta_ms)).to_millis()
    }

    /// Set the aperture-like divisor N, holding total exposure
    ///
    /// All or nothing: returns zero and commits if lamp output and time
    /// can absorb the change, otherwise changes nothing and returns the
    /// unabsorbed part.
    ///
    /// A residue below [`ZAPSMALL_EPS`] still commits, so total exposure
    /// may move by less than 2^-13 stop per call.
    pub fn set_n(&mut self, new_n: Fix24) -> Fix24 {
        match self.plan_attenuation(self.log2_n2, new_n, self.limits.log2_n2) {
            Ok((log2_n2, rebalance)) => {
                self.commit(rebalance);
                self.log2_n2 = log2_n2;
                self.refresh_log2_h();
                Fix24::ZERO
            }
            Err(carry) => carry,
        }
    }

    /// Set the distance s, holding total exposure
    ///
    /// Same all-or-nothing contract as [`Exposure::set_n`].
    pub fn set_s(&mut self, new_s: Fix24) -> Fix24 {
        match self.plan_attenuation(self.log2_s2, new_s, self.limits.log2_s2) {
            Ok((log2_s2, rebalance)) => {
                self.commit(rebalance);
                self.log2_s2 = log2_s2;
                self.refresh_log2_h();
                Fix24::ZERO
            }
            Err(carry) => carry,
        }
    }

    /// Work out a new squared attenuation on scratch copies
    ///
    /// H = t - N² + Phi - s², so raising either squared term by d needs
    /// Phi + t to rise by d. Nothing in `self` is touched; on failure the
    /// non-zero carry is returned.
    fn plan_attenuation(
        &self,
        current: Fix24,
        new_value: Fix24,
        bounds: Bounds,
    ) -> Result<(Fix24, Rebalance), Fix24> {
        debug_assert!(new_value > Fix24::ZERO, "attenuation setpoint must be positive");
        if new_value <= Fix24::ZERO {
            return Err(Fix24::MIN);
        }

        let target = bounds.snap(log2_squared(new_value), ZAPSMALL_EPS);
        if target < bounds.min {
            return Err(target - bounds.min);
        }
        if target > bounds.max {
            return Err(target - bounds.max);
        }

        let mut rebalance = Rebalance {
            log2_phi: self.log2_phi,
            log2_t: self.log2_t,
        };
        let carry = modify_var_with_carry(
            &mut rebalance.log2_phi,
            target - current,
            self.limits.log2_phi,
        );
        let carry = modify_var_with_carry(&mut rebalance.log2_t, carry, self.limits.log2_t);
        let carry = carry.zapsmall(ZAPSMALL_EPS);

        if carry.is_zero() {
            Ok((target, rebalance))
        } else {
            Err(carry)
        }
    }

    fn commit(&mut self, rebalance: Rebalance) {
        self.log2_phi = rebalance.log2_phi;
        self.log2_t = rebalance.log2_t;
    }

    /// Re-derive H after a setpoint change that should have preserved it
    fn refresh_log2_h(&mut self) {
        let log2_h = self.derive_log2_h();
        debug_assert!(
            (log2_h - self.log2_h).zapsmall(ZAPSMALL_EPS).is_zero(),
            "setpoint change moved total exposure"
        );
        self.log2_h = log2_h;
    }

    /// Get log2 of total exposure
    pub fn log2_h(&self) -> Fix24 {
        self.log2_h
    }

    /// Get log2 of exposure time in seconds
    pub fn log2_t(&self) -> Fix24 {
        self.log2_t
    }

    /// Get log2 of lamp output fraction
    pub fn log2_phi(&self) -> Fix24 {
        self.log2_phi
    }

    /// Get log2 of the aperture-like divisor N
    pub fn log2_n(&self) -> Fix24 {
        Fix24::from_raw(self.log2_n2.raw() >> 1)
    }

    /// Get log2 of the distance s
    pub fn log2_s(&self) -> Fix24 {
        Fix24::from_raw(self.log2_s2.raw() >> 1)
    }

    /// Get log2(N²) as stored
    pub fn log2_n2(&self) -> Fix24 {
        self.log2_n2
    }

    /// Get log2(s²) as stored
    pub fn log2_s2(&self) -> Fix24 {
        self.log2_s2
    }

    /// Get the limits in force
    pub fn limits(&self) -> &ExposureLimits {
        &self.limits
    }

    /// Get exposure time in seconds
    pub fn t_seconds(&self) -> Fix24 {
        exp2(self.log2_t)
    }

    /// Get exposure time in milliseconds
    pub fn t_millis(&self) -> u32 {
        self.t_seconds().to_millis().max(0) as u32
    }

    /// Get lamp output as a fraction of full power
    pub fn phi(&self) -> Fix24 {
        exp2(self.log2_phi)
    }

    /// Get the aperture-like divisor N
    pub fn n(&self) -> Fix24 {
        exp2(self.log2_n())
    }

    /// Get lamp channel power (0-255) for the PWM driver
    pub fn lamp_power(&self) -> u8 {
        channel::lamp_power(self.log2_phi)
    }

    /// Get lamp PWM compare value for a counter period of `top`
    pub fn lamp_duty(&self, top: u16) -> u16 {
        channel::lamp_duty(self.log2_phi, top)
    }

    /// How far the stored log2H is from the reciprocity law
    ///
    /// Zero for every state reachable through the public API.
    pub fn discrepancy(&self) -> Fix24 {
        self.derive_log2_h() - self.log2_h
    }

    /// Take a snapshot of every readout
    pub fn reading(&self) -> ExposureReading {
        ExposureReading {
            log2_h: self.log2_h,
            log2_t: self.log2_t,
            log2_phi: self.log2_phi,
            log2_n: self.log2_n(),
            log2_s: self.log2_s(),
            time_ms: self.t_millis(),
            lamp_power: self.lamp_power(),
        }
    }
}

/// log2(x²) = 2·log2(x)
fn log2_squared(x: Fix24) -> Fix24 {
    let y = log2(x);
    y + y
}
