//! Inbound exposure requests
//!
//! The dial, touchscreen and radio collaborators express what the user
//! asked for as an [`ExposureCommand`]; the owner of the [`Exposure`]
//! applies it and reports back what could not be honoured.

use super::state::Exposure;
use crate::fixed::Fix24;

/// Realised linear time may differ from the request by table noise;
/// differences up to this much (1/256 s) still count as accepted.
const TIME_SLACK: Fix24 = Fix24::from_raw(1 << 16);

/// A requested change to the exposure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ExposureCommand {
    /// Change total exposure by this many stops (lamp output, then time)
    ChangeExposure(Fix24),
    /// Change exposure time by this many stops, holding total exposure
    ChangeLog2Time(Fix24),
    /// Change exposure time by this many seconds, holding total exposure
    ChangeTime(Fix24),
    /// Change exposure time by this many milliseconds, holding total exposure
    ChangeTimeMillis(i32),
    /// Set the aperture-like divisor N, holding total exposure
    SetAperture(Fix24),
    /// Set the distance s, holding total exposure
    SetDistance(Fix24),
}

/// Result of applying a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CommandOutcome {
    /// Part of the request that was not honoured, in the command's units
    pub carry: Fix24,
    /// Whether the request was honoured in full
    pub accepted: bool,
}

impl CommandOutcome {
    fn from_carry(carry: Fix24) -> Self {
        Self {
            carry,
            accepted: carry.is_zero(),
        }
    }

    fn from_realised(requested: Fix24, realised: Fix24) -> Self {
        let carry = requested - realised;
        Self {
            carry,
            accepted: carry.abs() <= TIME_SLACK,
        }
    }
}

impl Exposure {
    /// Apply a command through the matching mutator
    pub fn apply(&mut self, command: ExposureCommand) -> CommandOutcome {
        match command {
            ExposureCommand::ChangeExposure(delta) => {
                CommandOutcome::from_carry(self.change_log2_h(delta))
            }
            ExposureCommand::ChangeLog2Time(delta) => {
                CommandOutcome::from_carry(self.change_log2_t(delta))
            }
            ExposureCommand::ChangeTime(delta) => {
                let realised = self.change_t(delta);
                CommandOutcome::from_realised(delta, realised)
            }
            ExposureCommand::ChangeTimeMillis(delta_ms) => {
                let realised_ms = self.change_t_millis(delta_ms);
                CommandOutcome::from_realised(
                    Fix24::from_millis(delta_ms),
                    Fix24::from_millis(realised_ms),
                )
            }
            ExposureCommand::SetAperture(n) => CommandOutcome::from_carry(self.set_n(n)),
            ExposureCommand::SetDistance(s) => CommandOutcome::from_carry(self.set_s(s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_change_exposure() {
        let mut e = Exposure::default();
        let outcome = e.apply(ExposureCommand::ChangeExposure(-Fix24::ONE));
        assert!(outcome.accepted);
        assert_eq!(outcome.carry, Fix24::ZERO);
        assert_eq!(e.log2_phi(), -Fix24::ONE);
    }

    #[test]
    fn test_apply_change_log2_time_partial() {
        let mut e = Exposure::default();
        let outcome = e.apply(ExposureCommand::ChangeLog2Time(Fix24::from_int(3)));
        assert!(!outcome.accepted);
        assert_eq!(outcome.carry, Fix24::ONE);
        assert_eq!(e.log2_t(), Fix24::from_int(5));
    }

    #[test]
    fn test_apply_change_time() {
        let mut e = Exposure::default();
        let outcome = e.apply(ExposureCommand::ChangeTime(Fix24::from_int(4)));
        assert!(outcome.accepted);
        assert!((e.t_seconds() - Fix24::from_int(12)).abs() < Fix24::from_f64(0.01));
    }

    #[test]
    fn test_apply_change_time_millis_refused() {
        let mut e = Exposure::default();
        // Lamp at full output: time cannot shrink
        let outcome = e.apply(ExposureCommand::ChangeTimeMillis(-2_000));
        assert!(!outcome.accepted);
        assert_eq!(outcome.carry, Fix24::from_int(-2));
        assert_eq!(e.t_millis(), 8_000);
    }

    #[test]
    fn test_apply_change_time_millis_saturates() {
        let limits = crate::ExposureLimits::default();
        let mut e = Exposure::new(
            limits,
            Fix24::from_int(3),
            Fix24::from_int(-2),
            Fix24::from_int(3),
            Fix24::from_int(10),
        )
        .unwrap();
        let outcome = e.apply(ExposureCommand::ChangeTimeMillis(200_000));
        assert!(!outcome.accepted);
        assert!(outcome.carry > Fix24::ZERO);
        assert!((e.t_millis() as i32 - 32_000).abs() <= 50);
    }

    #[test]
    fn test_apply_setpoints() {
        let mut e = Exposure::default();
        let outcome = e.apply(ExposureCommand::SetAperture(Fix24::TWO));
        assert!(outcome.accepted);
        assert_eq!(e.log2_n2(), Fix24::TWO);

        let outcome = e.apply(ExposureCommand::SetDistance(Fix24::from_int(20)));
        assert!(outcome.accepted);
        assert_eq!(e.discrepancy(), Fix24::ZERO);

        let before = e.clone();
        let outcome = e.apply(ExposureCommand::SetDistance(Fix24::from_int(8)));
        assert!(!outcome.accepted);
        assert_eq!(e, before);
    }
}
