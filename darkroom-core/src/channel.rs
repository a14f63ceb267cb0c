//! Lamp channel power mapping
//!
//! The lamp head has three channels. Red is the safelight; green and blue
//! expose the paper and run together at the engine's lamp output.
//!
//! The lamp driver takes a linear output setting. log2Phi spans
//! [-5, 0] by default, so the lamp runs between 1/32 and full power:
//! 8..=255 as an 8-bit channel power, 2048..=65535 as a 16-bit PWM
//! compare value.

use crate::fixed::{exp2, Fix24};

/// Full-scale 8-bit channel power
pub const CHANNEL_POWER_MAX: u8 = 255;

/// Red channel power while the safelight is on
pub const SAFELIGHT_POWER: u8 = CHANNEL_POWER_MAX;

/// 8-bit power of each lamp channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelPower {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl ChannelPower {
    /// Every channel dark
    pub const OFF: Self = Self {
        red: 0,
        green: 0,
        blue: 0,
    };
}

/// PWM compare value of each lamp channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelDuty {
    pub red: u16,
    pub green: u16,
    pub blue: u16,
}

/// Map an 8-bit channel power onto a PWM compare value, `round(top * power / 255)`
pub fn power_duty(power: u8, top: u16) -> u16 {
    let max = CHANNEL_POWER_MAX as u32;
    ((power as u32 * top as u32 + max / 2) / max) as u16
}

/// Map log2 lamp output onto a PWM compare value for a counter period of `top`
///
/// Computes `round(top * 2^log2_phi)`. Values above zero are treated as
/// full output.
pub fn lamp_duty(log2_phi: Fix24, top: u16) -> u16 {
    let fraction = exp2(log2_phi.min(Fix24::ZERO));
    let half = 1i64 << (Fix24::FRAC_BITS - 1);
    let scaled = (fraction.raw() as i64 * top as i64 + half) >> Fix24::FRAC_BITS;
    scaled.clamp(0, top as i64) as u16
}

/// Map log2 lamp output onto an 8-bit channel power
pub fn lamp_power(log2_phi: Fix24) -> u8 {
    lamp_duty(log2_phi, CHANNEL_POWER_MAX as u16) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_output() {
        assert_eq!(lamp_power(Fix24::ZERO), 255);
        assert_eq!(lamp_duty(Fix24::ZERO, u16::MAX), u16::MAX);
        // Above full output saturates
        assert_eq!(lamp_power(Fix24::ONE), 255);
    }

    #[test]
    fn test_minimum_output() {
        let min = Fix24::from_int(-5);
        assert_eq!(lamp_power(min), 8);
        assert_eq!(lamp_duty(min, u16::MAX), 2048);
    }

    #[test]
    fn test_half_output() {
        assert_eq!(lamp_power(-Fix24::ONE), 128);
        assert_eq!(lamp_duty(-Fix24::ONE, 1000), 500);
    }

    #[test]
    fn test_power_duty() {
        assert_eq!(power_duty(0, u16::MAX), 0);
        assert_eq!(power_duty(SAFELIGHT_POWER, u16::MAX), u16::MAX);
        assert_eq!(power_duty(128, 255), 128);
        assert_eq!(power_duty(51, 1000), 200);
    }

    #[test]
    fn test_monotonic() {
        let mut last = 0;
        for step in 0..=40 {
            let log2_phi = Fix24::from_scaled_1000(-5_000 + step * 125);
            let power = lamp_power(log2_phi);
            assert!(power >= last);
            last = power;
        }
        assert_eq!(last, 255);
    }
}
