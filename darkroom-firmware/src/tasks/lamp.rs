//! Lamp drive task
//!
//! Drives the enlarger lamp head from two RP2040 PWM slices: green and
//! blue share one slice (channels A and B), the red safelight has its own.
//! Compare values come straight from the exposure task.

use defmt::*;
use embassy_rp::pwm::{Config as PwmConfig, Pwm};

use darkroom_core::ChannelDuty;

use crate::channels::LAMP_DUTY;

/// Lamp PWM configuration
pub struct LampFwConfig {
    /// PWM top value (determines frequency and resolution)
    pub pwm_top: u16,
}

impl Default for LampFwConfig {
    fn default() -> Self {
        Self {
            // 125 MHz / 65536 ≈ 1.9 kHz, well above visible flicker
            pwm_top: u16::MAX,
        }
    }
}

/// Lamp drive task
///
/// Starts with every channel dark and follows each duty update.
#[embassy_executor::task]
pub async fn lamp_task(
    mut exposure_pwm: Pwm<'static>,
    mut safelight_pwm: Pwm<'static>,
    config: LampFwConfig,
) {
    info!("Lamp task started");

    let mut exposure_config = PwmConfig::default();
    exposure_config.top = config.pwm_top;
    exposure_config.compare_a = 0;
    exposure_config.compare_b = 0;
    exposure_pwm.set_config(&exposure_config);

    let mut safelight_config = PwmConfig::default();
    safelight_config.top = config.pwm_top;
    safelight_config.compare_a = 0;
    safelight_pwm.set_config(&safelight_config);

    let mut last = ChannelDuty::default();

    loop {
        let duty = LAMP_DUTY.wait().await;
        if duty == last {
            continue;
        }

        trace!("Lamp duty: {:?} -> {:?}", last, duty);

        if duty.green != last.green || duty.blue != last.blue {
            exposure_config.compare_a = duty.green;
            exposure_config.compare_b = duty.blue;
            exposure_pwm.set_config(&exposure_config);
        }
        if duty.red != last.red {
            safelight_config.compare_a = duty.red;
            safelight_pwm.set_config(&safelight_config);
        }

        last = duty;
    }
}
