//! Darkroom - Enlarger Exposure Timer Firmware
//!
//! Main firmware binary for RP2040-based enlarger controllers. The
//! exposure timer runs in its own task; the lamp channels follow it over
//! PWM and stay dark unless an exposure is running.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use {defmt_rtt as _, panic_probe as _};

use darkroom_core::{Exposure, ExposureLimits, ExposureTimer, Fix24};

mod channels;
mod tasks;

/// Power-on exposure time in seconds
const BOOT_TIME_S: i32 = 8;

/// Power-on aperture-like divisor N
const BOOT_N: i32 = 2;

/// Power-on enlarger head distance
const BOOT_S: i32 = 32;

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Darkroom firmware starting...");

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let limits = ExposureLimits::default();
    let exposure = match Exposure::from_settings(
        limits,
        Fix24::from_int(BOOT_TIME_S),
        Fix24::from_int(BOOT_N),
        Fix24::from_int(BOOT_S),
    ) {
        Ok(exposure) => exposure,
        Err(e) => {
            warn!("Boot settings rejected ({:?}), using defaults", e);
            Exposure::default()
        }
    };

    // Green and blue on GPIO16/17 (PWM slice 0), red safelight on GPIO18 (slice 1 A)
    let lamp_config = tasks::LampFwConfig::default();
    let pwm_top = lamp_config.pwm_top;
    let exposure_pwm =
        Pwm::new_output_ab(p.PWM_SLICE0, p.PIN_16, p.PIN_17, PwmConfig::default());
    let safelight_pwm = Pwm::new_output_a(p.PWM_SLICE1, p.PIN_18, PwmConfig::default());
    info!("Lamp PWM initialized");

    spawner
        .spawn(tasks::lamp_task(exposure_pwm, safelight_pwm, lamp_config))
        .unwrap();
    spawner.spawn(tasks::readout_task()).unwrap();
    spawner
        .spawn(tasks::exposure_task(ExposureTimer::new(exposure), pwm_top))
        .unwrap();

    info!("All tasks spawned, firmware running");
}
