//! Timed exposure run
//!
//! Wraps the [`Exposure`] engine with the controller's run state. While
//! idle the exposure lamp is dark and settings may change; while exposing
//! the lamp runs at the engine's output for the target time and settings
//! are frozen.
//!
//! Time comes in as a millisecond timestamp, so any clock can drive it.

use crate::channel::{self, ChannelDuty, ChannelPower, SAFELIGHT_POWER};
use crate::error::TimerError;
use crate::exposure::{CommandOutcome, Exposure, ExposureCommand, ExposureReading};

/// Controller run state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RunState {
    /// Exposure lamp dark
    #[default]
    Idle,
    /// Exposure lamp lit until the target time
    Exposing,
}

/// Requests handled by the exposure timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerCommand {
    /// Adjust the exposure settings (refused while exposing)
    Adjust(ExposureCommand),
    /// Start a timed exposure at the current settings
    Start,
    /// End the running exposure early
    Stop,
    /// Switch the red safelight channel on or off
    Safelight(bool),
    /// Republish the status without changing anything
    ReportStatus,
}

/// Status snapshot for the display and radio
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerStatus {
    pub state: RunState,
    pub channel_power: ChannelPower,
    /// Target time of the current or last run
    pub target_ms: u32,
    /// Time the lamp has been lit in the current or last run
    pub achieved_ms: u32,
    pub reading: ExposureReading,
}

/// Exposure engine plus run state
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ExposureTimer {
    exposure: Exposure,
    state: RunState,
    safelight: bool,
    started_ms: u32,
    target_ms: u32,
    achieved_ms: u32,
}

impl ExposureTimer {
    /// Create an idle timer with the safelight off
    pub fn new(exposure: Exposure) -> Self {
        Self {
            exposure,
            state: RunState::Idle,
            safelight: false,
            started_ms: 0,
            target_ms: 0,
            achieved_ms: 0,
        }
    }

    /// Get the exposure engine
    pub fn exposure(&self) -> &Exposure {
        &self.exposure
    }

    /// Get the run state
    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_exposing(&self) -> bool {
        self.state == RunState::Exposing
    }

    /// Apply an exposure adjustment
    pub fn adjust(&mut self, command: ExposureCommand) -> Result<CommandOutcome, TimerError> {
        if self.is_exposing() {
            return Err(TimerError::SettingsLocked);
        }
        Ok(self.exposure.apply(command))
    }

    /// Start an exposure for the engine's current time
    ///
    /// Returns the target time in milliseconds.
    pub fn start(&mut self, now_ms: u32) -> Result<u32, TimerError> {
        if self.is_exposing() {
            return Err(TimerError::AlreadyExposing);
        }

        self.state = RunState::Exposing;
        self.started_ms = now_ms;
        self.target_ms = self.exposure.t_millis();
        self.achieved_ms = 0;

        Ok(self.target_ms)
    }

    /// Stop the running exposure early
    ///
    /// Returns the time the lamp was lit in milliseconds.
    pub fn stop(&mut self, now_ms: u32) -> Result<u32, TimerError> {
        if !self.is_exposing() {
            return Err(TimerError::NotExposing);
        }

        self.update_achieved(now_ms);
        self.state = RunState::Idle;

        Ok(self.achieved_ms)
    }

    /// Advance the run clock
    ///
    /// Returns true on the call that completes the exposure.
    pub fn tick(&mut self, now_ms: u32) -> bool {
        if !self.is_exposing() {
            return false;
        }

        self.update_achieved(now_ms);
        if self.achieved_ms >= self.target_ms {
            self.state = RunState::Idle;
            true
        } else {
            false
        }
    }

    fn update_achieved(&mut self, now_ms: u32) {
        // Timestamps may wrap
        self.achieved_ms = now_ms.wrapping_sub(self.started_ms).min(self.target_ms);
    }

    /// Timestamp at which the running exposure ends
    pub fn deadline_ms(&self) -> Option<u32> {
        self.is_exposing()
            .then(|| self.started_ms.wrapping_add(self.target_ms))
    }

    /// Time left in the running exposure, zero when idle
    pub fn remaining_ms(&self) -> u32 {
        if self.is_exposing() {
            self.target_ms - self.achieved_ms
        } else {
            0
        }
    }

    pub fn set_safelight(&mut self, on: bool) {
        self.safelight = on;
    }

    pub fn safelight(&self) -> bool {
        self.safelight
    }

    /// 8-bit power of each channel
    ///
    /// The safelight is dark while exposing; green and blue are dark
    /// otherwise.
    pub fn channel_power(&self) -> ChannelPower {
        match self.state {
            RunState::Exposing => {
                let lamp = self.exposure.lamp_power();
                ChannelPower {
                    red: 0,
                    green: lamp,
                    blue: lamp,
                }
            }
            RunState::Idle => ChannelPower {
                red: if self.safelight { SAFELIGHT_POWER } else { 0 },
                ..ChannelPower::OFF
            },
        }
    }

    /// PWM compare value of each channel for a counter period of `top`
    ///
    /// Green and blue use the full-resolution lamp mapping rather than the
    /// 8-bit power.
    pub fn channel_duty(&self, top: u16) -> ChannelDuty {
        let lamp = if self.is_exposing() {
            self.exposure.lamp_duty(top)
        } else {
            0
        };

        ChannelDuty {
            red: channel::power_duty(self.channel_power().red, top),
            green: lamp,
            blue: lamp,
        }
    }

    /// Take a status snapshot
    pub fn status(&self) -> TimerStatus {
        TimerStatus {
            state: self.state,
            channel_power: self.channel_power(),
            target_ms: self.target_ms,
            achieved_ms: self.achieved_ms,
            reading: self.exposure.reading(),
        }
    }
}
