//! Inter-task communication channels
//!
//! The exposure task is the only owner of the engine state. Input
//! collaborators send it commands; everything downstream listens on
//! signals that always hold the latest value.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use darkroom_core::{ChannelDuty, TimerCommand, TimerStatus};

/// Channel capacity for timer commands
const EXPOSURE_CMD_CHANNEL_SIZE: usize = 8;

/// Exposure and run requests from the dial, touchscreen and radio
pub static EXPOSURE_CMD: Channel<CriticalSectionRawMutex, TimerCommand, EXPOSURE_CMD_CHANNEL_SIZE> =
    Channel::new();

/// PWM compare values for the lamp channels (updated by the exposure task)
pub static LAMP_DUTY: Signal<CriticalSectionRawMutex, ChannelDuty> = Signal::new();

/// Latest run state and readouts for the display and radio
pub static TIMER_STATUS: Signal<CriticalSectionRawMutex, TimerStatus> = Signal::new();
