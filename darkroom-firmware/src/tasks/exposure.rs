//! Exposure controller task
//!
//! Owns the single [`ExposureTimer`] so that every writer is serialised
//! through one channel. Runs the timed exposure: the lamp is lit on start
//! and put out at the deadline or on stop. After every change the lamp
//! duties and the status are republished.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_time::{Instant, Timer};

use darkroom_core::{ExposureTimer, TimerCommand};

use crate::channels::{EXPOSURE_CMD, LAMP_DUTY, TIMER_STATUS};

/// Status refresh interval while exposing, for the display countdown
const PROGRESS_INTERVAL_MS: u32 = 100;

/// Exposure controller task
///
/// `pwm_top` must match the lamp PWM slice period.
#[embassy_executor::task]
pub async fn exposure_task(mut timer: ExposureTimer, pwm_top: u16) {
    let exposure = timer.exposure();
    info!(
        "Exposure task started: t={}ms, lamp power={}",
        exposure.t_millis(),
        exposure.lamp_power()
    );
    publish(&timer, pwm_top);

    loop {
        let event = if timer.is_exposing() {
            let wait = timer.remaining_ms().min(PROGRESS_INTERVAL_MS);
            select(EXPOSURE_CMD.receive(), Timer::after_millis(wait as u64)).await
        } else {
            Either::First(EXPOSURE_CMD.receive().await)
        };

        if let Either::First(cmd) = event {
            handle(&mut timer, cmd);
        }
        if timer.tick(now_ms()) {
            info!("Exposure complete: {}ms", timer.status().achieved_ms);
        }

        debug_assert!(timer.exposure().discrepancy().is_zero());
        publish(&timer, pwm_top);
    }
}

fn handle(timer: &mut ExposureTimer, cmd: TimerCommand) {
    match cmd {
        TimerCommand::Adjust(adjust) => match timer.adjust(adjust) {
            Ok(outcome) if outcome.accepted => {
                debug!("Exposure command {:?} accepted", adjust);
            }
            Ok(outcome) => {
                warn!(
                    "Exposure command {:?} not fully honoured, carry={}",
                    adjust,
                    outcome.carry.raw()
                );
            }
            Err(e) => warn!("Exposure command {:?} refused: {:?}", adjust, e),
        },
        TimerCommand::Start => match timer.start(now_ms()) {
            Ok(target_ms) => info!(
                "Exposure started: {}ms, ends at {:?}",
                target_ms,
                timer.deadline_ms()
            ),
            Err(e) => warn!("Start refused: {:?}", e),
        },
        TimerCommand::Stop => match timer.stop(now_ms()) {
            Ok(achieved_ms) => info!("Exposure stopped after {}ms", achieved_ms),
            Err(e) => warn!("Stop refused: {:?}", e),
        },
        TimerCommand::Safelight(on) => {
            debug!("Safelight {}", on);
            timer.set_safelight(on);
        }
        TimerCommand::ReportStatus => {}
    }
}

fn now_ms() -> u32 {
    Instant::now().as_millis() as u32
}

fn publish(timer: &ExposureTimer, pwm_top: u16) {
    let status = timer.status();
    trace!(
        "Status: {:?}, {}/{}ms, lamp power={}",
        status.state,
        status.achieved_ms,
        status.target_ms,
        status.reading.lamp_power
    );

    LAMP_DUTY.signal(timer.channel_duty(pwm_top));
    TIMER_STATUS.signal(status);
}
