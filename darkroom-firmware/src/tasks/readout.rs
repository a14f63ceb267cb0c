//! Readout task
//!
//! Logs every published timer status over RTT until a display
//! collaborator takes the signal over.

use defmt::*;

use crate::channels::TIMER_STATUS;

/// Readout task - logs each new status
#[embassy_executor::task]
pub async fn readout_task() {
    info!("Readout task started");

    loop {
        let status = TIMER_STATUS.wait().await;
        let reading = status.reading;
        info!(
            "{:?}: {}/{}ms, t={}ms, channels={:?}, log2H raw={}",
            status.state,
            status.achieved_ms,
            status.target_ms,
            reading.time_ms,
            status.channel_power,
            reading.log2_h.raw()
        );
    }
}
