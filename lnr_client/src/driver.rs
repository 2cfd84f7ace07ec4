use std::time::Duration;

use lnr_lib::{ClientSession, Event, Host, JobState, Poller, Report, Transport};
use tokio::{
    signal, task,
    time::{self, MissedTickBehavior},
};
use tracing::{debug, warn};

/// tick the poller every `period` until the job leaves polling/retrieving
/// the first ctrl-c asks the farm to cancel, a second one stops watching
pub async fn drive<T: Transport>(
    poller: &mut Poller<T>,
    session: &mut ClientSession,
    host: &mut dyn Host,
    period: Duration,
) -> JobState {
    // the timer only lives as long as this loop
    let mut timer = time::interval(period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let interrupt = signal::ctrl_c();
    tokio::pin!(interrupt);
    let mut cancel_sent = false;

    loop {
        tokio::select! {
            _ = timer.tick() => {
                // ticks block on the network, keep them off the async workers
                let event = task::block_in_place(|| poller.tick(session, host));
                debug!("tick: {:?}", event);
                if !poller.is_active() {
                    break;
                }
            }
            res = &mut interrupt => {
                if let Err(e) = res {
                    warn!("could not listen for ctrl-c: {}", e);
                    break;
                }
                interrupt.set(signal::ctrl_c());
                if cancel_sent || poller.state() == &JobState::Retrieving {
                    warn!("interrupted, the job keeps running on the farm");
                    break;
                }
                match task::block_in_place(|| poller.cancel(session, host)) {
                    Ok(Event::CancelRequested) => cancel_sent = true,
                    Ok(event) => debug!("cancel: {:?}", event),
                    Err(e) => host.report(Report::error(e.to_string())),
                }
            }
        }
    }
    poller.state().clone()
}
