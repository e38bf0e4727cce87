//! Periodic re-rendering for `dashboard --watch`.

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

/// Repeating timer that runs a tick body until stopped
///
/// The first tick fires immediately. A tick body always finishes before
/// the next tick is awaited, and late ticks are delayed rather than
/// bunched up. Clones share the same stop signal.
#[derive(Clone)]
pub struct AutoRefresh {
    period: Duration,
    stop: Arc<watch::Sender<bool>>,
}

impl AutoRefresh {
    pub fn new(period: Duration) -> Self {
        let (stop, _) = watch::channel(false);
        Self {
            period,
            stop: Arc::new(stop),
        }
    }

    pub fn stop(&self) {
        self.stop.send_replace(true);
    }

    pub fn is_stopped(&self) -> bool {
        *self.stop.borrow()
    }

    /// Run `tick` every period until [`AutoRefresh::stop`] or Ctrl+C
    ///
    /// An error from the tick body ends the loop and is returned.
    pub async fn run<F>(&self, mut tick: F) -> Result<()>
    where
        F: FnMut() -> Result<()>,
    {
        let mut interval = tokio::time::interval(self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut stopped = self.stop.subscribe();
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        let mut ticks = 0u64;
        while !*stopped.borrow_and_update() {
            tokio::select! {
                biased;
                _ = stopped.changed() => {}
                _ = &mut ctrl_c => {
                    tracing::debug!("Received Ctrl+C, stopping refresh");
                    break;
                }
                _ = interval.tick() => {
                    ticks += 1;
                    tick()?;
                }
            }
        }

        tracing::debug!("Auto-refresh stopped after {} tick(s)", ticks);
        Ok(())
    }
}
