//! Pacing between incremental commits.
//!
//! The engine awaits one `tick` between consecutive commits of a streaming
//! write. Production uses a fixed tokio sleep; tests inject their own pacer
//! (or pause the tokio clock) so increments are driven deterministically.

use std::time::Duration;

use async_trait::async_trait;

#[async_trait]
pub trait Pacer: Send + Sync {
    async fn tick(&self);
}

/// Sleeps a fixed delay on the tokio clock.
#[derive(Debug, Clone, Copy)]
pub struct IntervalPacer {
    delay: Duration,
}

impl IntervalPacer {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

#[async_trait]
impl Pacer for IntervalPacer {
    async fn tick(&self) {
        tokio::time::sleep(self.delay).await;
    }
}

/// Never waits.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImmediatePacer;

#[async_trait]
impl Pacer for ImmediatePacer {
    async fn tick(&self) {}
}
