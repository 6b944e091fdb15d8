// Interval-driven refresh of the dashboard pipeline

use crate::application::dashboard_service::DashboardService;
use crate::domain::filter::FilterCriteria;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Scheduled,
}

/// Re-runs the pipeline pass on a fixed interval. Each tick spawns its own
/// pass, so a hung fetch never blocks the next tick; concurrent passes are
/// tolerated and the last one to finish wins the cache.
pub struct RefreshScheduler {
    service: Arc<DashboardService>,
    criteria: Arc<RwLock<FilterCriteria>>,
    interval: Duration,
    timer: Option<JoinHandle<()>>,
}

impl RefreshScheduler {
    pub fn new(
        service: Arc<DashboardService>,
        criteria: Arc<RwLock<FilterCriteria>>,
        interval: Duration,
    ) -> Self {
        Self {
            service,
            criteria,
            interval,
            timer: None,
        }
    }

    pub fn state(&self) -> SchedulerState {
        match &self.timer {
            Some(timer) if !timer.is_finished() => SchedulerState::Scheduled,
            _ => SchedulerState::Idle,
        }
    }

    /// Run one pass immediately, then arm the interval timer.
    pub async fn start(&mut self) {
        self.run_pass_now().await;
        self.restart();
    }

    /// Disarm any existing timer before arming a new one, so at most one
    /// timer is ever active.
    pub fn restart(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }

        let service = self.service.clone();
        let criteria = self.criteria.clone();
        let period = self.interval;
        self.timer = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // the immediate first tick; the caller already ran a pass
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let service = service.clone();
                let criteria = criteria.clone();
                tokio::spawn(async move {
                    let current = criteria.read().await.clone();
                    if let Err(e) = service.run_pass(&current).await {
                        tracing::warn!(error = %e, "scheduled refresh failed, keeping previous data");
                    }
                });
            }
        }));
    }

    /// Out-of-band pass after a manual filter change. Does not touch the
    /// timer, matching the fixed-cadence contract.
    pub async fn run_pass_now(&self) {
        let current = self.criteria.read().await.clone();
        if let Err(e) = self.service.run_pass(&current).await {
            tracing::warn!(error = %e, "refresh failed, keeping previous data");
        }
    }

    pub fn stop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}
