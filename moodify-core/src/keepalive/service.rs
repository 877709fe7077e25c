//! Periodic keep-alive probe

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::types::{LivenessTarget, ProbeOutcome};
use crate::config::schema::KeepAliveConfig;

/// Background task that pings the upstream relay so hosts with idle
/// suspension stay warm.
///
/// Ping failures are logged and never stop the loop; the loop only ends on
/// [`KeepAliveProbe::stop`].
pub struct KeepAliveProbe {
    target: Arc<dyn LivenessTarget>,
    config: KeepAliveConfig,
    last: Arc<RwLock<Option<ProbeOutcome>>>,
    task: RwLock<Option<(CancellationToken, JoinHandle<()>)>>,
}

impl KeepAliveProbe {
    pub fn new(target: Arc<dyn LivenessTarget>, config: KeepAliveConfig) -> Self {
        Self {
            target,
            config,
            last: Arc::new(RwLock::new(None)),
            task: RwLock::new(None),
        }
    }

    /// Start the probe loop. No-op when disabled or already running.
    pub async fn start(&self) {
        if !self.config.enabled {
            info!("Keep-alive disabled");
            return;
        }

        let mut task = self.task.write().await;
        if task.is_some() {
            debug!("Keep-alive probe already running");
            return;
        }

        let cancel = CancellationToken::new();
        let interval = Duration::from_secs(self.config.interval_s.max(1));
        let handle = tokio::spawn(run_loop(
            Arc::clone(&self.target),
            Arc::clone(&self.last),
            interval,
            cancel.clone(),
        ));

        *task = Some((cancel, handle));
        info!(
            target_url = %self.target.describe(),
            "Keep-alive started (every {}s)",
            interval.as_secs()
        );
    }

    /// Stop the probe loop and wait for it to exit.
    pub async fn stop(&self) {
        let Some((cancel, handle)) = self.task.write().await.take() else {
            return;
        };
        cancel.cancel();
        if let Err(e) = handle.await {
            if !e.is_cancelled() {
                warn!("Keep-alive task ended abnormally: {}", e);
            }
        }
        info!("Keep-alive stopped");
    }

    pub async fn is_running(&self) -> bool {
        self.task
            .read()
            .await
            .as_ref()
            .is_some_and(|(_, handle)| !handle.is_finished())
    }

    /// Ping once, outside the schedule.
    pub async fn trigger_now(&self) -> crate::Result<String> {
        ping_once(self.target.as_ref(), &self.last).await
    }

    pub async fn last_outcome(&self) -> Option<ProbeOutcome> {
        self.last.read().await.clone()
    }

    pub async fn status(&self) -> serde_json::Value {
        serde_json::json!({
            "enabled": self.config.enabled,
            "running": self.is_running().await,
            "interval_s": self.config.interval_s,
            "target": self.target.describe(),
            "last": self.last_outcome().await,
        })
    }
}

async fn run_loop(
    target: Arc<dyn LivenessTarget>,
    last: Arc<RwLock<Option<ProbeOutcome>>>,
    interval: Duration,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(interval) => {}
        }

        // Errors are recorded and logged inside; the loop keeps going.
        let _ = ping_once(target.as_ref(), &last).await;
    }
}

async fn ping_once(
    target: &dyn LivenessTarget,
    last: &RwLock<Option<ProbeOutcome>>,
) -> crate::Result<String> {
    let result = target.ping().await;
    match &result {
        Ok(body) => info!(target_url = %target.describe(), "Keep-alive ping ok: {}", body),
        Err(e) => warn!(target_url = %target.describe(), "Keep-alive ping failed: {}", e),
    }
    *last.write().await = Some(ProbeOutcome::from_result(&result));
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingTarget {
        pings: AtomicUsize,
        fail: bool,
    }

    impl CountingTarget {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                pings: AtomicUsize::new(0),
                fail,
            })
        }
    }

    #[async_trait]
    impl LivenessTarget for CountingTarget {
        async fn ping(&self) -> crate::Result<String> {
            self.pings.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(crate::Error::Transport("connection refused".to_string()))
            } else {
                Ok(r#"{"message":"Still awake 🔥"}"#.to_string())
            }
        }

        fn describe(&self) -> String {
            "test://relay/keepalive".to_string()
        }
    }

    fn config(enabled: bool, interval_s: u64) -> KeepAliveConfig {
        KeepAliveConfig {
            enabled,
            interval_s,
            url: None,
        }
    }

    #[tokio::test]
    async fn test_probe_new_is_idle() {
        let probe = KeepAliveProbe::new(CountingTarget::new(false), config(true, 600));
        assert!(!probe.is_running().await);
        assert!(probe.last_outcome().await.is_none());
    }

    #[tokio::test]
    async fn test_probe_disabled_does_not_start() {
        let probe = KeepAliveProbe::new(CountingTarget::new(false), config(false, 600));
        probe.start().await;
        assert!(!probe.is_running().await);
    }

    #[tokio::test]
    async fn test_probe_start_stop() {
        let probe = KeepAliveProbe::new(CountingTarget::new(false), config(true, 3600));

        probe.start().await;
        assert!(probe.is_running().await);
        probe.start().await;
        assert!(probe.is_running().await);

        probe.stop().await;
        assert!(!probe.is_running().await);
        probe.stop().await;
    }

    /// Advance the paused clock and let the probe task run what became due.
    async fn elapse(duration: Duration) {
        tokio::task::yield_now().await;
        tokio::time::advance(duration).await;
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_probe_first_ping_waits_one_interval() {
        let target = CountingTarget::new(false);
        let probe = KeepAliveProbe::new(target.clone(), config(true, 600));

        probe.start().await;
        elapse(Duration::from_secs(599)).await;
        assert_eq!(target.pings.load(Ordering::SeqCst), 0);
        assert!(probe.last_outcome().await.is_none());

        elapse(Duration::from_secs(1)).await;
        assert_eq!(target.pings.load(Ordering::SeqCst), 1);
        probe.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_probe_ticks_on_default_interval() {
        let target = CountingTarget::new(false);
        let probe = KeepAliveProbe::new(target.clone(), KeepAliveConfig::default());

        probe.start().await;
        for expected in 1..=3 {
            elapse(Duration::from_secs(600)).await;
            assert_eq!(target.pings.load(Ordering::SeqCst), expected);
        }
        probe.stop().await;

        let last = probe.last_outcome().await.unwrap();
        assert!(last.ok);
        assert!(last.detail.contains("Still awake"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_probe_survives_failures() {
        let target = CountingTarget::new(true);
        let probe = KeepAliveProbe::new(target.clone(), config(true, 600));

        probe.start().await;
        elapse(Duration::from_secs(600)).await;
        elapse(Duration::from_secs(600)).await;
        assert!(probe.is_running().await);
        assert_eq!(target.pings.load(Ordering::SeqCst), 2);
        probe.stop().await;

        let last = probe.last_outcome().await.unwrap();
        assert!(!last.ok);
        assert!(last.detail.contains("connection refused"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_probe_stops_ticking_after_stop() {
        let target = CountingTarget::new(false);
        let probe = KeepAliveProbe::new(target.clone(), config(true, 600));

        probe.start().await;
        elapse(Duration::from_secs(600)).await;
        probe.stop().await;
        elapse(Duration::from_secs(1800)).await;

        assert_eq!(target.pings.load(Ordering::SeqCst), 1);
        assert!(!probe.is_running().await);
    }

    #[tokio::test]
    async fn test_trigger_now_records_outcome() {
        let probe = KeepAliveProbe::new(CountingTarget::new(false), config(true, 600));
        let body = probe.trigger_now().await.unwrap();
        assert!(body.contains("Still awake"));

        let status = probe.status().await;
        assert!(status["enabled"].as_bool().unwrap());
        assert!(!status["running"].as_bool().unwrap());
        assert_eq!(status["interval_s"].as_u64().unwrap(), 600);
        assert_eq!(status["target"], "test://relay/keepalive");
        assert!(status["last"]["ok"].as_bool().unwrap());
    }
}
