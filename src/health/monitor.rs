use crate::domain::payment::Processor;
use crate::health::lock_redis::ProbeLock;
use anyhow::Result;
use futures_util::StreamExt;
use redis::AsyncCommands;
use serde::Deserialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub const HEALTH_STATUS_DEFAULT_KEY: &str = "health:status:default";
pub const HEALTH_STATUS_FALLBACK_KEY: &str = "health:status:fallback";
pub const HEALTH_NOTIFICATION_CHANNEL: &str = "health:notifications";
pub const HEALTH_PROBE_LOCK_KEY: &str = "locks:health-probe";

/// Just over the processors' 5s health-endpoint rate limit.
pub const PROBE_PERIOD_MS: u64 = 5150;
pub const PROBE_LOCK_LEASE_MS: u64 = 4000;

#[derive(Debug, Deserialize)]
pub struct HealthCheckResponse {
    pub failing: bool,
}

/// Per-instance view of the shared availability flags. Flags start false and
/// only a successful probe cycle observed through the store can raise them.
/// Written solely by the monitor's sync path, read lock-free everywhere else.
#[derive(Clone)]
pub struct HealthCache {
    default_up: Arc<AtomicBool>,
    fallback_up: Arc<AtomicBool>,
}

impl HealthCache {
    pub fn new() -> Self {
        Self {
            default_up: Arc::new(AtomicBool::new(false)),
            fallback_up: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_available(&self, processor: Processor) -> bool {
        match processor {
            Processor::Default => self.default_up.load(Ordering::Relaxed),
            Processor::Fallback => self.fallback_up.load(Ordering::Relaxed),
        }
    }

    pub fn snapshot(&self) -> (bool, bool) {
        (
            self.default_up.load(Ordering::Relaxed),
            self.fallback_up.load(Ordering::Relaxed),
        )
    }

    pub fn set(&self, default_up: bool, fallback_up: bool) {
        self.default_up.store(default_up, Ordering::Relaxed);
        self.fallback_up.store(fallback_up, Ordering::Relaxed);
    }
}

impl Default for HealthCache {
    fn default() -> Self {
        Self::new()
    }
}

pub fn flag_is_up(raw: Option<&str>) -> bool {
    raw == Some("1")
}

#[derive(Clone)]
pub struct HealthMonitor {
    pub redis_client: redis::Client,
    pub http_client: reqwest::Client,
    pub cache: HealthCache,
    pub lock: ProbeLock,
    pub default_health_url: String,
    pub fallback_health_url: String,
    pub health_timeout_ms: u64,
}

impl HealthMonitor {
    /// Periodic probe loop. One instance per fleet wins the lease each period
    /// and refreshes the shared flags; everyone else skips the cycle.
    pub async fn run_probe_cycles(self) {
        let mut ticker =
            tokio::time::interval(std::time::Duration::from_millis(PROBE_PERIOD_MS));
        loop {
            ticker.tick().await;
            if let Err(err) = self.probe_cycle().await {
                tracing::warn!("health probe cycle failed: {}", err);
            }
        }
    }

    async fn probe_cycle(&self) -> Result<()> {
        if !self.lock.try_acquire().await? {
            tracing::debug!("probe lock held elsewhere, skipping cycle");
            return Ok(());
        }

        let default_up = self.probe(&self.default_health_url).await;
        let fallback_up = self.probe(&self.fallback_health_url).await;
        self.publish_with_failsafe(default_up, fallback_up).await
    }

    /// A cycle that cannot write its results still has to wake the fleet:
    /// fall back to advertising both processors down, then surface the
    /// original error.
    pub async fn publish_with_failsafe(&self, default_up: bool, fallback_up: bool) -> Result<()> {
        if let Err(err) = self.publish_flags(default_up, fallback_up).await {
            if let Err(failsafe_err) = self.publish_flags(false, false).await {
                tracing::warn!("failsafe health publish failed: {}", failsafe_err);
            }
            return Err(err);
        }
        Ok(())
    }

    /// Bounded-timeout liveness call. Fail-closed: anything short of a clean
    /// `{"failing": false}` reply means unavailable.
    async fn probe(&self, url: &str) -> bool {
        let resp = self
            .http_client
            .get(url)
            .timeout(std::time::Duration::from_millis(self.health_timeout_ms))
            .send()
            .await;

        match resp {
            Ok(r) if r.status().is_success() => match r.json::<HealthCheckResponse>().await {
                Ok(body) => !body.failing,
                Err(_) => false,
            },
            _ => false,
        }
    }

    async fn publish_flags(&self, default_up: bool, fallback_up: bool) -> Result<()> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let _: () = conn
            .set(HEALTH_STATUS_DEFAULT_KEY, if default_up { "1" } else { "0" })
            .await?;
        let _: () = conn
            .set(HEALTH_STATUS_FALLBACK_KEY, if fallback_up { "1" } else { "0" })
            .await?;
        // Payload is a wake-up only; subscribers re-read the flags themselves.
        let _: i64 = conn.publish(HEALTH_NOTIFICATION_CHANNEL, "updated").await?;
        tracing::info!(default_up, fallback_up, "published processor health");
        Ok(())
    }

    /// Pub/sub listener: on every notification (and once at startup) re-read
    /// both flags from the store into the local cache.
    pub async fn run_listener(self) {
        if let Err(err) = self.sync_from_store().await {
            tracing::warn!("initial health sync failed: {}", err);
        }

        loop {
            if let Err(err) = self.listen_once().await {
                tracing::warn!("health notification listener error: {}", err);
            }
            tokio::time::sleep(std::time::Duration::from_secs(1)).await;
        }
    }

    async fn listen_once(&self) -> Result<()> {
        let mut pubsub = self.redis_client.get_async_pubsub().await?;
        pubsub.subscribe(HEALTH_NOTIFICATION_CHANNEL).await?;
        // Notifications published while the subscription was down are gone;
        // catch up before waiting for the next one.
        if let Err(err) = self.sync_from_store().await {
            tracing::warn!("health re-read failed: {}", err);
        }
        let mut messages = pubsub.on_message();
        while messages.next().await.is_some() {
            if let Err(err) = self.sync_from_store().await {
                tracing::warn!("health re-read failed: {}", err);
            }
        }
        Ok(())
    }

    pub async fn sync_from_store(&self) -> Result<()> {
        let synced = self.read_flags().await;
        match synced {
            Ok((default_up, fallback_up)) => self.cache.set(default_up, fallback_up),
            Err(err) => {
                // Store unreachable: fail closed until the next notification.
                self.cache.set(false, false);
                return Err(err);
            }
        }
        Ok(())
    }

    async fn read_flags(&self) -> Result<(bool, bool)> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let flags: Vec<Option<String>> = conn
            .mget(&[HEALTH_STATUS_DEFAULT_KEY, HEALTH_STATUS_FALLBACK_KEY])
            .await?;
        if flags.len() != 2 {
            return Ok((false, false));
        }
        Ok((
            flag_is_up(flags[0].as_deref()),
            flag_is_up(flags[1].as_deref()),
        ))
    }
}
