use anyhow::Result;

/// Lease-based mutual exclusion over a single Redis key. The holder never
/// releases early: the lease TTL doubles as the minimum hold time, so at most
/// one instance in the fleet runs the guarded section per lease window and a
/// crashed holder frees the lock by expiry.
#[derive(Clone)]
pub struct ProbeLock {
    pub client: redis::Client,
    pub key: String,
    pub lease_ms: u64,
    pub holder_id: String,
}

impl ProbeLock {
    pub fn new(client: redis::Client, key: &str, lease_ms: u64) -> Self {
        Self {
            client,
            key: key.to_string(),
            lease_ms,
            holder_id: uuid::Uuid::new_v4().to_string(),
        }
    }

    /// Returns false when another instance holds the lease. Contention is
    /// expected, not an error.
    pub async fn try_acquire(&self) -> Result<bool> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let acquired: Option<String> = redis::cmd("SET")
            .arg(&self.key)
            .arg(&self.holder_id)
            .arg("NX")
            .arg("PX")
            .arg(self.lease_ms)
            .query_async(&mut conn)
            .await?;
        Ok(acquired.is_some())
    }
}
