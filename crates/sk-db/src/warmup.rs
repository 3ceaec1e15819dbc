//! Best-effort connection warmup.
//!
//! Some engines pay a large cost on the first statement after a cold start.
//! The gate runs a cheap statement before real work, at most once per TTL,
//! and backs off after a failure. Failures are logged and never surface.

use crate::traits::Database;
use sk_core::WarmupConfig;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// What [`WarmupGate::ensure_warm`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarmupStatus {
    /// Warmup is turned off in config
    Disabled,
    /// A previous warmup is still within its TTL
    Fresh,
    /// A recent failure is still within its backoff window
    BackingOff,
    /// The warmup statement ran successfully
    Warmed,
    /// The warmup statement failed
    Failed,
}

#[derive(Debug, Default)]
struct GateState {
    last_success: Option<Instant>,
    last_failure: Option<Instant>,
}

/// Runs the configured warmup statement against a database.
pub struct WarmupGate {
    db: Arc<dyn Database>,
    enabled: bool,
    ttl: Duration,
    backoff: Duration,
    sql: String,
    state: Mutex<GateState>,
}

impl WarmupGate {
    pub fn new(db: Arc<dyn Database>, config: &WarmupConfig) -> Self {
        Self {
            db,
            enabled: config.enabled,
            ttl: Duration::from_secs(config.ttl_seconds),
            backoff: Duration::from_secs(config.failure_backoff_seconds),
            sql: config.sql.clone(),
            state: Mutex::new(GateState::default()),
        }
    }

    /// Warm the connection unless a recent attempt makes it unnecessary.
    ///
    /// Concurrent callers serialize on the gate, so a cold start runs the
    /// statement once.
    pub async fn ensure_warm(&self) -> WarmupStatus {
        if !self.enabled {
            return WarmupStatus::Disabled;
        }

        let mut state = self.state.lock().await;
        let now = Instant::now();
        if state
            .last_success
            .is_some_and(|t| now.duration_since(t) < self.ttl)
        {
            return WarmupStatus::Fresh;
        }
        if state
            .last_failure
            .is_some_and(|t| now.duration_since(t) < self.backoff)
        {
            return WarmupStatus::BackingOff;
        }

        match self.db.query(&self.sql, &[]).await {
            Ok(_) => {
                log::debug!("Warmup succeeded on {}", self.db.db_type());
                state.last_success = Some(Instant::now());
                state.last_failure = None;
                WarmupStatus::Warmed
            }
            Err(e) => {
                log::warn!("Warmup failed on {}: {}", self.db.db_type(), e);
                state.last_failure = Some(Instant::now());
                WarmupStatus::Failed
            }
        }
    }

    /// Whether a successful warmup is still within its TTL.
    pub async fn is_warm(&self) -> bool {
        let state = self.state.lock().await;
        state
            .last_success
            .is_some_and(|t| t.elapsed() < self.ttl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DbError, DbResult};
    use crate::result::ResultSet;
    use async_trait::async_trait;
    use sk_core::SqlValue;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingDb {
        calls: AtomicUsize,
        fail: bool,
    }

    impl CountingDb {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                fail,
            })
        }
    }

    #[async_trait]
    impl Database for CountingDb {
        async fn execute_batch(&self, _sql: &str) -> DbResult<()> {
            Ok(())
        }

        async fn query(&self, _sql: &str, _params: &[SqlValue]) -> DbResult<ResultSet> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(DbError::ConnectionError("warehouse asleep".into()))
            } else {
                Ok(ResultSet::default())
            }
        }

        fn db_type(&self) -> &'static str {
            "counting"
        }

        fn catalog_name(&self) -> &str {
            "memory"
        }
    }

    fn config(ttl: u64, backoff: u64) -> WarmupConfig {
        WarmupConfig {
            ttl_seconds: ttl,
            failure_backoff_seconds: backoff,
            ..WarmupConfig::default()
        }
    }

    #[tokio::test]
    async fn test_disabled_gate_never_queries() {
        let db = CountingDb::new(false);
        let cfg = WarmupConfig {
            enabled: false,
            ..WarmupConfig::default()
        };
        let gate = WarmupGate::new(db.clone(), &cfg);
        assert_eq!(gate.ensure_warm().await, WarmupStatus::Disabled);
        assert_eq!(db.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_warms_once_within_ttl() {
        let db = CountingDb::new(false);
        let gate = WarmupGate::new(db.clone(), &config(600, 30));
        assert_eq!(gate.ensure_warm().await, WarmupStatus::Warmed);
        assert_eq!(gate.ensure_warm().await, WarmupStatus::Fresh);
        assert!(gate.is_warm().await);
        assert_eq!(db.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_expired_ttl_warms_again() {
        let db = CountingDb::new(false);
        let gate = WarmupGate::new(db.clone(), &config(0, 30));
        assert_eq!(gate.ensure_warm().await, WarmupStatus::Warmed);
        assert_eq!(gate.ensure_warm().await, WarmupStatus::Warmed);
        assert_eq!(db.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failure_backs_off_without_error() {
        let db = CountingDb::new(true);
        let gate = WarmupGate::new(db.clone(), &config(600, 30));
        assert_eq!(gate.ensure_warm().await, WarmupStatus::Failed);
        assert_eq!(gate.ensure_warm().await, WarmupStatus::BackingOff);
        assert!(!gate.is_warm().await);
        assert_eq!(db.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_warmup() {
        let db = CountingDb::new(false);
        let gate = Arc::new(WarmupGate::new(db.clone(), &config(600, 30)));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let gate = gate.clone();
                tokio::spawn(async move { gate.ensure_warm().await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(db.calls.load(Ordering::SeqCst), 1);
    }
}
