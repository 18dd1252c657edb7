use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use sia_core::{Config, Session};
use sia_loop::SupportLoopConfig;
use tokio::sync::{Mutex, RwLock};

pub const DEFAULT_SESSION_IDLE_MINUTES: u64 = 60;

/// One session behind its own lock. Turns on the same session hold it for
/// the whole turn, so they apply one after another.
pub type SessionHandle = Arc<Mutex<Session>>;

pub struct AppState {
    pub sessions: Arc<RwLock<HashMap<String, SessionHandle>>>,
    pub loop_config: SupportLoopConfig,
    idle_timeout: Duration,
}

impl AppState {
    pub fn new(loop_config: SupportLoopConfig) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            loop_config,
            idle_timeout: Duration::from_secs(DEFAULT_SESSION_IDLE_MINUTES * 60),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        log::info!(
            "Support policy: {} attempts, {}ms between attempts, escalate after {}h",
            config.max_retries,
            config.retry_delay_ms,
            config.escalation_threshold_hours
        );
        Self::new(SupportLoopConfig::from_config(config))
    }

    /// Sessions untouched for longer than this are dropped.
    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    pub fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }

    pub async fn session_handle(&self, session_id: &str) -> Option<SessionHandle> {
        let sessions = self.sessions.read().await;
        sessions.get(session_id).cloned()
    }

    /// Stored session handle, or a fresh session under the same id.
    pub async fn session_handle_or_new(&self, session_id: &str) -> SessionHandle {
        if let Some(handle) = self.session_handle(session_id).await {
            return handle;
        }
        let mut sessions = self.sessions.write().await;
        sessions
            .entry(session_id.to_string())
            .or_insert_with(|| {
                log::info!("[{}] New session", session_id);
                Arc::new(Mutex::new(Session::new(session_id)))
            })
            .clone()
    }

    /// Copy of a stored session. Waits for a running turn to finish.
    pub async fn session(&self, session_id: &str) -> Option<Session> {
        let handle = self.session_handle(session_id).await?;
        let session = handle.lock().await;
        Some(session.clone())
    }

    /// Put `handle` back if eviction removed it while a turn was running.
    pub async fn reattach(&self, session_id: &str, handle: &SessionHandle) {
        let mut sessions = self.sessions.write().await;
        sessions
            .entry(session_id.to_string())
            .or_insert_with(|| handle.clone());
    }

    pub async fn remove(&self, session_id: &str) -> bool {
        let mut sessions = self.sessions.write().await;
        sessions.remove(session_id).is_some()
    }

    /// Drop idle sessions and return how many went. Sessions with a turn in
    /// flight are kept.
    pub async fn evict_idle(&self) -> usize {
        let Ok(idle) = chrono::Duration::from_std(self.idle_timeout) else {
            return 0;
        };
        let cutoff = Utc::now() - idle;

        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, handle| match handle.try_lock() {
            Ok(session) => session.updated_at > cutoff,
            Err(_) => true,
        });
        let evicted = before - sessions.len();
        if evicted > 0 {
            log::info!("Evicted {} idle session(s)", evicted);
        }
        evicted
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(SupportLoopConfig::default())
    }
}
