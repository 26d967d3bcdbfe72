use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::wizard::session::{Session, SessionHandle};

/// How often the sweeper looks for idle sessions.
pub const SWEEP_PERIOD: Duration = Duration::from_secs(60);

struct Entry {
    handle: SessionHandle,
    last_seen: Instant,
}

/// In-memory registry of live sessions, addressed by the id handed to the client.
/// Every lookup refreshes the session's idle clock.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, Entry>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self) -> (Uuid, SessionHandle) {
        let session = Session::new();
        let id = session.id;
        let handle = Arc::new(Mutex::new(session));
        self.inner.write().await.insert(
            id,
            Entry {
                handle: Arc::clone(&handle),
                last_seen: Instant::now(),
            },
        );
        info!("Session {id} created");
        (id, handle)
    }

    pub async fn get(&self, id: Uuid) -> Result<SessionHandle, AppError> {
        let mut sessions = self.inner.write().await;
        let entry = sessions.get_mut(&id).ok_or_else(|| not_found(id))?;
        entry.last_seen = Instant::now();
        Ok(Arc::clone(&entry.handle))
    }

    /// Removes the session and tears down its quiz timer.
    pub async fn remove(&self, id: Uuid) -> Result<(), AppError> {
        let entry = self
            .inner
            .write()
            .await
            .remove(&id)
            .ok_or_else(|| not_found(id))?;
        entry.handle.lock().await.reset_run();
        info!("Session {id} removed");
        Ok(())
    }

    /// Drops every session not looked up within `idle`. Returns how many went.
    pub async fn sweep_idle(&self, idle: Duration) -> usize {
        let expired: Vec<(Uuid, SessionHandle)> = {
            let mut sessions = self.inner.write().await;
            let now = Instant::now();
            let stale: Vec<Uuid> = sessions
                .iter()
                .filter(|(_, e)| now.duration_since(e.last_seen) >= idle)
                .map(|(id, _)| *id)
                .collect();
            stale
                .into_iter()
                .filter_map(|id| sessions.remove(&id).map(|e| (id, e.handle)))
                .collect()
        };

        for (id, handle) in &expired {
            handle.lock().await.reset_run();
            info!("Session {id} expired after {}s idle", idle.as_secs());
        }
        expired.len()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Session {id} not found"))
}

/// Sweeps `store` every `period`, evicting sessions idle for `idle` or longer.
pub fn spawn_sweeper(store: SessionStore, idle: Duration, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let evicted = store.sweep_idle(idle).await;
            if evicted > 0 {
                debug!("Sweep evicted {evicted} idle sessions");
            }
        }
    })
}
