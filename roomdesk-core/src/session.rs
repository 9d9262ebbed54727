//! Session context: bearer token and user record held in durable storage,
//! cached in memory, and broadcast to subscribers whenever they change.

use async_trait::async_trait;
use roomdesk_shared::{Masked, Role, User};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::{ClientError, ClientResult};

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";

/// Lower bound for the storage polling period.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Durable string key/value storage shared by every view and process.
#[async_trait]
pub trait SessionStorage: Send + Sync {
    async fn get(&self, key: &str) -> ClientResult<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> ClientResult<()>;
    async fn remove(&self, key: &str) -> ClientResult<()>;
}

/// In-process storage. Clones of the `Arc` share entries, which is how
/// tests model two tabs on the same store.
#[derive(Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStorage for MemoryStorage {
    async fn get(&self, key: &str) -> ClientResult<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> ClientResult<()> {
        self.entries.write().await.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> ClientResult<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

/// What the client currently believes about the session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub token: Option<Masked<String>>,
    pub user: Option<User>,
}

impl SessionSnapshot {
    /// Token presence is the only local authentication signal.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn role(&self) -> Option<&Role> {
        self.user.as_ref().map(|u| &u.role)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn { user_id: Option<i64> },
    SignedOut,
    /// Token or user record replaced while staying signed in.
    Updated,
}

pub struct Session {
    storage: Arc<dyn SessionStorage>,
    current: RwLock<SessionSnapshot>,
    events: broadcast::Sender<SessionEvent>,
}

impl Session {
    /// A session that reads as anonymous until [`Session::refresh`] runs.
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            storage,
            current: RwLock::new(SessionSnapshot::default()),
            events,
        }
    }

    /// Build a session and load whatever durable storage holds.
    pub async fn restore(storage: Arc<dyn SessionStorage>) -> ClientResult<Self> {
        let session = Self::new(storage);
        session.refresh().await?;
        Ok(session)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.current.read().await.clone()
    }

    pub async fn token(&self) -> Option<Masked<String>> {
        self.current.read().await.token.clone()
    }

    pub async fn current_user(&self) -> Option<User> {
        self.current.read().await.user.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.current.read().await.is_authenticated()
    }

    /// Persist a fresh login and notify subscribers.
    pub async fn sign_in(&self, token: Masked<String>, user: User) -> ClientResult<()> {
        let serialized = serde_json::to_string(&user).map_err(|e| ClientError::Storage(e.to_string()))?;
        self.storage.set(TOKEN_KEY, token.expose()).await?;
        self.storage.set(USER_KEY, &serialized).await?;

        let user_id = user.id;
        *self.current.write().await = SessionSnapshot {
            token: Some(token),
            user: Some(user),
        };
        info!(user_id, "Session signed in");
        let _ = self.events.send(SessionEvent::SignedIn { user_id: Some(user_id) });
        Ok(())
    }

    /// Drop token and user from storage and memory.
    pub async fn sign_out(&self) -> ClientResult<()> {
        self.storage.remove(TOKEN_KEY).await?;
        self.storage.remove(USER_KEY).await?;
        *self.current.write().await = SessionSnapshot::default();
        info!("Session signed out");
        let _ = self.events.send(SessionEvent::SignedOut);
        Ok(())
    }

    /// Re-read durable storage and publish the difference, if any.
    ///
    /// This is how changes made by another process sharing the store (or
    /// an expired token being removed) become visible. Returns whether the
    /// in-memory snapshot changed.
    pub async fn refresh(&self) -> ClientResult<bool> {
        let stored = self.read_storage().await?;
        let mut current = self.current.write().await;
        if *current == stored {
            return Ok(false);
        }

        let event = match (current.is_authenticated(), stored.is_authenticated()) {
            (false, false) => SessionEvent::Updated,
            (true, false) => SessionEvent::SignedOut,
            (false, true) => SessionEvent::SignedIn {
                user_id: stored.user.as_ref().map(|u| u.id),
            },
            (true, true) => SessionEvent::Updated,
        };
        *current = stored;
        drop(current);

        debug!(?event, "Session changed in storage");
        let _ = self.events.send(event);
        Ok(true)
    }

    async fn read_storage(&self) -> ClientResult<SessionSnapshot> {
        let token = self.storage.get(TOKEN_KEY).await?.map(Masked);
        let user = match self.storage.get(USER_KEY).await? {
            Some(raw) => match serde_json::from_str::<User>(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    warn!("Ignoring unreadable user record in session storage: {}", e);
                    None
                }
            },
            None => None,
        };
        Ok(SessionSnapshot { token, user })
    }
}

/// Poll storage so out-of-band sign-outs are noticed without a push channel.
///
/// Periods shorter than [`MIN_POLL_INTERVAL`] are raised to it.
pub fn spawn_session_watcher(session: Arc<Session>, every: Duration) -> JoinHandle<()> {
    let every = every.max(MIN_POLL_INTERVAL);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if let Err(e) = session.refresh().await {
                warn!("Session refresh failed: {}", e);
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guest(role: Role) -> User {
        User {
            id: 11,
            firstname: "Rita".to_string(),
            lastname: "Moreno".to_string(),
            username: "rita".to_string(),
            about: None,
            email: "rita@example.com".to_string(),
            avatarurl: None,
            role,
        }
    }

    #[tokio::test]
    async fn test_sign_in_persists_and_notifies() {
        let storage = Arc::new(MemoryStorage::new());
        let session = Session::new(storage.clone());
        let mut events = session.subscribe();

        assert!(!session.is_authenticated().await);
        session.sign_in(Masked::from("tok-1"), guest(Role::User)).await.unwrap();

        assert!(session.is_authenticated().await);
        assert_eq!(storage.get(TOKEN_KEY).await.unwrap().as_deref(), Some("tok-1"));
        assert!(storage.get(USER_KEY).await.unwrap().unwrap().contains("\"rita\""));
        assert_eq!(events.recv().await.unwrap(), SessionEvent::SignedIn { user_id: Some(11) });

        session.sign_out().await.unwrap();
        assert!(storage.get(TOKEN_KEY).await.unwrap().is_none());
        assert_eq!(events.recv().await.unwrap(), SessionEvent::SignedOut);
    }

    #[tokio::test]
    async fn test_refresh_sees_sign_out_from_another_session() {
        let storage: Arc<MemoryStorage> = Arc::new(MemoryStorage::new());
        let tab_a = Session::new(storage.clone());
        tab_a.sign_in(Masked::from("tok-2"), guest(Role::Admin)).await.unwrap();

        let tab_b = Session::restore(storage.clone()).await.unwrap();
        assert_eq!(tab_b.snapshot().await.role(), Some(&Role::Admin));
        let mut events = tab_b.subscribe();

        tab_a.sign_out().await.unwrap();
        assert!(tab_b.is_authenticated().await);
        assert!(tab_b.refresh().await.unwrap());
        assert!(!tab_b.is_authenticated().await);
        assert_eq!(events.recv().await.unwrap(), SessionEvent::SignedOut);

        assert!(!tab_b.refresh().await.unwrap());
    }

    #[tokio::test]
    async fn test_token_without_readable_user() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(TOKEN_KEY, "tok-3").await.unwrap();
        storage.set(USER_KEY, "{not json").await.unwrap();

        let session = Session::restore(storage).await.unwrap();
        let snapshot = session.snapshot().await;
        assert!(snapshot.is_authenticated());
        assert!(snapshot.user.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_watcher_polls_storage() {
        let storage = Arc::new(MemoryStorage::new());
        let session = Arc::new(Session::new(storage.clone()));
        let mut events = session.subscribe();
        let handle = spawn_session_watcher(session.clone(), Duration::from_millis(500));

        storage.set(TOKEN_KEY, "tok-4").await.unwrap();
        let event = events.recv().await.unwrap();
        assert_eq!(event, SessionEvent::SignedIn { user_id: None });
        assert!(session.is_authenticated().await);
        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_watcher_survives_zero_period() {
        let storage = Arc::new(MemoryStorage::new());
        let session = Arc::new(Session::new(storage.clone()));
        let mut events = session.subscribe();
        let handle = spawn_session_watcher(session.clone(), Duration::ZERO);

        storage.set(TOKEN_KEY, "tok-5").await.unwrap();
        assert_eq!(events.recv().await.unwrap(), SessionEvent::SignedIn { user_id: None });
        assert!(!handle.is_finished());
        handle.abort();
    }

    #[tokio::test]
    async fn test_user_change_without_token_is_not_a_sign_out() {
        let storage = Arc::new(MemoryStorage::new());
        let session = Session::new(storage.clone());
        let mut events = session.subscribe();

        storage
            .set(USER_KEY, &serde_json::to_string(&guest(Role::User)).unwrap())
            .await
            .unwrap();
        assert!(session.refresh().await.unwrap());
        assert!(!session.is_authenticated().await);
        assert_eq!(events.recv().await.unwrap(), SessionEvent::Updated);
    }
}
