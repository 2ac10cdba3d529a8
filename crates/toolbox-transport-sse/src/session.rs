//! Session Store: the registry of open event streams.
//!
//! A session exists exactly as long as its event stream. The stream owns
//! a [`SessionGuard`]; dropping the stream drops the guard, which removes
//! the session. Removing a session drops its `closer`, which ends the
//! stream from the server side.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use toolbox_types::SessionId;

use crate::error::TransportError;

/// A serialized JSON-RPC message waiting to be written as an SSE event.
pub type Frame = String;

struct Session {
    sender: mpsc::Sender<Frame>,
    // Never read: dropping it is the close signal.
    _closer: oneshot::Sender<()>,
}

/// Write access to one open session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    id: SessionId,
    sender: mpsc::Sender<Frame>,
}

impl SessionHandle {
    /// The session id.
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Queues a frame on the session's stream, waiting while the channel
    /// is full.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::ChannelClosed` if the stream has ended.
    pub async fn send(&self, frame: Frame) -> Result<(), TransportError> {
        self.sender
            .send(frame)
            .await
            .map_err(|_| TransportError::ChannelClosed)
    }
}

/// All open sessions, keyed by id.
///
/// Every operation takes the lock for one map access only; it is never
/// held across an `.await`.
pub struct SessionStore {
    sessions: Mutex<HashMap<SessionId, Session>>,
    max_sessions: usize,
    // Written and read only while `sessions` is locked.
    closing: AtomicBool,
}

impl SessionStore {
    /// Creates an empty store. `max_sessions == 0` means unlimited.
    pub fn new(max_sessions: usize) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            max_sessions,
            closing: AtomicBool::new(false),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<SessionId, Session>> {
        // The map stays consistent even if a holder panicked.
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers a new session and returns its fresh id.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::SessionLimit` when the store is full and
    /// `TransportError::ShuttingDown` once [`close_all`](Self::close_all)
    /// has run.
    pub fn create(
        &self,
        sender: mpsc::Sender<Frame>,
        closer: oneshot::Sender<()>,
    ) -> Result<SessionId, TransportError> {
        let mut sessions = self.lock();
        if self.closing.load(Ordering::Relaxed) {
            return Err(TransportError::ShuttingDown);
        }
        if self.max_sessions > 0 && sessions.len() >= self.max_sessions {
            return Err(TransportError::SessionLimit {
                max: self.max_sessions,
            });
        }

        let mut id = SessionId::generate();
        while sessions.contains_key(&id) {
            id = SessionId::generate();
        }
        sessions.insert(
            id.clone(),
            Session {
                sender,
                _closer: closer,
            },
        );
        Ok(id)
    }

    /// Looks up an open session.
    pub fn get(&self, id: &SessionId) -> Option<SessionHandle> {
        self.lock().get(id).map(|s| SessionHandle {
            id: id.clone(),
            sender: s.sender.clone(),
        })
    }

    /// Removes a session. Returns `false` if it was already gone.
    pub fn remove(&self, id: &SessionId) -> bool {
        self.lock().remove(id).is_some()
    }

    /// Removes every session, ending all streams, and refuses new ones from
    /// then on. Returns how many were open.
    pub fn close_all(&self) -> usize {
        let drained: Vec<Session> = {
            let mut sessions = self.lock();
            self.closing.store(true, Ordering::Relaxed);
            sessions.drain().map(|(_, s)| s).collect()
        };
        // Closers drop here, outside the lock.
        drained.len()
    }

    /// Number of open sessions.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether no session is open.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Whether the id names an open session.
    pub fn contains(&self, id: &SessionId) -> bool {
        self.lock().contains_key(id)
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(0)
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("open", &self.len())
            .field("max_sessions", &self.max_sessions)
            .field("closing", &self.closing.load(Ordering::Relaxed))
            .finish()
    }
}

/// Removes its session from the store when dropped.
///
/// Owned by the event stream, so removal happens exactly once however
/// the stream ends.
pub struct SessionGuard {
    store: Arc<SessionStore>,
    id: SessionId,
}

impl SessionGuard {
    /// Binds a guard to an open session.
    pub fn new(store: Arc<SessionStore>, id: SessionId) -> Self {
        Self { store, id }
    }

    /// The guarded session id.
    pub fn id(&self) -> &SessionId {
        &self.id
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        if self.store.remove(&self.id) {
            info!(session = %self.id, "session closed");
        } else {
            debug!(session = %self.id, "session already removed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open(store: &SessionStore) -> (SessionId, mpsc::Receiver<Frame>, oneshot::Receiver<()>) {
        let (tx, rx) = mpsc::channel(4);
        let (closer, closed) = oneshot::channel();
        let id = store.create(tx, closer).expect("create");
        (id, rx, closed)
    }

    #[test]
    fn create_get_remove() {
        let store = SessionStore::default();
        let (id, _rx, _closed) = open(&store);
        assert!(store.contains(&id));
        assert_eq!(store.get(&id).map(|h| h.id().clone()), Some(id.clone()));
        assert!(store.remove(&id));
        assert!(store.get(&id).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn remove_is_idempotent() {
        let store = SessionStore::default();
        let (id, _rx, _closed) = open(&store);
        assert!(store.remove(&id));
        assert!(!store.remove(&id));
        assert!(!store.remove(&SessionId::from("never-created")));
    }

    #[test]
    fn unknown_id_is_absent() {
        let store = SessionStore::default();
        assert!(store.get(&SessionId::from("never-created")).is_none());
    }

    #[test]
    fn ids_are_distinct() {
        let store = SessionStore::default();
        let mut keep = Vec::new();
        for _ in 0..50 {
            keep.push(open(&store));
        }
        let ids: std::collections::HashSet<_> = keep.iter().map(|(id, _, _)| id.clone()).collect();
        assert_eq!(ids.len(), 50);
        assert_eq!(store.len(), 50);
    }

    #[test]
    fn limit_enforced() {
        let store = SessionStore::new(1);
        let (_id, _rx, _closed) = open(&store);
        let (tx, _rx2) = mpsc::channel(1);
        let (closer, _closed2) = oneshot::channel();
        let err = store.create(tx, closer).expect_err("full");
        assert!(matches!(err, TransportError::SessionLimit { max: 1 }));
    }

    #[tokio::test]
    async fn removal_signals_closer() {
        let store = SessionStore::default();
        let (id, _rx, closed) = open(&store);
        store.remove(&id);
        assert!(closed.await.is_err());
    }

    #[tokio::test]
    async fn close_all_signals_every_stream() {
        let store = SessionStore::default();
        let (_a, _rxa, closed_a) = open(&store);
        let (_b, _rxb, closed_b) = open(&store);
        assert_eq!(store.close_all(), 2);
        assert!(store.is_empty());
        assert!(closed_a.await.is_err());
        assert!(closed_b.await.is_err());
    }

    #[test]
    fn create_refused_after_close_all() {
        let store = SessionStore::default();
        let (_id, _rx, _closed) = open(&store);
        store.close_all();

        let (tx, _rx2) = mpsc::channel(1);
        let (closer, _closed2) = oneshot::channel();
        let err = store.create(tx, closer).expect_err("closing");
        assert!(matches!(err, TransportError::ShuttingDown));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn handle_send_fails_after_stream_ends() {
        let store = SessionStore::default();
        let (id, rx, _closed) = open(&store);
        let handle = store.get(&id).expect("open");
        handle.send("{}".into()).await.expect("delivered");
        drop(rx);
        let err = handle.send("{}".into()).await.expect_err("closed");
        assert!(matches!(err, TransportError::ChannelClosed));
    }

    #[test]
    fn guard_removes_on_drop() {
        let store = Arc::new(SessionStore::default());
        let (id, _rx, _closed) = open(&store);
        let guard = SessionGuard::new(Arc::clone(&store), id.clone());
        assert_eq!(guard.id(), &id);
        drop(guard);
        assert!(!store.contains(&id));
    }
}
