//! In-memory session store with per-session locking

use std::collections::HashMap;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

use super::types::{Message, Session};
use crate::config::schema::ClearPolicy;

#[derive(Debug)]
struct SessionSlot {
    session: Session,
    /// Set when the session was removed from the map while waiters held the slot.
    retired: bool,
}

type SharedSlot = Arc<Mutex<SessionSlot>>;

/// Exclusive access to one session, held for a whole conversation turn.
pub struct SessionGuard {
    inner: OwnedMutexGuard<SessionSlot>,
    cap: usize,
}

impl SessionGuard {
    /// Refresh the system message and append a user message, enforcing the cap.
    pub fn append_user(&mut self, system: Message, content: impl Into<String>) {
        let cap = self.cap;
        self.inner.session.append_user(system, content, cap);
    }

    /// Append an assistant reply, enforcing the cap.
    pub fn append_assistant(&mut self, content: impl Into<String>) {
        let cap = self.cap;
        self.inner.session.append_assistant(content, cap);
    }
}

impl Deref for SessionGuard {
    type Target = Session;

    fn deref(&self) -> &Session {
        &self.inner.session
    }
}

impl DerefMut for SessionGuard {
    fn deref_mut(&mut self) -> &mut Session {
        &mut self.inner.session
    }
}

/// Maps session ids to conversation histories.
///
/// Operations on one id are serialized through that session's mutex while
/// distinct ids never contend beyond the short map lookup.
#[derive(Debug)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, SharedSlot>>,
    history_cap: usize,
    clear_policy: ClearPolicy,
    reset_message: Option<Message>,
}

impl SessionStore {
    /// Create a store keeping at most `history_cap` non-system messages per session
    pub fn new(history_cap: usize, clear_policy: ClearPolicy) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            history_cap: history_cap.max(1),
            clear_policy,
            reset_message: None,
        }
    }

    /// System message installed by [`ClearPolicy::Reset`]
    pub fn with_reset_message(mut self, message: Message) -> Self {
        self.reset_message = Some(message);
        self
    }

    pub fn history_cap(&self) -> usize {
        self.history_cap
    }

    pub fn clear_policy(&self) -> ClearPolicy {
        self.clear_policy
    }

    fn slot(&self, id: &str) -> SharedSlot {
        if let Some(slot) = self.sessions.read().get(id) {
            return Arc::clone(slot);
        }

        let mut sessions = self.sessions.write();
        let slot = sessions.entry(id.to_string()).or_insert_with(|| {
            debug!(session_id = %id, "Creating session");
            Arc::new(Mutex::new(SessionSlot {
                session: Session::new(id),
                retired: false,
            }))
        });
        Arc::clone(slot)
    }

    /// Lock a session, creating it on first access.
    pub async fn lock(&self, id: &str) -> SessionGuard {
        loop {
            let slot = self.slot(id);
            let inner = slot.lock_owned().await;
            if !inner.retired {
                return SessionGuard {
                    inner,
                    cap: self.history_cap,
                };
            }
            // Cleared while we waited: the next lookup creates a fresh session.
        }
    }

    /// Snapshot of a session, creating an empty one for unseen ids
    pub async fn get_or_create(&self, id: &str) -> Session {
        self.lock(id).await.clone()
    }

    /// Refresh the system prompt, append a user message and return the
    /// history to send upstream.
    pub async fn append_user(
        &self,
        id: &str,
        system: Message,
        content: impl Into<String>,
    ) -> Vec<Message> {
        let mut guard = self.lock(id).await;
        guard.append_user(system, content);
        guard.messages().to_vec()
    }

    /// Append a completion result to a session's history
    pub async fn append_assistant(&self, id: &str, content: impl Into<String>) {
        self.lock(id).await.append_assistant(content);
    }

    /// Clear a session according to the configured policy.
    ///
    /// Returns `false` when the id was unknown; clearing is always safe to repeat.
    pub async fn clear(&self, id: &str) -> bool {
        let Some(slot) = self.sessions.read().get(id).cloned() else {
            return false;
        };

        let mut inner = Arc::clone(&slot).lock_owned().await;
        if inner.retired {
            return false;
        }

        match self.clear_policy {
            ClearPolicy::Remove => {
                inner.retired = true;
                inner.session.reset(None);
                let mut sessions = self.sessions.write();
                if sessions
                    .get(id)
                    .is_some_and(|current| Arc::ptr_eq(current, &slot))
                {
                    sessions.remove(id);
                }
            }
            ClearPolicy::Reset => {
                inner.session.reset(self.reset_message.clone());
            }
        }

        debug!(session_id = %id, policy = ?self.clear_policy, "Cleared session");
        true
    }

    /// Number of live sessions
    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }

    /// Ids of live sessions, sorted
    pub fn session_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.sessions.read().keys().cloned().collect();
        ids.sort();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Role;
    use std::time::Duration;

    fn store(cap: usize) -> SessionStore {
        SessionStore::new(cap, ClearPolicy::Remove)
    }

    #[tokio::test]
    async fn test_get_or_create_returns_empty_session() {
        let store = store(10);
        let session = store.get_or_create("default").await;
        assert_eq!(session.id, "default");
        assert!(session.is_empty());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_append_user_returns_outbound_history() {
        let store = store(10);
        let outbound = store
            .append_user("default", Message::system("sys"), "hello")
            .await;

        assert_eq!(outbound.len(), 2);
        assert_eq!(outbound[0].role, Role::System);
        assert_eq!(outbound[1], Message::user("hello"));
    }

    #[tokio::test]
    async fn test_history_cap_across_turns() {
        let store = store(10);
        for i in 0..12 {
            store
                .append_user("s", Message::system("sys"), format!("user {}", i))
                .await;
            store.append_assistant("s", format!("assistant {}", i)).await;
        }

        let session = store.get_or_create("s").await;
        assert_eq!(session.non_system_len(), 10);
        assert_eq!(session.messages()[0].role, Role::System);
        assert_eq!(session.messages()[1].content, "user 7");
        assert_eq!(session.messages()[10].content, "assistant 11");
        assert!(!session
            .messages()
            .iter()
            .any(|m| m.content == "user 0" || m.content == "user 1"));
    }

    #[tokio::test]
    async fn test_clear_unknown_session_is_noop() {
        let store = store(10);
        assert!(!store.clear("missing").await);
        assert!(!store.clear("missing").await);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_clear_remove_policy_drops_history() {
        let store = store(10);
        for i in 0..5 {
            store
                .append_user("s", Message::system("sys"), format!("m{}", i))
                .await;
        }

        assert!(store.clear("s").await);
        assert!(store.is_empty());
        let session = store.get_or_create("s").await;
        assert!(session.is_empty());
    }

    #[tokio::test]
    async fn test_clear_reset_policy_keeps_system_only() {
        let store = SessionStore::new(10, ClearPolicy::Reset)
            .with_reset_message(Message::system("start over"));
        store.append_user("s", Message::system("sys"), "hi").await;
        store.append_assistant("s", "hello!").await;

        assert!(store.clear("s").await);
        let session = store.get_or_create("s").await;
        assert_eq!(session.messages(), &[Message::system("start over")]);
    }

    #[tokio::test]
    async fn test_clear_waits_for_in_flight_turn() {
        let store = Arc::new(store(10));
        let mut guard = store.lock("s").await;
        guard.append_user(Message::system("sys"), "hi");

        let clearing = {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.clear("s").await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!clearing.is_finished());

        guard.append_assistant("hello");
        drop(guard);

        assert!(clearing.await.unwrap());
        assert!(store.get_or_create("s").await.is_empty());
    }

    #[tokio::test]
    async fn test_waiter_on_cleared_session_gets_fresh_one() {
        let store = Arc::new(store(10));
        let guard = store.lock("s").await;

        let clearing = {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.clear("s").await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        let waiter = {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                let mut guard = store.lock("s").await;
                guard.append_user(Message::system("sys"), "after clear");
            })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        drop(guard);

        clearing.await.unwrap();
        waiter.await.unwrap();

        let session = store.get_or_create("s").await;
        assert_eq!(session.non_system_len(), 1);
        assert_eq!(session.messages()[1].content, "after clear");
    }

    #[tokio::test]
    async fn test_distinct_sessions_do_not_block() {
        let store = store(10);
        let _held = store.lock("a").await;

        let other = tokio::time::timeout(Duration::from_millis(100), store.lock("b")).await;
        assert!(other.is_ok());
    }

    #[tokio::test]
    async fn test_concurrent_turns_on_one_session_are_not_lost() {
        let store = Arc::new(store(100));
        let mut handles = Vec::new();
        for i in 0..20 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                let mut guard = store.lock("shared").await;
                guard.append_user(Message::system("sys"), format!("u{}", i));
                tokio::task::yield_now().await;
                guard.append_assistant(format!("a{}", i));
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let session = store.get_or_create("shared").await;
        assert_eq!(session.non_system_len(), 40);
        // Each turn stays contiguous: every user message is followed by its reply.
        for pair in session.messages()[1..].chunks(2) {
            let n = pair[0].content.trim_start_matches('u');
            assert_eq!(pair[1].content, format!("a{}", n));
        }
    }

    #[tokio::test]
    async fn test_session_ids_sorted() {
        let store = store(10);
        store.get_or_create("b").await;
        store.get_or_create("a").await;
        assert_eq!(store.session_ids(), vec!["a".to_string(), "b".to_string()]);
    }
}
