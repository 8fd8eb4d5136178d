//! Conversation state owned by one widget instance.
//!
//! The store is the only writer of [`ConversationState`]. It is append-only:
//! messages are never removed or reordered, and ids only grow.

use std::sync::{Arc, PoisonError, RwLock, RwLockWriteGuard};

use bookchat_core::{AskError, ConversationObserver, ConversationState, Message, Sender};
use chrono::Utc;
use tracing::{debug, warn};
use uuid::Uuid;

#[derive(Debug)]
struct StoreState {
    conversation: ConversationState,
    next_id: u64,
}

impl StoreState {
    fn push(&mut self, sender: Sender, text: &str) -> Message {
        let message = Message {
            id: self.next_id,
            sender,
            text: text.to_string(),
            created_at: Utc::now(),
        };
        self.next_id += 1;
        self.conversation.messages.push(message.clone());
        message
    }
}

struct StoreInner {
    session_id: Uuid,
    state: RwLock<StoreState>,
    observers: RwLock<Vec<Arc<dyn ConversationObserver>>>,
}

/// Cheap-to-clone handle; clones share one conversation.
#[derive(Clone)]
pub struct ConversationStore {
    inner: Arc<StoreInner>,
}

impl ConversationStore {
    /// Create a store seeded with an assistant greeting (id 1).
    ///
    /// A blank greeting seeds nothing.
    #[must_use]
    pub fn new(greeting: &str) -> Self {
        let mut state = StoreState {
            conversation: ConversationState::default(),
            next_id: 1,
        };
        if greeting.trim().is_empty() {
            warn!("Blank greeting, starting with an empty conversation");
        } else {
            state.push(Sender::Assistant, greeting);
        }

        Self {
            inner: Arc::new(StoreInner {
                session_id: Uuid::now_v7(),
                state: RwLock::new(state),
                observers: RwLock::new(Vec::new()),
            }),
        }
    }

    /// Identifier used to correlate log lines of one widget instance.
    #[must_use]
    pub fn session_id(&self) -> Uuid {
        self.inner.session_id
    }

    /// Append a message at the tail and notify observers.
    ///
    /// Blank text is refused: every message must render as something.
    pub fn append(&self, sender: Sender, text: &str) -> Option<Message> {
        if text.trim().is_empty() {
            warn!(sender = sender.as_str(), "Refusing to append blank message");
            return None;
        }
        Some(self.mutate(|state| state.push(sender, text)))
    }

    #[must_use]
    pub fn snapshot(&self) -> ConversationState {
        self.read(|state| state.conversation.clone())
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.read(|state| state.conversation.pending)
    }

    /// Register a render-layer observer. It is not called for past changes.
    pub fn subscribe(&self, observer: Arc<dyn ConversationObserver>) {
        self.inner
            .observers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(observer);
    }

    /// Accept a question if nothing is in flight.
    ///
    /// The pending check, the user message and the flag flip happen under one
    /// lock, so two callers can never both be accepted.
    pub(crate) fn begin_request(&self, question: &str) -> Option<Message> {
        let (message, snapshot) = {
            let mut state = self.write();
            if state.conversation.pending {
                return None;
            }
            let message = state.push(Sender::User, question);
            state.conversation.pending = true;
            (message, state.conversation.clone())
        };

        self.changed(&snapshot);
        Some(message)
    }

    /// Record the outcome of the in-flight question and clear `pending`.
    ///
    /// `error` of `None` means success and clears any previous error.
    pub(crate) fn finish_request(&self, text: &str, error: Option<AskError>) -> Message {
        self.mutate(|state| {
            let message = state.push(Sender::Assistant, text);
            state.conversation.last_error = error;
            state.conversation.pending = false;
            message
        })
    }

    fn read<R>(&self, f: impl FnOnce(&StoreState) -> R) -> R {
        f(&self.inner.state.read().unwrap_or_else(PoisonError::into_inner))
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.inner
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn mutate<R>(&self, f: impl FnOnce(&mut StoreState) -> R) -> R {
        let (result, snapshot) = {
            let mut state = self.write();
            let result = f(&mut state);
            (result, state.conversation.clone())
        };

        self.changed(&snapshot);
        result
    }

    /// Runs after the write lock is released, so observers may read back.
    fn changed(&self, snapshot: &ConversationState) {
        debug!(
            session = %self.inner.session_id,
            messages = snapshot.messages.len(),
            pending = snapshot.pending,
            "conversation changed"
        );
        self.notify(snapshot);
    }

    fn notify(&self, snapshot: &ConversationState) {
        let observers = self
            .inner
            .observers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for observer in observers {
            observer.on_change(snapshot);
        }
    }
}

impl std::fmt::Debug for ConversationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversationStore")
            .field("session_id", &self.inner.session_id)
            .field("state", &self.inner.state)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    const GREETING: &str = "Hello! I'm your book assistant.";

    #[test]
    fn starts_with_greeting() {
        let store = ConversationStore::new(GREETING);
        let state = store.snapshot();

        assert_eq!(state.messages.len(), 1);
        assert_eq!(state.messages[0].id, 1);
        assert_eq!(state.messages[0].sender, Sender::Assistant);
        assert_eq!(state.messages[0].text, GREETING);
        assert!(!state.pending);
        assert!(state.last_error.is_none());
    }

    #[test]
    fn ids_strictly_increase_in_insertion_order() {
        let store = ConversationStore::new(GREETING);
        for i in 0..10 {
            store.append(Sender::User, &format!("Message {i}"));
        }

        let ids: Vec<u64> = store.snapshot().messages.iter().map(|m| m.id).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(ids.len(), 11);
    }

    #[test]
    fn append_is_visible_immediately() {
        let store = ConversationStore::new(GREETING);
        let appended = store.append(Sender::User, "What is chapter 2 about?");

        assert_eq!(store.snapshot().last_message(), appended.as_ref());
    }

    #[test]
    fn blank_text_is_refused() {
        let store = ConversationStore::new(GREETING);
        let seen: Arc<Mutex<usize>> = Arc::default();
        let sink = Arc::clone(&seen);
        store.subscribe(Arc::new(move |_: &ConversationState| {
            *sink.lock().unwrap() += 1;
        }));

        assert!(store.append(Sender::User, "").is_none());
        assert!(store.append(Sender::Assistant, " \n\t").is_none());

        assert_eq!(store.snapshot().message_count(), 1);
        assert_eq!(*seen.lock().unwrap(), 0);
        assert_eq!(store.append(Sender::User, "hi").map(|m| m.id), Some(2));
    }

    #[test]
    fn blank_greeting_seeds_nothing() {
        let store = ConversationStore::new("  ");
        assert!(store.snapshot().messages.is_empty());
    }

    #[test]
    fn second_request_is_refused_while_pending() {
        let store = ConversationStore::new(GREETING);

        assert!(store.begin_request("a").is_some());
        assert!(store.begin_request("b").is_none());
        assert_eq!(store.snapshot().messages.len(), 2);

        store.finish_request("answer", None);
        assert!(!store.is_pending());
        assert!(store.begin_request("c").is_some());
    }

    #[test]
    fn success_clears_previous_error() {
        let store = ConversationStore::new(GREETING);
        store.begin_request("a");
        store.finish_request("fallback", Some(AskError::Transport("refused".to_string())));
        assert!(store.snapshot().last_error.is_some());

        store.begin_request("b");
        store.finish_request("answer", None);
        assert!(store.snapshot().last_error.is_none());
    }

    #[test]
    fn observers_see_consistent_state() {
        let store = ConversationStore::new(GREETING);
        let seen: Arc<Mutex<Vec<(usize, bool)>>> = Arc::default();
        let sink = Arc::clone(&seen);
        store.subscribe(Arc::new(move |state: &ConversationState| {
            sink.lock().unwrap().push((state.messages.len(), state.pending));
        }));

        store.begin_request("a");
        store.begin_request("dropped");
        store.finish_request("answer", None);

        assert_eq!(*seen.lock().unwrap(), vec![(2, true), (3, false)]);
    }
}
