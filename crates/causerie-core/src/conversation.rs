//! Per-chat conversation state.
//!
//! Keeps the ordered turn history each chat accumulates between session
//! resets. History lives only in process memory; it does not survive a
//! restart. Handlers may run on parallel tokio tasks, so the map is a
//! `DashMap` rather than a bare `HashMap`.

use causerie_types::chat::Turn;
use causerie_types::identity::ChatId;
use dashmap::DashMap;

/// In-memory conversation history, keyed by chat.
///
/// Turns are appended in strict user/assistant pairs, so the stored length
/// is always even and alternates roles starting with `user`.
pub struct ConversationState {
    history: DashMap<ChatId, Vec<Turn>>,
    /// Maximum turns kept per chat; 0 disables the cap.
    limit: usize,
}

impl ConversationState {
    /// Create a conversation store with the given per-chat turn cap.
    pub fn new(history_limit: usize) -> Self {
        Self {
            history: DashMap::new(),
            limit: history_limit,
        }
    }

    /// Reset the chat's history to an empty sequence. Idempotent.
    pub fn start_session(&self, chat: ChatId) {
        self.history.insert(chat, Vec::new());
    }

    /// The chat's current ordered turns.
    ///
    /// A chat that has never been seen gets an empty record rather than an
    /// error, so a question can arrive before any explicit session start.
    pub fn history(&self, chat: ChatId) -> Vec<Turn> {
        self.history.entry(chat).or_default().clone()
    }

    /// Append one user turn then one assistant turn to the chat's history.
    ///
    /// When the configured cap is exceeded, the oldest turns are dropped in
    /// whole exchanges so the pair alternation survives trimming.
    pub fn append_exchange(&self, chat: ChatId, user_text: &str, assistant_text: &str) {
        let mut entry = self.history.entry(chat).or_default();
        entry.push(Turn::user(user_text));
        entry.push(Turn::assistant(assistant_text));

        if self.limit > 0 && entry.len() > self.limit {
            let mut excess = entry.len() - self.limit;
            // Round up to a whole exchange.
            if excess % 2 != 0 {
                excess += 1;
            }
            entry.drain(..excess);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use causerie_types::chat::MessageRole;

    #[test]
    fn test_history_empty_after_start_session() {
        let state = ConversationState::new(0);
        let chat = ChatId(1);

        state.append_exchange(chat, "q", "a");
        assert_eq!(state.history(chat).len(), 2);

        state.start_session(chat);
        assert!(state.history(chat).is_empty());
    }

    #[test]
    fn test_start_session_idempotent() {
        let state = ConversationState::new(0);
        let chat = ChatId(1);
        state.start_session(chat);
        state.start_session(chat);
        assert!(state.history(chat).is_empty());
    }

    #[test]
    fn test_unknown_chat_gets_empty_history() {
        let state = ConversationState::new(0);
        assert!(state.history(ChatId(99)).is_empty());
    }

    #[test]
    fn test_exchanges_alternate_and_double() {
        let state = ConversationState::new(0);
        let chat = ChatId(7);

        for i in 0..5 {
            state.append_exchange(chat, &format!("q{i}"), &format!("a{i}"));
        }

        let history = state.history(chat);
        assert_eq!(history.len(), 10);
        for (i, turn) in history.iter().enumerate() {
            let expected = if i % 2 == 0 {
                MessageRole::User
            } else {
                MessageRole::Assistant
            };
            assert_eq!(turn.role, expected);
        }
        assert_eq!(history[0].content, "q0");
        assert_eq!(history[9].content, "a4");
    }

    #[test]
    fn test_history_cap_trims_whole_exchanges() {
        let state = ConversationState::new(4);
        let chat = ChatId(3);

        for i in 0..4 {
            state.append_exchange(chat, &format!("q{i}"), &format!("a{i}"));
        }

        let history = state.history(chat);
        assert_eq!(history.len(), 4);
        // Oldest exchanges dropped; the survivors still start with a user turn.
        assert_eq!(history[0].content, "q2");
        assert_eq!(history[0].role, MessageRole::User);
        assert_eq!(history[3].content, "a3");
    }

    #[test]
    fn test_odd_cap_rounds_to_pairs() {
        let state = ConversationState::new(3);
        let chat = ChatId(4);

        state.append_exchange(chat, "q0", "a0");
        state.append_exchange(chat, "q1", "a1");

        let history = state.history(chat);
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].content, "q1");
    }

    #[test]
    fn test_zero_cap_is_unbounded() {
        let state = ConversationState::new(0);
        let chat = ChatId(5);
        for i in 0..100 {
            state.append_exchange(chat, &format!("q{i}"), &format!("a{i}"));
        }
        assert_eq!(state.history(chat).len(), 200);
    }

    #[test]
    fn test_chats_are_independent() {
        let state = ConversationState::new(0);
        state.append_exchange(ChatId(1), "one", "un");
        state.append_exchange(ChatId(2), "two", "deux");

        assert_eq!(state.history(ChatId(1)).len(), 2);
        assert_eq!(state.history(ChatId(2)).len(), 2);
        assert_eq!(state.history(ChatId(1))[0].content, "one");

        state.start_session(ChatId(1));
        assert!(state.history(ChatId(1)).is_empty());
        assert_eq!(state.history(ChatId(2)).len(), 2);
    }
}
