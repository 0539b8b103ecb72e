//! Per-conversation binding to a backend document session.
//!
//! A successful upload returns an opaque session token. The binder records
//! it against the conversation the upload was made from; later queries in
//! that conversation carry it so the backend answers from that document.

use std::collections::HashMap;

use tracing::debug;

use docent_types::conversation::ConversationId;
use docent_types::error::ChatError;

/// Session state of one conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Unbound,
    Bound(String),
}

/// Conversation id -> session token.
///
/// Tokens never expire. A binding is replaced only by a newer `bind` for the
/// same conversation and removed only when the conversation is deleted.
#[derive(Debug, Clone, Default)]
pub struct SessionBinder {
    tokens: HashMap<ConversationId, String>,
}

impl SessionBinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record or overwrite the token for a conversation.
    pub fn bind(&mut self, conversation_id: ConversationId, token: impl Into<String>) {
        let token = token.into();
        debug!(conversation_id = %conversation_id, "Session bound");
        self.tokens.insert(conversation_id, token);
    }

    pub fn token_for(&self, conversation_id: &ConversationId) -> Option<&str> {
        self.tokens.get(conversation_id).map(String::as_str)
    }

    pub fn is_bound(&self, conversation_id: &ConversationId) -> bool {
        self.tokens.contains_key(conversation_id)
    }

    pub fn state(&self, conversation_id: &ConversationId) -> SessionState {
        match self.token_for(conversation_id) {
            Some(token) => SessionState::Bound(token.to_string()),
            None => SessionState::Unbound,
        }
    }

    /// Drop the binding of a deleted conversation.
    pub fn forget(&mut self, conversation_id: &ConversationId) -> Option<String> {
        self.tokens.remove(conversation_id)
    }
}

/// When a query may go out without a bound session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPolicy {
    /// Queries are sent with whatever token is bound, possibly none.
    Optional,
    /// Queries require a bound token.
    Required,
}

impl SessionPolicy {
    /// Decide which token (if any) a query carries.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::PreconditionNotMet`] when the policy is
    /// `Required` and no token is bound.
    pub fn resolve(&self, token: Option<&str>) -> Result<Option<String>, ChatError> {
        match (self, token) {
            (_, Some(token)) => Ok(Some(token.to_string())),
            (SessionPolicy::Optional, None) => Ok(None),
            (SessionPolicy::Required, None) => Err(ChatError::PreconditionNotMet),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_and_lookup() {
        let mut binder = SessionBinder::new();
        let id = ConversationId::new();
        assert_eq!(binder.state(&id), SessionState::Unbound);

        binder.bind(id, "sess-1");
        assert_eq!(binder.token_for(&id), Some("sess-1"));
        assert_eq!(binder.state(&id), SessionState::Bound("sess-1".to_string()));
    }

    #[test]
    fn test_later_bind_supersedes() {
        let mut binder = SessionBinder::new();
        let id = ConversationId::new();
        binder.bind(id, "sess-1");
        binder.bind(id, "sess-2");
        assert_eq!(binder.token_for(&id), Some("sess-2"));
    }

    #[test]
    fn test_bindings_are_per_conversation() {
        let mut binder = SessionBinder::new();
        let a = ConversationId::new();
        let b = ConversationId::new();
        binder.bind(a, "sess-a");
        assert!(binder.is_bound(&a));
        assert!(!binder.is_bound(&b));
    }

    #[test]
    fn test_forget_removes_binding() {
        let mut binder = SessionBinder::new();
        let id = ConversationId::new();
        binder.bind(id, "sess-1");
        assert_eq!(binder.forget(&id).as_deref(), Some("sess-1"));
        assert!(!binder.is_bound(&id));
    }

    #[test]
    fn test_optional_policy_allows_missing_token() {
        assert_eq!(SessionPolicy::Optional.resolve(None).unwrap(), None);
        assert_eq!(
            SessionPolicy::Optional.resolve(Some("t")).unwrap(),
            Some("t".to_string())
        );
    }

    #[test]
    fn test_required_policy_rejects_missing_token() {
        assert!(matches!(
            SessionPolicy::Required.resolve(None),
            Err(ChatError::PreconditionNotMet)
        ));
        assert_eq!(
            SessionPolicy::Required.resolve(Some("t")).unwrap(),
            Some("t".to_string())
        );
    }
}
