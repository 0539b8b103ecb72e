//! In-memory conversation store.
//!
//! Holds the ordered set of conversations (most recently created first), the
//! current-conversation pointer, and each conversation's message log.
//! Nothing here is persisted; the store lives as long as the process.

use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use docent_types::conversation::{Attachment, Conversation, ConversationId, Message, Sender};

/// Longest title derived from a first user message, in characters.
pub const TITLE_MAX_CHARS: usize = 50;

/// Derive a conversation title from its first user message.
///
/// Keeps the first [`TITLE_MAX_CHARS`] characters and appends `...` only
/// when the content is longer than that.
pub fn derive_title(content: &str) -> String {
    if content.chars().count() > TITLE_MAX_CHARS {
        let head: String = content.chars().take(TITLE_MAX_CHARS).collect();
        format!("{head}...")
    } else {
        content.to_string()
    }
}

/// Owns every conversation of one chat stack.
#[derive(Debug, Clone)]
pub struct ConversationStore {
    default_title: String,
    conversations: Vec<Conversation>,
    current: Option<ConversationId>,
}

impl ConversationStore {
    /// Create an empty store. New conversations start with `default_title`.
    pub fn new(default_title: impl Into<String>) -> Self {
        Self {
            default_title: default_title.into(),
            conversations: Vec::new(),
            current: None,
        }
    }

    pub fn default_title(&self) -> &str {
        &self.default_title
    }

    /// All conversations, most recently created first.
    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }

    pub fn get(&self, id: &ConversationId) -> Option<&Conversation> {
        self.conversations.iter().find(|c| &c.id == id)
    }

    pub fn current_id(&self) -> Option<ConversationId> {
        self.current
    }

    /// The selected conversation, if it exists.
    pub fn current(&self) -> Option<&Conversation> {
        self.current.as_ref().and_then(|id| self.get(id))
    }

    /// Messages of the selected conversation; empty when nothing (or an
    /// unknown id) is selected.
    pub fn current_messages(&self) -> &[Message] {
        self.current().map(|c| c.messages.as_slice()).unwrap_or(&[])
    }

    /// Insert a fresh conversation at the front and make it current.
    pub fn create_conversation(&mut self) -> ConversationId {
        let now = Utc::now();
        let conversation = Conversation {
            id: ConversationId::new(),
            title: self.default_title.clone(),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        let id = conversation.id;
        self.conversations.insert(0, conversation);
        self.current = Some(id);
        debug!(conversation_id = %id, "Conversation created");
        id
    }

    /// Point the store at `id`. Existence is not checked.
    pub fn select_conversation(&mut self, id: ConversationId) {
        self.current = Some(id);
    }

    /// Deselect without deleting anything.
    pub fn clear_current(&mut self) {
        self.current = None;
    }

    /// Append to the current conversation.
    ///
    /// Silently does nothing (returns `None`) when no conversation is
    /// current or the current id is unknown.
    pub fn append_message(
        &mut self,
        content: impl Into<String>,
        sender: Sender,
        attachment: Option<Attachment>,
    ) -> Option<Message> {
        let id = self.current?;
        self.append_to(&id, content, sender, attachment)
    }

    /// Append to a specific conversation, current or not.
    ///
    /// Returns the stored message, or `None` if the conversation no longer
    /// exists. The first user message of a conversation sets its title.
    pub fn append_to(
        &mut self,
        id: &ConversationId,
        content: impl Into<String>,
        sender: Sender,
        attachment: Option<Attachment>,
    ) -> Option<Message> {
        let conversation = self.conversations.iter_mut().find(|c| &c.id == id)?;
        let content = content.into();

        if conversation.messages.is_empty() && sender == Sender::User {
            conversation.title = derive_title(&content);
        }

        let message = Message {
            id: Uuid::now_v7(),
            content,
            sender,
            timestamp: Utc::now(),
            attachment,
        };
        conversation.messages.push(message.clone());
        conversation.updated_at = conversation.updated_at.max(message.timestamp);
        Some(message)
    }

    /// Replace the title with `new_title` as given, unless it is blank.
    /// Returns whether it changed.
    pub fn rename_conversation(&mut self, id: &ConversationId, new_title: &str) -> bool {
        if new_title.trim().is_empty() {
            return false;
        }
        let Some(conversation) = self.conversations.iter_mut().find(|c| &c.id == id) else {
            return false;
        };
        conversation.title = new_title.to_string();
        conversation.updated_at = conversation.updated_at.max(Utc::now());
        true
    }

    /// Remove a conversation. Clears the current pointer if it pointed here;
    /// no other conversation is selected in its place.
    pub fn delete_conversation(&mut self, id: &ConversationId) -> bool {
        let before = self.conversations.len();
        self.conversations.retain(|c| &c.id != id);
        if self.current.as_ref() == Some(id) {
            self.current = None;
        }
        let removed = self.conversations.len() != before;
        if removed {
            debug!(conversation_id = %id, "Conversation deleted");
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> ConversationStore {
        ConversationStore::new("New Chat")
    }

    #[test]
    fn test_create_inserts_at_front_and_selects() {
        let mut store = store();
        let first = store.create_conversation();
        let second = store.create_conversation();

        assert_eq!(store.len(), 2);
        assert_eq!(store.conversations()[0].id, second);
        assert_eq!(store.conversations()[1].id, first);
        assert_eq!(store.current_id(), Some(second));
        assert_eq!(store.conversations()[0].title, "New Chat");
    }

    #[test]
    fn test_append_without_current_is_noop() {
        let mut store = store();
        store.create_conversation();
        store.clear_current();

        assert!(store.append_message("hi", Sender::User, None).is_none());
        assert_eq!(store.conversations()[0].message_count(), 0);
    }

    #[test]
    fn test_select_unknown_yields_empty_view() {
        let mut store = store();
        store.create_conversation();
        store.append_message("hello", Sender::User, None);

        store.select_conversation(ConversationId::new());
        assert!(store.current_messages().is_empty());
        assert!(store.append_message("lost", Sender::User, None).is_none());
    }

    #[test]
    fn test_first_user_message_sets_title() {
        let mut store = store();
        let id = store.create_conversation();
        store.append_message("Hi there", Sender::User, None);

        let conversation = store.get(&id).unwrap();
        assert_eq!(conversation.title, "Hi there");
        assert_eq!(conversation.message_count(), 1);
    }

    #[test]
    fn test_title_truncates_long_message() {
        let mut store = store();
        let id = store.create_conversation();
        let content = "a".repeat(60);
        store.append_message(content.clone(), Sender::User, None);

        let title = &store.get(&id).unwrap().title;
        assert_eq!(title, &format!("{}...", &content[..50]));
    }

    #[test]
    fn test_title_exactly_fifty_chars_has_no_ellipsis() {
        let content = "b".repeat(50);
        assert_eq!(derive_title(&content), content);
    }

    #[test]
    fn test_title_counts_characters_not_bytes() {
        let content = "é".repeat(51);
        let title = derive_title(&content);
        assert_eq!(title.chars().count(), 53);
        assert!(title.ends_with("..."));
    }

    #[test]
    fn test_title_only_derived_from_first_message() {
        let mut store = store();
        let id = store.create_conversation();
        store.append_message("Hello", Sender::User, None);
        store.append_message("Something else entirely", Sender::User, None);
        assert_eq!(store.get(&id).unwrap().title, "Hello");
    }

    #[test]
    fn test_title_not_derived_when_first_message_is_not_user() {
        let mut store = store();
        let id = store.create_conversation();
        store.append_message("Document ready", Sender::System, None);
        store.append_message("What is it about?", Sender::User, None);
        assert_eq!(store.get(&id).unwrap().title, "New Chat");
    }

    #[test]
    fn test_updated_at_is_non_decreasing() {
        let mut store = store();
        let id = store.create_conversation();
        let mut previous = store.get(&id).unwrap().updated_at;

        for i in 0..50 {
            let sender = if i % 2 == 0 { Sender::User } else { Sender::Assistant };
            store.append_message(format!("message {i}"), sender, None);
            let updated = store.get(&id).unwrap().updated_at;
            assert!(updated >= previous);
            previous = updated;
        }
    }

    #[test]
    fn test_messages_keep_insertion_order() {
        let mut store = store();
        store.create_conversation();
        for i in 0..5 {
            store.append_message(format!("{i}"), Sender::User, None);
        }
        let contents: Vec<&str> = store
            .current_messages()
            .iter()
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(contents, vec!["0", "1", "2", "3", "4"]);
    }

    #[test]
    fn test_append_to_non_current_conversation() {
        let mut store = store();
        let background = store.create_conversation();
        let foreground = store.create_conversation();

        store.append_to(&background, "late answer", Sender::Assistant, None);

        assert_eq!(store.current_id(), Some(foreground));
        assert!(store.current_messages().is_empty());
        assert_eq!(store.get(&background).unwrap().message_count(), 1);
    }

    #[test]
    fn test_append_keeps_attachment_metadata() {
        let mut store = store();
        store.create_conversation();
        let attachment = Attachment {
            name: "paper.pdf".to_string(),
            size_bytes: 4096,
        };
        let message = store
            .append_message("uploaded", Sender::System, Some(attachment.clone()))
            .unwrap();
        assert_eq!(message.attachment, Some(attachment));
    }

    #[test]
    fn test_rename_replaces_title() {
        let mut store = store();
        let id = store.create_conversation();
        let before = store.get(&id).unwrap().updated_at;
        assert!(store.rename_conversation(&id, "Thesis notes"));
        let renamed = store.get(&id).unwrap();
        assert_eq!(renamed.title, "Thesis notes");
        assert!(renamed.updated_at >= before);
    }

    #[test]
    fn test_rename_keeps_title_as_given() {
        let mut store = store();
        let id = store.create_conversation();
        assert!(store.rename_conversation(&id, "  Draft 2 "));
        assert_eq!(store.get(&id).unwrap().title, "  Draft 2 ");
    }

    #[test]
    fn test_rename_blank_is_noop() {
        let mut store = store();
        let id = store.create_conversation();
        let before = store.get(&id).unwrap().clone();

        assert!(!store.rename_conversation(&id, ""));
        assert!(!store.rename_conversation(&id, "   \t"));

        let after = store.get(&id).unwrap();
        assert_eq!(after.title, before.title);
        assert_eq!(after.updated_at, before.updated_at);
    }

    #[test]
    fn test_rename_unknown_is_noop() {
        let mut store = store();
        store.create_conversation();
        assert!(!store.rename_conversation(&ConversationId::new(), "x"));
    }

    #[test]
    fn test_delete_current_clears_pointer() {
        let mut store = store();
        let other = store.create_conversation();
        let current = store.create_conversation();

        assert!(store.delete_conversation(&current));
        assert_eq!(store.current_id(), None);
        assert!(store.get(&current).is_none());
        assert!(store.get(&other).is_some());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_delete_non_current_keeps_pointer() {
        let mut store = store();
        let other = store.create_conversation();
        let current = store.create_conversation();

        assert!(store.delete_conversation(&other));
        assert_eq!(store.current_id(), Some(current));
        assert!(!store.conversations().iter().any(|c| c.id == other));
    }

    #[test]
    fn test_delete_unknown_returns_false() {
        let mut store = store();
        store.create_conversation();
        assert!(!store.delete_conversation(&ConversationId::new()));
        assert_eq!(store.len(), 1);
    }
}
