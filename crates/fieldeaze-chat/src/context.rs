//! Conversation history management.
//!
//! Appends messages to a [`ConversationState`] with monotonic ids and
//! timestamps. The state itself is owned by the caller.

use chrono::Local;
use tracing::debug;

use crate::response::ResponseComposer;
use crate::types::{ConversationState, Message, Reply, ReplyContext, Sender};

// =============================================================================
// ConversationManager
// =============================================================================

/// Creates conversations and appends turns to them.
pub struct ConversationManager {
    /// Name used in the welcome message.
    pub assistant_name: String,
    composer: ResponseComposer,
}

impl ConversationManager {
    pub fn new(assistant_name: &str, composer: ResponseComposer) -> Self {
        Self {
            assistant_name: assistant_name.to_string(),
            composer,
        }
    }

    /// Start a conversation holding only the welcome message.
    pub fn create_session(&self) -> ConversationState {
        let mut state = ConversationState::new();
        self.append_bot(&mut state, self.welcome());
        debug!(conversation = %state.id, "Conversation started");
        state
    }

    /// Append the user's text. User messages carry no context.
    pub fn append_user(&self, state: &mut ConversationState, text: &str) -> Message {
        self.push(state, text.to_string(), Sender::User, vec![], ReplyContext::None)
    }

    /// Append a bot reply, keeping its quick replies and context.
    pub fn append_bot(&self, state: &mut ConversationState, reply: Reply) -> Message {
        self.push(
            state,
            reply.text,
            Sender::Bot,
            reply.quick_replies,
            reply.next_context,
        )
    }

    /// Abandon any open sub-flow by appending a fresh welcome message.
    ///
    /// History is kept; only the pending context is cleared.
    pub fn reset(&self, state: &mut ConversationState) -> Message {
        debug!(conversation = %state.id, "Conversation reset");
        self.append_bot(state, self.welcome())
    }

    fn welcome(&self) -> Reply {
        self.composer.welcome(&self.assistant_name)
    }

    fn push(
        &self,
        state: &mut ConversationState,
        text: String,
        sender: Sender,
        quick_replies: Vec<String>,
        context: ReplyContext,
    ) -> Message {
        let message = Message {
            id: state.next_message_id,
            text,
            sender,
            quick_replies,
            context,
            created_at: Local::now().timestamp(),
        };
        state.next_message_id += 1;
        state.messages.push(message.clone());
        message
    }
}

// =============================================================================
// Tests
// =============================================================================
