//! Chat orchestrator: validates input, routes it through the reply engine
//! and records both sides of each turn.

use std::time::Duration;

use fieldeaze_core::{AssistantConfig, CatalogSource};
use tracing::{debug, info};

use crate::context::ConversationManager;
use crate::engine::ReplyEngine;
use crate::error::ChatError;
use crate::response::ResponseComposer;
use crate::types::{ConversationState, Message, CALL_SUPPORT};

/// What the presentation layer should do after a user turn.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    /// The bot replied; the message is already in the conversation.
    Replied(Message),
    /// Open the phone dialer. The conversation is left untouched.
    Dial { uri: String },
}

/// Central coordinator between the presentation layer and the engine.
pub struct ChatOrchestrator<C: CatalogSource> {
    engine: ReplyEngine<C>,
    context_manager: ConversationManager,
    config: AssistantConfig,
}

impl<C: CatalogSource> ChatOrchestrator<C> {
    pub fn new(config: AssistantConfig, catalog: C) -> Self {
        let engine = ReplyEngine::from_config(catalog, &config);
        let context_manager = ConversationManager::new(
            &config.assistant_name,
            ResponseComposer::new(
                config.faq_preview_count,
                config.faq_page_size,
                &config.currency_symbol,
            ),
        );
        Self {
            engine,
            context_manager,
            config,
        }
    }

    pub fn engine(&self) -> &ReplyEngine<C> {
        &self.engine
    }

    pub fn config(&self) -> &AssistantConfig {
        &self.config
    }

    /// A new conversation opened with the welcome message.
    pub fn start_conversation(&self) -> ConversationState {
        self.context_manager.create_session()
    }

    /// Handle one user message.
    ///
    /// The reply is computed from the context of the last bot message, read
    /// before the user message is appended.
    pub fn handle_message(
        &self,
        state: &mut ConversationState,
        text: &str,
    ) -> Result<TurnOutcome, ChatError> {
        if !self.config.enabled {
            return Err(ChatError::Disabled);
        }

        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        if trimmed.chars().count() > self.config.max_message_length {
            return Err(ChatError::MessageTooLong(self.config.max_message_length));
        }

        if trimmed.eq_ignore_ascii_case(CALL_SUPPORT) {
            info!(conversation = %state.id, "Support call requested");
            return Ok(TurnOutcome::Dial {
                uri: format!("tel:{}", self.config.support_phone),
            });
        }

        let prior = state.current_context().clone();
        self.context_manager.append_user(state, trimmed);

        let reply = self.engine.reply(trimmed, &prior);
        let message = self.context_manager.append_bot(state, reply);
        debug!(
            conversation = %state.id,
            message_id = message.id,
            "Reply appended"
        );

        Ok(TurnOutcome::Replied(message))
    }

    /// Text of the 1-based quick reply `position` on the latest bot message.
    pub fn quick_reply(&self, state: &ConversationState, position: usize) -> Option<String> {
        let index = position.checked_sub(1)?;
        state
            .last_bot_message()
            .and_then(|m| m.quick_replies.get(index))
            .cloned()
    }

    /// Abandon any open sub-flow and greet the user again.
    pub fn reset(&self, state: &mut ConversationState) -> Message {
        self.context_manager.reset(state)
    }

    /// Pause presentation layers show before revealing a bot reply.
    pub fn typing_delay(&self) -> Duration {
        Duration::from_millis(self.config.typing_delay_ms)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ReplyContext, Sender};
    use fieldeaze_core::Catalog;

    fn default_orchestrator() -> ChatOrchestrator<Catalog> {
        ChatOrchestrator::new(AssistantConfig::default(), Catalog::sample())
    }

    fn replied(outcome: TurnOutcome) -> Message {
        match outcome {
            TurnOutcome::Replied(message) => message,
            other => panic!("expected a reply, got {:?}", other),
        }
    }

    #[test]
    fn test_disabled_returns_error() {
        let config = AssistantConfig {
            enabled: false,
            ..AssistantConfig::default()
        };
        let orch = ChatOrchestrator::new(config, Catalog::sample());
        let mut state = orch.start_conversation();
        let result = orch.handle_message(&mut state, "hi");
        assert!(matches!(result, Err(ChatError::Disabled)));
    }

    #[test]
    fn test_empty_and_whitespace_messages_rejected() {
        let orch = default_orchestrator();
        let mut state = orch.start_conversation();
        for text in ["", "   ", "\n\t"] {
            let result = orch.handle_message(&mut state, text);
            assert!(matches!(result, Err(ChatError::EmptyMessage)));
        }
        assert_eq!(state.messages.len(), 1);
    }

    #[test]
    fn test_message_too_long_returns_error() {
        let orch = default_orchestrator();
        let mut state = orch.start_conversation();
        let long = "a".repeat(2001);
        let result = orch.handle_message(&mut state, &long);
        assert!(matches!(result, Err(ChatError::MessageTooLong(2000))));
    }

    #[test]
    fn test_message_at_max_length_ok() {
        let orch = default_orchestrator();
        let mut state = orch.start_conversation();
        let exact = "a".repeat(2000);
        assert!(orch.handle_message(&mut state, &exact).is_ok());
    }

    #[test]
    fn test_turn_appends_user_then_bot() {
        let orch = default_orchestrator();
        let mut state = orch.start_conversation();
        let reply = replied(orch.handle_message(&mut state, "hi").unwrap());

        assert_eq!(state.messages.len(), 3);
        assert_eq!(state.messages[1].sender, Sender::User);
        assert_eq!(state.messages[1].text, "hi");
        assert_eq!(reply.sender, Sender::Bot);
        assert_eq!(reply.id, 3);
        assert!(reply.text.starts_with("Hello!"));
    }

    #[test]
    fn test_context_flows_between_turns() {
        let orch = default_orchestrator();
        let mut state = orch.start_conversation();
        orch.handle_message(&mut state, "Show services").unwrap();
        assert_eq!(state.current_context(), &ReplyContext::AwaitingServiceNumber);

        let reply = replied(orch.handle_message(&mut state, "2").unwrap());
        assert!(reply.text.starts_with("Home Cleaning options:"));
    }

    #[test]
    fn test_call_support_dials_without_touching_history() {
        let orch = default_orchestrator();
        let mut state = orch.start_conversation();
        let outcome = orch.handle_message(&mut state, "Call Support").unwrap();
        assert_eq!(
            outcome,
            TurnOutcome::Dial {
                uri: "tel:+919677782813".to_string()
            }
        );
        assert_eq!(state.messages.len(), 1);
    }

    #[test]
    fn test_call_support_uses_configured_phone() {
        let config = AssistantConfig {
            support_phone: "+15550100".to_string(),
            ..AssistantConfig::default()
        };
        let orch = ChatOrchestrator::new(config, Catalog::sample());
        let mut state = orch.start_conversation();
        let outcome = orch.handle_message(&mut state, "call support").unwrap();
        assert_eq!(
            outcome,
            TurnOutcome::Dial {
                uri: "tel:+15550100".to_string()
            }
        );
    }

    #[test]
    fn test_quick_reply_lookup() {
        let orch = default_orchestrator();
        let state = orch.start_conversation();
        assert_eq!(orch.quick_reply(&state, 1).as_deref(), Some("Show services"));
        assert_eq!(orch.quick_reply(&state, 3).as_deref(), Some("FAQs"));
        assert!(orch.quick_reply(&state, 0).is_none());
        assert!(orch.quick_reply(&state, 4).is_none());
    }

    #[test]
    fn test_reset_abandons_multi_select() {
        let orch = default_orchestrator();
        let mut state = orch.start_conversation();
        orch.handle_message(&mut state, "services").unwrap();
        orch.handle_message(&mut state, "1").unwrap();
        orch.handle_message(&mut state, "2").unwrap();
        assert_eq!(state.selected_items().len(), 1);

        orch.reset(&mut state);
        assert!(state.current_context().is_none());
        assert!(state.selected_items().is_empty());
    }

    #[test]
    fn test_typing_delay_from_config() {
        assert_eq!(
            default_orchestrator().typing_delay(),
            Duration::from_millis(600)
        );
        let config = AssistantConfig {
            typing_delay_ms: 0,
            ..AssistantConfig::default()
        };
        let orch = ChatOrchestrator::new(config, Catalog::sample());
        assert_eq!(orch.typing_delay(), Duration::ZERO);
    }

    #[test]
    fn test_faq_paging_from_config() {
        let config = AssistantConfig {
            faq_preview_count: 1,
            ..AssistantConfig::default()
        };
        let orch = ChatOrchestrator::new(config, Catalog::sample());
        let mut state = orch.start_conversation();
        let reply = replied(orch.handle_message(&mut state, "faq").unwrap());
        assert_eq!(reply.text.matches("Q: ").count(), 1);
    }
}
