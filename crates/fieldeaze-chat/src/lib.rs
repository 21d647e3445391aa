//! Scripted conversational assistant for Fieldeaze.
//!
//! Classifies user text with fixed rules, walks users through service
//! selection and booking, and keeps the conversation history the chat
//! view renders.

pub mod context;
pub mod engine;
pub mod error;
pub mod orchestrator;
pub mod parser;
pub mod response;
pub mod types;

pub use context::ConversationManager;
pub use engine::ReplyEngine;
pub use error::{ChatError, SelectionError};
pub use orchestrator::{ChatOrchestrator, TurnOutcome};
pub use parser::{Intent, IntentParser, MultiSelection};
pub use response::ResponseComposer;
pub use types::{
    BookingDraft, BookingSlot, ConversationState, Message, Reply, ReplyContext, SelectedItem,
    Sender,
};
