//! Conversation data model: messages, context tokens and replies.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Quick replies
// =============================================================================

pub const SHOW_SERVICES: &str = "Show services";
pub const SHOW_OFFERS: &str = "Show offers";
pub const FAQS: &str = "FAQs";
pub const MORE_FAQS: &str = "More FAQs";
pub const CALL_SUPPORT: &str = "Call Support";
pub const BOOK_NOW: &str = "Book now";
pub const SHOW_MORE: &str = "Show more";
pub const USE_LIVE_LOCATION: &str = "Use live location";
pub const DONE: &str = "Done";

/// Menu offered with greetings and on fallback.
pub fn default_menu() -> Vec<String> {
    [SHOW_SERVICES, SHOW_OFFERS, FAQS, CALL_SUPPORT]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

// =============================================================================
// Message
// =============================================================================

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    Bot,
    User,
}

/// One turn in the conversation. Never modified after it is appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Monotonic within a conversation; creation order is display order.
    pub id: u64,
    pub text: String,
    pub sender: Sender,
    /// Shortcuts for the next user turn.
    #[serde(default)]
    pub quick_replies: Vec<String>,
    /// What the assistant expects next. Only meaningful on bot messages.
    #[serde(default)]
    pub context: ReplyContext,
    /// Epoch seconds.
    pub created_at: i64,
}

// =============================================================================
// Context token
// =============================================================================

/// A catalog category the user picked during a multi-select sub-flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedItem {
    pub service_id: String,
    pub category_id: String,
    pub name: String,
    pub price: String,
}

/// Fields collected, one per turn, to complete a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingSlot {
    Name,
    ContactNumber,
    Address,
}

impl BookingSlot {
    /// The slot asked for after this one, `None` after the last.
    pub fn next(self) -> Option<BookingSlot> {
        match self {
            BookingSlot::Name => Some(BookingSlot::ContactNumber),
            BookingSlot::ContactNumber => Some(BookingSlot::Address),
            BookingSlot::Address => None,
        }
    }
}

/// Partially filled booking details.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookingDraft {
    pub name: Option<String>,
    pub contact_number: Option<String>,
    pub address: Option<String>,
}

impl BookingDraft {
    /// Store `value` in `slot`, returning the updated draft.
    pub fn with(mut self, slot: BookingSlot, value: String) -> Self {
        match slot {
            BookingSlot::Name => self.name = Some(value),
            BookingSlot::ContactNumber => self.contact_number = Some(value),
            BookingSlot::Address => self.address = Some(value),
        }
        self
    }
}

/// What the assistant is waiting for.
///
/// The context of the most recent bot message alone decides how the next
/// user message is read. Accumulated selections travel inside the token.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ReplyContext {
    #[default]
    None,
    AwaitingServiceNumber,
    AwaitingCategoryNumbers {
        service_id: String,
        selected: Vec<SelectedItem>,
    },
    AwaitingBookingSlot {
        slot: BookingSlot,
        draft: BookingDraft,
        selected: Vec<SelectedItem>,
    },
    AwaitingAddressChoice {
        selected: Vec<SelectedItem>,
    },
}

impl ReplyContext {
    pub fn is_none(&self) -> bool {
        matches!(self, ReplyContext::None)
    }

    /// Selections accumulated so far in the current sub-flow.
    pub fn selected_items(&self) -> &[SelectedItem] {
        match self {
            ReplyContext::AwaitingCategoryNumbers { selected, .. }
            | ReplyContext::AwaitingBookingSlot { selected, .. }
            | ReplyContext::AwaitingAddressChoice { selected } => selected,
            ReplyContext::None | ReplyContext::AwaitingServiceNumber => &[],
        }
    }

    /// The booking draft, present only while slots are being filled.
    pub fn booking_draft(&self) -> Option<&BookingDraft> {
        match self {
            ReplyContext::AwaitingBookingSlot { draft, .. } => Some(draft),
            _ => None,
        }
    }
}

// =============================================================================
// Reply
// =============================================================================

/// The engine's answer to a single user turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    pub text: String,
    pub quick_replies: Vec<String>,
    pub next_context: ReplyContext,
}

impl Reply {
    /// A reply with no quick replies that clears the context.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            quick_replies: vec![],
            next_context: ReplyContext::None,
        }
    }

    pub fn with_quick_replies<I, S>(mut self, quick_replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.quick_replies = quick_replies.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_context(mut self, context: ReplyContext) -> Self {
        self.next_context = context;
        self
    }
}

// =============================================================================
// Conversation state
// =============================================================================

/// A conversation owned by the presentation layer for the lifetime of the
/// chat view. Nothing here is persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationState {
    pub id: Uuid,
    pub messages: Vec<Message>,
    pub next_message_id: u64,
}

impl ConversationState {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            messages: Vec::new(),
            next_message_id: 1,
        }
    }

    /// Context of the latest message if the bot wrote it.
    ///
    /// A trailing user message means its reply has not been produced yet,
    /// so there is nothing to wait for.
    pub fn current_context(&self) -> &ReplyContext {
        static NONE: ReplyContext = ReplyContext::None;
        match self.messages.last() {
            Some(msg) if msg.sender == Sender::Bot => &msg.context,
            _ => &NONE,
        }
    }

    pub fn selected_items(&self) -> &[SelectedItem] {
        self.current_context().selected_items()
    }

    pub fn booking_draft(&self) -> Option<&BookingDraft> {
        self.current_context().booking_draft()
    }

    pub fn last_bot_message(&self) -> Option<&Message> {
        self.messages.iter().rev().find(|m| m.sender == Sender::Bot)
    }
}

impl Default for ConversationState {
    fn default() -> Self {
        Self::new()
    }
}
