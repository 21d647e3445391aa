//! Rule-based reading of user text.
//!
//! Classifies free text into an [`Intent`] and parses numbered selections
//! typed in reply to a numbered list.

use std::sync::LazyLock;

use fieldeaze_core::Service;
use regex::Regex;

use crate::error::SelectionError;

// =============================================================================
// Intent
// =============================================================================

/// A top-level request, listed in dispatch priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Greeting,
    ListServices,
    Offers,
    MoreFaqs,
    Faqs,
    /// 0-based index of the matched catalog service.
    ServiceDetail(usize),
    BookNow,
    BookingRedirect,
    Feedback,
    HumanAgent,
    Help,
    Fallback,
}

impl Intent {
    /// Whether the text was recognized as anything at all.
    pub fn is_command(self) -> bool {
        self != Intent::Fallback
    }
}

// =============================================================================
// Compiled patterns (compiled once, reused across calls)
// =============================================================================

struct IntentPatterns {
    greeting: Regex,
    services: Regex,
    offers: Regex,
    more_faqs: Regex,
    faqs: Regex,
    book_now: Regex,
    booking: Regex,
    feedback: Regex,
    human: Regex,
    help: Regex,
}

static INTENT_PATTERNS: LazyLock<IntentPatterns> = LazyLock::new(|| {
    let mk = |pat: &str| Regex::new(pat).expect("Invalid intent regex");

    IntentPatterns {
        greeting: mk(r"(?i)\b(?:hi|hello|hey|good\s+morning|good\s+evening)\b"),
        services: mk(r"(?i)service"),
        offers: mk(r"(?i)offer|discount"),
        // Checked before `faqs`, whose substring would otherwise swallow it
        more_faqs: mk(r"(?i)more\s+faq"),
        faqs: mk(r"(?i)faq|question"),
        book_now: mk(r"(?i)\bbook\s+now\b"),
        booking: mk(r"(?i)\b(?:book|reschedule|cancel)\b"),
        feedback: mk(r"(?i)feedback|complaint"),
        human: mk(r"(?i)human|agent|support"),
        help: mk(r"(?i)help"),
    }
});

// =============================================================================
// IntentParser
// =============================================================================

/// Classifies user text against a fixed rule list, first match wins.
#[derive(Debug, Default, Clone, Copy)]
pub struct IntentParser;

impl IntentParser {
    pub fn new() -> Self {
        Self
    }

    /// Classify `raw` into the first matching [`Intent`].
    ///
    /// Order: greeting, services, offers, more FAQs, FAQs, service name,
    /// book now, book/reschedule/cancel, feedback, human agent, help.
    pub fn classify(&self, raw: &str, services: &[Service]) -> Intent {
        let text = raw.trim();
        let pats = &*INTENT_PATTERNS;

        if pats.greeting.is_match(text) {
            return Intent::Greeting;
        }
        if pats.services.is_match(text) {
            return Intent::ListServices;
        }
        if pats.offers.is_match(text) {
            return Intent::Offers;
        }
        if pats.more_faqs.is_match(text) {
            return Intent::MoreFaqs;
        }
        if pats.faqs.is_match(text) {
            return Intent::Faqs;
        }
        if let Some(index) = self.match_service(text, services) {
            return Intent::ServiceDetail(index);
        }
        if pats.book_now.is_match(text) {
            return Intent::BookNow;
        }
        if pats.booking.is_match(text) {
            return Intent::BookingRedirect;
        }
        if pats.feedback.is_match(text) {
            return Intent::Feedback;
        }
        if pats.human.is_match(text) {
            return Intent::HumanAgent;
        }
        if pats.help.is_match(text) {
            return Intent::Help;
        }

        Intent::Fallback
    }

    /// Find the first service whose name contains the text or is contained
    /// in it, ignoring case. Empty text matches nothing.
    pub fn match_service(&self, raw: &str, services: &[Service]) -> Option<usize> {
        let text = raw.trim().to_lowercase();
        if text.is_empty() {
            return None;
        }
        services.iter().position(|s| {
            let name = s.name.to_lowercase();
            !name.is_empty() && (name.contains(&text) || text.contains(&name))
        })
    }
}

// =============================================================================
// Numbered selections
// =============================================================================

/// Outcome of parsing a comma-separated list of numbers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultiSelection {
    /// 0-based indices of valid picks, in input order, without repeats.
    pub picks: Vec<usize>,
    /// Integers that fell outside `1..=count`, as typed.
    pub out_of_range: Vec<String>,
    /// Tokens that were not integers.
    pub unparsable: Vec<String>,
}

impl MultiSelection {
    pub fn is_empty(&self) -> bool {
        self.picks.is_empty()
    }
}

/// Parse a single 1-based choice out of `count` options into a 0-based index.
pub fn parse_single_selection(raw: &str, count: usize) -> Result<usize, SelectionError> {
    read_choice(raw.trim(), count)
}

/// Parse `"1, 3,4"` style input. Tokens that are not integers or not in
/// `1..=count` are dropped and reported.
pub fn parse_multi_selection(raw: &str, count: usize) -> MultiSelection {
    let mut selection = MultiSelection::default();

    for token in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        match read_choice(token, count) {
            Ok(index) => {
                if !selection.picks.contains(&index) {
                    selection.picks.push(index);
                }
            }
            Err(SelectionError::OutOfRange { value, .. }) => selection.out_of_range.push(value),
            Err(_) => selection.unparsable.push(token.to_string()),
        }
    }

    selection
}

/// Whether the user finished a multi-select with "done".
pub fn is_done(raw: &str) -> bool {
    raw.trim().eq_ignore_ascii_case("done")
}

/// Map one token to a 0-based index. Integers too large for `i64` are
/// still integers, and so out of range rather than unparsable.
fn read_choice(token: &str, count: usize) -> Result<usize, SelectionError> {
    let out_of_range = || SelectionError::OutOfRange {
        value: token.to_string(),
        max: count,
    };
    match token.parse::<i64>() {
        Ok(value) if value >= 1 && (value as u64) <= count as u64 => Ok(value as usize - 1),
        Ok(_) => Err(out_of_range()),
        Err(_) if is_integer(token) => Err(out_of_range()),
        Err(_) => Err(SelectionError::Unparsable(token.to_string())),
    }
}

fn is_integer(token: &str) -> bool {
    let digits = token
        .strip_prefix(|c: char| c == '+' || c == '-')
        .unwrap_or(token);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

// =============================================================================
// Tests
// =============================================================================
