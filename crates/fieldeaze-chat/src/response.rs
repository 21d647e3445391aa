//! Reply text composition.
//!
//! Turns catalog records and conversation progress into the text and quick
//! replies shown to the user. Context decisions are left to the engine.

use fieldeaze_core::price::{format_amount, subtotal};
use fieldeaze_core::{Faq, Offer, SavedAddress, Service};

use crate::error::SelectionError;
use crate::parser::MultiSelection;
use crate::types::{
    default_menu, BookingDraft, BookingSlot, Reply, SelectedItem, BOOK_NOW, DONE, FAQS,
    MORE_FAQS, SHOW_MORE, SHOW_OFFERS, SHOW_SERVICES, USE_LIVE_LOCATION,
};

// =============================================================================
// ResponseComposer
// =============================================================================

/// Builds every reply the assistant can send.
#[derive(Debug, Clone)]
pub struct ResponseComposer {
    /// FAQ entries on the first page.
    pub faq_preview_count: usize,
    /// FAQ entries on the "More FAQs" page.
    pub faq_page_size: usize,
    pub currency_symbol: String,
}

impl Default for ResponseComposer {
    fn default() -> Self {
        Self::new(3, 5, "\u{20b9}")
    }
}

impl ResponseComposer {
    pub fn new(faq_preview_count: usize, faq_page_size: usize, currency_symbol: &str) -> Self {
        Self {
            faq_preview_count,
            faq_page_size,
            currency_symbol: currency_symbol.to_string(),
        }
    }

    // -----------------------------------------------------------------
    // Menus and canned replies
    // -----------------------------------------------------------------

    pub fn welcome(&self, assistant_name: &str) -> Reply {
        Reply::text(format!(
            "Hi! I'm your {} assistant. How can I help you today?\n\
             You can ask about services, offers, or type 'help' for options.",
            assistant_name
        ))
        .with_quick_replies([SHOW_SERVICES, SHOW_OFFERS, FAQS])
    }

    pub fn greeting(&self) -> Reply {
        Reply::text("Hello! How can I assist you today?").with_quick_replies(default_menu())
    }

    pub fn booking_redirect(&self) -> Reply {
        Reply::text(
            "To book, reschedule, or cancel a service, please use the booking section in the app. \
             Would you like to see available services?",
        )
        .with_quick_replies([SHOW_SERVICES])
    }

    pub fn feedback_ack(&self) -> Reply {
        Reply::text(
            "We value your feedback! Please type your feedback or complaint, \
             and our team will review it.",
        )
    }

    pub fn human_handoff(&self) -> Reply {
        Reply::text("Connecting you to a human agent. Please wait...")
    }

    pub fn help(&self) -> Reply {
        Reply::text(
            "You can ask about services, offers, FAQs, or type a service name to know more. \
             Try: 'Show services', 'Show offers', or 'FAQs'.",
        )
    }

    pub fn fallback(&self) -> Reply {
        Reply::text(
            "Sorry, I didn't understand that. You can ask about services, offers, \
             or type 'help' for options.",
        )
        .with_quick_replies(default_menu())
    }

    // -----------------------------------------------------------------
    // Offers and FAQs
    // -----------------------------------------------------------------

    pub fn offers(&self, offers: &[Offer]) -> Reply {
        if offers.is_empty() {
            return Reply::text("No offers available right now.");
        }
        let lines: Vec<String> = offers.iter().map(|o| format!("- {}", o)).collect();
        Reply::text(format!("Current offers:\n{}", lines.join("\n")))
    }

    /// First page of the flattened FAQ pool.
    pub fn faqs(&self, pool: &[&Faq]) -> Reply {
        let page = page_of(pool, 0, self.faq_preview_count);
        if page.is_empty() {
            return Reply::text("No FAQs available right now.");
        }
        Reply::text(format_faqs(page)).with_quick_replies([MORE_FAQS])
    }

    /// The page following the first one.
    pub fn more_faqs(&self, pool: &[&Faq]) -> Reply {
        let page = page_of(pool, self.faq_preview_count, self.faq_page_size);
        if page.is_empty() {
            return Reply::text("No more FAQs.");
        }
        Reply::text(format_faqs(page))
    }

    // -----------------------------------------------------------------
    // Services
    // -----------------------------------------------------------------

    pub fn no_services(&self) -> Reply {
        Reply::text("No services are available right now.").with_quick_replies(default_menu())
    }

    /// Numbered list of every catalog service.
    pub fn service_list(&self, services: &[Service]) -> Reply {
        let lines: Vec<String> = services.iter().map(|s| s.name.clone()).collect();
        Reply::text(format!(
            "Here are our services:\n{}\nReply with a service number to know more.",
            numbered(&lines)
        ))
    }

    pub fn service_choice_error(&self, err: &SelectionError, count: usize) -> Reply {
        Reply::text(format!(
            "Sorry, {}. Please reply with a service number between 1 and {}.",
            err, count
        ))
    }

    /// Full description of a service found by name.
    pub fn service_detail(&self, service: &Service) -> Reply {
        let mut text = format!("{}: {}", service.name, service.description);
        if service.has_categories() {
            let names: Vec<String> = service
                .categories
                .iter()
                .map(|c| self.priced(&c.name, &c.price))
                .collect();
            text.push_str(&format!("\nOptions: {}", names.join(", ")));
        }
        if !service.packages.is_empty() {
            let packs: Vec<String> = service
                .packages
                .iter()
                .map(|p| self.priced(&p.name, &p.price))
                .collect();
            text.push_str(&format!("\nPopular packs: {}", packs.join(", ")));
        }
        if let Some(faq) = service.faqs.first() {
            text.push_str(&format!("\nExample FAQ: {} - {}", faq.question, faq.answer));
        }
        Reply::text(text).with_quick_replies([BOOK_NOW, SHOW_MORE, FAQS])
    }

    /// Summary and packs of a service without sub-categories, followed by the
    /// address choice.
    pub fn service_summary(&self, service: &Service, addresses: &[SavedAddress]) -> Reply {
        let mut text = format!("{}: {}", service.name, service.description);
        if !service.packages.is_empty() {
            let packs: Vec<String> = service
                .packages
                .iter()
                .map(|p| self.priced(&p.name, &p.price))
                .collect();
            text.push_str(&format!("\nPackages:\n{}", numbered(&packs)));
        }
        let address_reply = self.address_choice(addresses);
        text.push('\n');
        text.push_str(&address_reply.text);
        Reply::text(text).with_quick_replies(address_reply.quick_replies)
    }

    // -----------------------------------------------------------------
    // Multi-select
    // -----------------------------------------------------------------

    /// Numbered sub-category list, with the running selection if any.
    pub fn category_list(&self, service: &Service, selected: &[SelectedItem]) -> Reply {
        let lines: Vec<String> = service
            .categories
            .iter()
            .map(|c| self.priced(&c.name, &c.price))
            .collect();
        let prompt = if selected.is_empty() {
            "Reply with one or more numbers separated by commas, or 'done' when finished."
                .to_string()
        } else {
            let names: Vec<&str> = selected.iter().map(|s| s.name.as_str()).collect();
            format!(
                "Selected so far: {}.\nAdd more numbers, or type 'done' to continue.",
                names.join(", ")
            )
        };
        Reply::text(format!(
            "{} options:\n{}\n{}",
            service.name,
            numbered(&lines),
            prompt
        ))
        .with_quick_replies([DONE])
    }

    pub fn category_choice_error(&self, selection: &MultiSelection, count: usize) -> Reply {
        let reason = match (selection.out_of_range.first(), selection.unparsable.first()) {
            (Some(value), _) => SelectionError::OutOfRange {
                value: value.clone(),
                max: count,
            }
            .to_string(),
            (None, Some(token)) => SelectionError::Unparsable(token.clone()).to_string(),
            (None, None) => SelectionError::NoMatch.to_string(),
        };
        Reply::text(format!(
            "Sorry, {}. Please reply with numbers between 1 and {} separated by commas, \
             or 'done' to continue.",
            reason, count
        ))
        .with_quick_replies([DONE])
    }

    /// Selection summary; reads "None" when nothing was picked.
    pub fn selection_summary(&self, selected: &[SelectedItem]) -> String {
        if selected.is_empty() {
            return "None".to_string();
        }
        let lines: Vec<String> = selected
            .iter()
            .map(|s| self.priced(&s.name, &s.price))
            .collect();
        if selected.iter().all(|s| s.price.is_empty()) {
            return numbered(&lines);
        }
        let total = subtotal(selected.iter().map(|s| s.price.as_str()));
        format!(
            "{}\nSubtotal: {}",
            numbered(&lines),
            format_amount(&self.currency_symbol, total)
        )
    }

    // -----------------------------------------------------------------
    // Booking
    // -----------------------------------------------------------------

    /// Saved addresses plus live location, for finishing a booking.
    pub fn address_choice(&self, addresses: &[SavedAddress]) -> Reply {
        let mut text =
            "Please choose an address for your booking or use your live location:".to_string();
        for a in addresses {
            text.push_str(&format!("\n- {}: {}", a.label, a.address));
        }
        let quick_replies = addresses
            .iter()
            .map(|a| a.address.clone())
            .chain(std::iter::once(USE_LIVE_LOCATION.to_string()));
        Reply::text(text).with_quick_replies(quick_replies)
    }

    /// First slot prompt, shown after "done" with the selection summary.
    pub fn start_booking(&self, selected: &[SelectedItem]) -> Reply {
        let prompt = self.slot_prompt(BookingSlot::Name, &BookingDraft::default(), &[]);
        Reply::text(format!(
            "Your selection:\n{}\nLet's book it. {}",
            self.selection_summary(selected),
            prompt.text
        ))
    }

    /// Question for `slot`. Saved addresses are offered for the address slot.
    pub fn slot_prompt(
        &self,
        slot: BookingSlot,
        draft: &BookingDraft,
        addresses: &[SavedAddress],
    ) -> Reply {
        match slot {
            BookingSlot::Name => Reply::text("Please enter your name:"),
            BookingSlot::ContactNumber => Reply::text(format!(
                "Thanks, {}. Please enter your contact number:",
                draft.name.as_deref().unwrap_or("there")
            )),
            BookingSlot::Address => Reply::text("Please enter the service address:")
                .with_quick_replies(addresses.iter().map(|a| a.address.clone())),
        }
    }

    /// Confirmation after the last slot was filled.
    pub fn booking_confirmation(&self, draft: &BookingDraft, selected: &[SelectedItem]) -> Reply {
        let field = |v: &Option<String>| v.clone().unwrap_or_default();
        Reply::text(format!(
            "Your booking is confirmed!\nName: {}\nContact: {}\nAddress: {}\nServices:\n{}",
            field(&draft.name),
            field(&draft.contact_number),
            field(&draft.address),
            self.selection_summary(selected)
        ))
        .with_quick_replies([SHOW_SERVICES, SHOW_OFFERS])
    }

    /// Confirmation after an address was picked from the address choice.
    pub fn address_booking_confirmation(&self, address: &str, selected: &[SelectedItem]) -> Reply {
        let mut text = format!("Your service has been booked!\nAddress: {}", address);
        if !selected.is_empty() {
            text.push_str(&format!("\nServices:\n{}", self.selection_summary(selected)));
        }
        Reply::text(text).with_quick_replies([SHOW_SERVICES, SHOW_OFFERS])
    }

    // -- Private helpers --

    fn priced(&self, name: &str, price: &str) -> String {
        if price.is_empty() {
            name.to_string()
        } else {
            format!("{} ({})", name, price)
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// 1-based numbered lines.
fn numbered(lines: &[String]) -> String {
    lines
        .iter()
        .enumerate()
        .map(|(i, l)| format!("{}. {}", i + 1, l))
        .collect::<Vec<_>>()
        .join("\n")
}

fn page_of<'a, T>(items: &'a [T], start: usize, len: usize) -> &'a [T] {
    let start = start.min(items.len());
    let end = start.saturating_add(len).min(items.len());
    &items[start..end]
}

fn format_faqs(faqs: &[&Faq]) -> String {
    faqs.iter()
        .map(|f| format!("Q: {}\nA: {}", f.question, f.answer))
        .collect::<Vec<_>>()
        .join("\n\n")
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use fieldeaze_core::Catalog;

    fn composer() -> ResponseComposer {
        ResponseComposer::default()
    }

    fn item(name: &str, price: &str) -> SelectedItem {
        SelectedItem {
            service_id: "ac-service".to_string(),
            category_id: name.to_lowercase(),
            name: name.to_string(),
            price: price.to_string(),
        }
    }

    fn faq_pool(n: usize) -> Vec<Faq> {
        (1..=n)
            .map(|i| Faq::new(format!("Question {}", i), format!("Answer {}", i)))
            .collect()
    }

    #[test]
    fn test_greeting_offers_default_menu() {
        let reply = composer().greeting();
        assert!(reply.text.starts_with("Hello!"));
        assert!(reply.quick_replies.contains(&"Show services".to_string()));
        assert!(reply.quick_replies.contains(&"Call Support".to_string()));
    }

    #[test]
    fn test_service_list_is_numbered() {
        let catalog = Catalog::sample();
        let reply = composer().service_list(&catalog.services);
        assert!(reply.text.contains("1. AC Service"));
        assert!(reply.text.contains("4. Electrician"));
        assert!(!reply.text.contains("5. "));
    }

    #[test]
    fn test_offers_empty_and_listed() {
        assert_eq!(composer().offers(&[]).text, "No offers available right now.");
        let reply = composer().offers(&[Offer::new("10% off"), Offer::new("Free visit")]);
        assert_eq!(reply.text, "Current offers:\n- 10% off\n- Free visit");
    }

    #[test]
    fn test_faq_first_page() {
        let pool = faq_pool(5);
        let refs: Vec<&Faq> = pool.iter().collect();
        let reply = composer().faqs(&refs);
        assert!(reply.text.contains("Q: Question 3"));
        assert!(!reply.text.contains("Question 4"));
        assert_eq!(reply.quick_replies, vec!["More FAQs"]);
    }

    #[test]
    fn test_more_faqs_slice() {
        let pool = faq_pool(10);
        let refs: Vec<&Faq> = pool.iter().collect();
        let reply = composer().more_faqs(&refs);
        assert!(reply.text.starts_with("Q: Question 4"));
        assert!(reply.text.contains("Question 8"));
        assert!(!reply.text.contains("Question 9"));
        assert!(!reply.text.contains("Question 3\n"));
    }

    #[test]
    fn test_more_faqs_exhausted() {
        let pool = faq_pool(3);
        let refs: Vec<&Faq> = pool.iter().collect();
        assert_eq!(composer().more_faqs(&refs).text, "No more FAQs.");
    }

    #[test]
    fn test_faqs_empty_pool() {
        assert_eq!(composer().faqs(&[]).text, "No FAQs available right now.");
    }

    #[test]
    fn test_service_detail_contents() {
        let catalog = Catalog::sample();
        let reply = composer().service_detail(&catalog.services[0]);
        assert!(reply.text.starts_with("AC Service: "));
        assert!(reply.text.contains("Options: Foam-Jet AC Service (\u{20b9}599)"));
        assert!(reply.text.contains("Popular packs: 2 AC Foam-Jet Pack (\u{20b9}1099)"));
        assert!(reply.text.contains("Example FAQ: How long"));
        assert_eq!(reply.quick_replies, vec!["Book now", "Show more", "FAQs"]);
    }

    #[test]
    fn test_category_list_prompt_changes_with_selection() {
        let catalog = Catalog::sample();
        let service = &catalog.services[0];
        let first = composer().category_list(service, &[]);
        assert!(first.text.contains("1. Foam-Jet AC Service"));
        assert!(first.text.contains("'done' when finished"));

        let again = composer().category_list(service, &[item("AC Repair", "\u{20b9}399")]);
        assert!(again.text.contains("Selected so far: AC Repair."));
        assert!(again.text.contains("4. Gas Refill"));
    }

    #[test]
    fn test_selection_summary_none() {
        assert_eq!(composer().selection_summary(&[]), "None");
    }

    #[test]
    fn test_selection_summary_unpriced_has_no_subtotal() {
        assert_eq!(composer().selection_summary(&[item("Plumbing", "")]), "1. Plumbing");
    }

    #[test]
    fn test_selection_summary_with_subtotal() {
        let summary = composer().selection_summary(&[
            item("AC Repair", "\u{20b9}399"),
            item("Gas Refill", "\u{20b9}2499"),
        ]);
        assert!(summary.contains("1. AC Repair (\u{20b9}399)"));
        assert!(summary.contains("2. Gas Refill (\u{20b9}2499)"));
        assert!(summary.ends_with("Subtotal: \u{20b9}2898.00"));
    }

    #[test]
    fn test_category_choice_error_mentions_range() {
        let sel = MultiSelection {
            picks: vec![],
            out_of_range: vec!["9".to_string()],
            unparsable: vec![],
        };
        let reply = composer().category_choice_error(&sel, 4);
        assert!(reply.text.contains("9 is not between 1 and 4"));
        assert!(reply.text.contains("between 1 and 4 separated by commas"));
    }

    #[test]
    fn test_address_choice_lists_saved_and_live() {
        let catalog = Catalog::sample();
        let reply = composer().address_choice(&catalog.addresses);
        assert!(reply.text.contains("Home: 12 Lake View Road, Chennai"));
        assert_eq!(reply.quick_replies.last().unwrap(), "Use live location");
        assert_eq!(reply.quick_replies.len(), 3);
    }

    #[test]
    fn test_slot_prompts() {
        let draft = BookingDraft::default().with(BookingSlot::Name, "Meena".to_string());
        let c = composer();
        assert_eq!(
            c.slot_prompt(BookingSlot::Name, &BookingDraft::default(), &[]).text,
            "Please enter your name:"
        );
        assert!(c
            .slot_prompt(BookingSlot::ContactNumber, &draft, &[])
            .text
            .contains("Thanks, Meena."));
    }

    #[test]
    fn test_booking_confirmation_lists_all_slots() {
        let draft = BookingDraft {
            name: Some("Meena".to_string()),
            contact_number: Some("9840012345".to_string()),
            address: Some("7 Beach Road".to_string()),
        };
        let reply = composer().booking_confirmation(&draft, &[]);
        assert!(reply.text.contains("Name: Meena"));
        assert!(reply.text.contains("Contact: 9840012345"));
        assert!(reply.text.contains("Address: 7 Beach Road"));
        assert!(reply.text.ends_with("Services:\nNone"));
    }

    #[test]
    fn test_page_of_bounds() {
        let items = [1, 2, 3];
        assert_eq!(page_of(&items, 0, 5), &[1, 2, 3]);
        assert_eq!(page_of(&items, 3, 5), &[] as &[i32]);
        assert_eq!(page_of(&items, 10, usize::MAX), &[] as &[i32]);
    }
}
