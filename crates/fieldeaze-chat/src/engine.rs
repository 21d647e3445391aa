//! The reply engine: one user message plus the pending context in, one reply out.
//!
//! The engine holds no mutable state. Everything it needs to remember
//! between turns (which list is open, what has been picked, which booking
//! slot is next) travels in the [`ReplyContext`] attached to its replies.
//!
//! Dispatch order, first match wins:
//! 1. an open booking slot consumes the text verbatim
//! 2. an open service-number prompt
//! 3. an open category multi-select
//! 4. an open address choice (saved address or live location)
//! 5. free-text intents, see [`IntentParser::classify`]

use fieldeaze_core::{AssistantConfig, Catalog, CatalogSource, SavedAddress, Service};
use tracing::{debug, info, warn};

use crate::parser::{
    is_done, parse_multi_selection, parse_single_selection, Intent, IntentParser,
};
use crate::response::ResponseComposer;
use crate::types::{
    BookingDraft, BookingSlot, Reply, ReplyContext, SelectedItem, USE_LIVE_LOCATION,
};

/// Address recorded when the user shares their live location.
pub const LIVE_LOCATION_ADDRESS: &str = "Live location";

/// Rule-based reply engine over a read-only catalog.
pub struct ReplyEngine<C: CatalogSource> {
    catalog: C,
    parser: IntentParser,
    composer: ResponseComposer,
}

impl<C: CatalogSource> ReplyEngine<C> {
    pub fn new(catalog: C, composer: ResponseComposer) -> Self {
        Self {
            catalog,
            parser: IntentParser::new(),
            composer,
        }
    }

    /// Build an engine using the FAQ paging and currency from `config`.
    pub fn from_config(catalog: C, config: &AssistantConfig) -> Self {
        let composer = ResponseComposer::new(
            config.faq_preview_count,
            config.faq_page_size,
            &config.currency_symbol,
        );
        Self::new(catalog, composer)
    }

    pub fn catalog(&self) -> &Catalog {
        self.catalog.catalog()
    }

    pub fn composer(&self) -> &ResponseComposer {
        &self.composer
    }

    /// Produce the reply to `text` given the context of the previous bot message.
    ///
    /// Never fails: invalid or unrecognized input yields a corrective or
    /// fallback reply.
    pub fn reply(&self, text: &str, prior: &ReplyContext) -> Reply {
        let text = text.trim();
        match prior {
            ReplyContext::AwaitingBookingSlot {
                slot,
                draft,
                selected,
            } => self.fill_slot(text, *slot, draft, selected),
            ReplyContext::AwaitingServiceNumber => self.choose_service(text),
            ReplyContext::AwaitingCategoryNumbers {
                service_id,
                selected,
            } => self.choose_categories(text, service_id, selected),
            ReplyContext::AwaitingAddressChoice { selected } => self
                .choose_address(text, selected)
                .unwrap_or_else(|| self.dispatch(text)),
            ReplyContext::None => self.dispatch(text),
        }
    }

    // -----------------------------------------------------------------
    // Context handlers
    // -----------------------------------------------------------------

    fn fill_slot(
        &self,
        value: &str,
        slot: BookingSlot,
        draft: &BookingDraft,
        selected: &[SelectedItem],
    ) -> Reply {
        if value.is_empty() {
            return self
                .composer
                .slot_prompt(slot, draft, self.addresses())
                .with_context(ReplyContext::AwaitingBookingSlot {
                    slot,
                    draft: draft.clone(),
                    selected: selected.to_vec(),
                });
        }

        let draft = draft.clone().with(slot, value.to_string());
        debug!(?slot, "Booking slot filled");

        match slot.next() {
            Some(next) => self
                .composer
                .slot_prompt(next, &draft, self.addresses())
                .with_context(ReplyContext::AwaitingBookingSlot {
                    slot: next,
                    draft,
                    selected: selected.to_vec(),
                }),
            None => {
                info!(items = selected.len(), "Booking completed via slot filling");
                self.composer.booking_confirmation(&draft, selected)
            }
        }
    }

    fn choose_service(&self, text: &str) -> Reply {
        let services = &self.catalog().services;
        match parse_single_selection(text, services.len()) {
            Ok(index) => {
                let service = &services[index];
                debug!(service = %service.id, "Service selected by number");
                self.open_service(service)
            }
            Err(err) => {
                debug!(error = %err, "Invalid service number");
                self.composer
                    .service_choice_error(&err, services.len())
                    .with_context(ReplyContext::AwaitingServiceNumber)
            }
        }
    }

    fn open_service(&self, service: &Service) -> Reply {
        if service.has_categories() {
            self.composer
                .category_list(service, &[])
                .with_context(ReplyContext::AwaitingCategoryNumbers {
                    service_id: service.id.clone(),
                    selected: vec![],
                })
        } else {
            self.composer
                .service_summary(service, self.addresses())
                .with_context(ReplyContext::AwaitingAddressChoice {
                    selected: vec![whole_service(service)],
                })
        }
    }

    fn choose_categories(&self, text: &str, service_id: &str, selected: &[SelectedItem]) -> Reply {
        let Some(service) = self.catalog().service_by_id(service_id) else {
            warn!(service_id, "Service from context no longer in catalog");
            return self.dispatch(text);
        };

        if is_done(text) {
            debug!(items = selected.len(), "Multi-select finished");
            return self.composer.start_booking(selected).with_context(
                ReplyContext::AwaitingBookingSlot {
                    slot: BookingSlot::Name,
                    draft: BookingDraft::default(),
                    selected: selected.to_vec(),
                },
            );
        }

        let count = service.categories.len();
        let selection = parse_multi_selection(text, count);

        if selection.is_empty() {
            if selection.out_of_range.is_empty() {
                if let Some(reply) = self.abandon_for_command(text) {
                    return reply;
                }
            }
            debug!(
                out_of_range = selection.out_of_range.len(),
                unparsable = selection.unparsable.len(),
                "No valid category numbers"
            );
            return self
                .composer
                .category_choice_error(&selection, count)
                .with_context(ReplyContext::AwaitingCategoryNumbers {
                    service_id: service_id.to_string(),
                    selected: selected.to_vec(),
                });
        }

        let mut accumulated = selected.to_vec();
        for index in selection.picks {
            let category = &service.categories[index];
            if accumulated.iter().any(|s| s.category_id == category.id) {
                continue;
            }
            accumulated.push(SelectedItem {
                service_id: service.id.clone(),
                category_id: category.id.clone(),
                name: category.name.clone(),
                price: category.price.clone(),
            });
        }
        debug!(items = accumulated.len(), "Categories accumulated");

        self.composer
            .category_list(service, &accumulated)
            .with_context(ReplyContext::AwaitingCategoryNumbers {
                service_id: service_id.to_string(),
                selected: accumulated,
            })
    }

    /// Finish a booking when the text names a saved address or live location.
    fn choose_address(&self, text: &str, selected: &[SelectedItem]) -> Option<Reply> {
        let address = if text.eq_ignore_ascii_case(USE_LIVE_LOCATION) {
            LIVE_LOCATION_ADDRESS.to_string()
        } else {
            find_saved_address(self.addresses(), text)?.address.clone()
        };
        info!(items = selected.len(), "Booking completed via address choice");
        Some(
            self.composer
                .address_booking_confirmation(&address, selected),
        )
    }

    /// Leave the multi-select when non-numeric text is a recognized command.
    /// Callers only ask when no integer was typed.
    fn abandon_for_command(&self, text: &str) -> Option<Reply> {
        let intent = self.parser.classify(text, &self.catalog().services);
        if !intent.is_command() {
            return None;
        }
        debug!(?intent, "Multi-select abandoned for a new command");
        Some(self.respond_to(intent))
    }

    // -----------------------------------------------------------------
    // Free-text rules
    // -----------------------------------------------------------------

    fn dispatch(&self, text: &str) -> Reply {
        let intent = self.parser.classify(text, &self.catalog().services);
        debug!(?intent, "Intent classified");
        self.respond_to(intent)
    }

    fn respond_to(&self, intent: Intent) -> Reply {
        let catalog = self.catalog();
        match intent {
            Intent::Greeting => self.composer.greeting(),
            Intent::ListServices => {
                if catalog.services.is_empty() {
                    self.composer.no_services()
                } else {
                    self.composer
                        .service_list(&catalog.services)
                        .with_context(ReplyContext::AwaitingServiceNumber)
                }
            }
            Intent::Offers => self.composer.offers(&catalog.offers),
            Intent::MoreFaqs => self.composer.more_faqs(&catalog.all_faqs()),
            Intent::Faqs => self.composer.faqs(&catalog.all_faqs()),
            Intent::ServiceDetail(index) => match catalog.service(index) {
                Some(service) => self.composer.service_detail(service),
                None => self.composer.fallback(),
            },
            Intent::BookNow => self
                .composer
                .address_choice(&catalog.addresses)
                .with_context(ReplyContext::AwaitingAddressChoice { selected: vec![] }),
            Intent::BookingRedirect => self.composer.booking_redirect(),
            Intent::Feedback => self.composer.feedback_ack(),
            Intent::HumanAgent => self.composer.human_handoff(),
            Intent::Help => self.composer.help(),
            Intent::Fallback => self.composer.fallback(),
        }
    }

    fn addresses(&self) -> &[SavedAddress] {
        &self.catalog().addresses
    }
}

/// Selection entry for a service booked as a whole, without a category.
fn whole_service(service: &Service) -> SelectedItem {
    SelectedItem {
        service_id: service.id.clone(),
        category_id: String::new(),
        name: service.name.clone(),
        price: String::new(),
    }
}

/// Match a saved address by label, full text, or `"label: address"`, ignoring case.
fn find_saved_address<'a>(addresses: &'a [SavedAddress], text: &str) -> Option<&'a SavedAddress> {
    let text = text.trim().to_lowercase();
    if text.is_empty() {
        return None;
    }
    addresses.iter().find(|a| {
        let label = a.label.to_lowercase();
        let address = a.address.to_lowercase();
        text == label || text == address || text == format!("{}: {}", label, address)
    })
}

// =============================================================================
// Tests
// =============================================================================
