//! Read-only reference data: services, offers, FAQs and saved addresses.
//!
//! The catalog is supplied by the surrounding application (usually a JSON
//! file) and is never mutated by the assistant.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{FieldeazeError, Result};

// =============================================================================
// Records
// =============================================================================

/// A bookable service, e.g. "AC Service".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Sub-services the user can pick one or more of.
    #[serde(default)]
    pub categories: Vec<Category>,
    /// Bundled "super saver" packs.
    #[serde(default, alias = "superSaverPacks")]
    pub packages: Vec<Package>,
    #[serde(default)]
    pub faqs: Vec<Faq>,
}

impl Service {
    /// Whether this service offers a sub-category selection.
    pub fn has_categories(&self) -> bool {
        !self.categories.is_empty()
    }
}

/// A sub-service within a [`Service`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Display price, e.g. `"₹499"`.
    pub price: String,
}

/// A bundled package within a [`Service`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    pub id: String,
    pub name: String,
    pub price: String,
}

/// A promotional offer.
///
/// Accepts either a bare string (treated as the title) or a full object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "OfferRepr")]
pub struct Offer {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl Offer {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            code: None,
        }
    }
}

impl fmt::Display for Offer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)?;
        if let Some(ref description) = self.description {
            write!(f, ": {}", description)?;
        }
        if let Some(ref code) = self.code {
            write!(f, " (code {})", code)?;
        }
        Ok(())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OfferRepr {
    Title(String),
    Full {
        title: String,
        #[serde(default)]
        description: Option<String>,
        #[serde(default)]
        code: Option<String>,
    },
}

impl From<OfferRepr> for Offer {
    fn from(repr: OfferRepr) -> Self {
        match repr {
            OfferRepr::Title(title) => Offer::new(title),
            OfferRepr::Full {
                title,
                description,
                code,
            } => Offer {
                title,
                description,
                code,
            },
        }
    }
}

/// A frequently asked question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Faq {
    #[serde(alias = "q")]
    pub question: String,
    #[serde(alias = "a")]
    pub answer: String,
}

impl Faq {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// An address the user saved earlier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedAddress {
    /// Short name such as "Home" or "Office".
    pub label: String,
    pub address: String,
}

// =============================================================================
// Catalog
// =============================================================================

/// All reference data the assistant reads from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Catalog {
    pub services: Vec<Service>,
    pub offers: Vec<Offer>,
    /// Global FAQs, independent of any service.
    pub faqs: Vec<Faq>,
    pub addresses: Vec<SavedAddress>,
}

/// Source of read-only reference data.
pub trait CatalogSource {
    fn catalog(&self) -> &Catalog;
}

impl CatalogSource for Catalog {
    fn catalog(&self) -> &Catalog {
        self
    }
}

impl<T: CatalogSource + ?Sized> CatalogSource for std::sync::Arc<T> {
    fn catalog(&self) -> &Catalog {
        (**self).catalog()
    }
}

impl Catalog {
    /// Load a catalog from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let catalog: Catalog = serde_json::from_str(&content)?;
        catalog.validate()?;
        info!(
            services = catalog.services.len(),
            offers = catalog.offers.len(),
            "Catalog loaded from {}",
            path.display()
        );
        Ok(catalog)
    }

    /// Load a catalog from a JSON file, falling back to [`Catalog::sample`].
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(catalog) => catalog,
            Err(e) => {
                warn!(
                    "Failed to load catalog from {}: {}. Using the sample catalog.",
                    path.display(),
                    e
                );
                Self::sample()
            }
        }
    }

    /// Reject catalogs whose services cannot be told apart.
    pub fn validate(&self) -> Result<()> {
        for (i, service) in self.services.iter().enumerate() {
            if service.name.trim().is_empty() {
                return Err(FieldeazeError::Catalog(format!(
                    "service '{}' has an empty name",
                    service.id
                )));
            }
            if self.services[..i].iter().any(|s| s.id == service.id) {
                return Err(FieldeazeError::Catalog(format!(
                    "duplicate service id '{}'",
                    service.id
                )));
            }
        }
        Ok(())
    }

    /// Service at a 0-based position.
    pub fn service(&self, index: usize) -> Option<&Service> {
        self.services.get(index)
    }

    pub fn service_by_id(&self, id: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.id == id)
    }

    /// Global FAQs followed by every service's FAQs, in catalog order.
    pub fn all_faqs(&self) -> Vec<&Faq> {
        self.faqs
            .iter()
            .chain(self.services.iter().flat_map(|s| s.faqs.iter()))
            .collect()
    }

    /// Built-in home-services catalog used when no catalog file is configured.
    pub fn sample() -> Self {
        let rupees = |amount: u32| format!("\u{20b9}{}", amount);
        let category = |id: &str, name: &str, description: &str, price: u32| Category {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            price: rupees(price),
        };
        let package = |id: &str, name: &str, price: u32| Package {
            id: id.to_string(),
            name: name.to_string(),
            price: rupees(price),
        };

        Catalog {
            services: vec![
                Service {
                    id: "ac-service".to_string(),
                    name: "AC Service".to_string(),
                    description: "Servicing, repair and installation for split and window ACs."
                        .to_string(),
                    categories: vec![
                        category("ac-foam-jet", "Foam-Jet AC Service", "Deep foam cleaning of coils", 599),
                        category("ac-repair", "AC Repair", "Diagnosis and repair of cooling issues", 399),
                        category("ac-install", "AC Installation", "Mounting and piping for a new unit", 1499),
                        category("ac-gas", "Gas Refill", "Leak check and full gas top-up", 2499),
                    ],
                    packages: vec![
                        package("ac-pack-2", "2 AC Foam-Jet Pack", 1099),
                        package("ac-pack-amc", "Annual Maintenance Pack", 2999),
                    ],
                    faqs: vec![Faq::new(
                        "How long does an AC service take?",
                        "Usually 45 to 60 minutes per unit.",
                    )],
                },
                Service {
                    id: "home-cleaning".to_string(),
                    name: "Home Cleaning".to_string(),
                    description: "Professional cleaning for every room in your home.".to_string(),
                    categories: vec![
                        category("clean-bathroom", "Bathroom Cleaning", "Tiles, fittings and fixtures", 449),
                        category("clean-kitchen", "Kitchen Cleaning", "Chimney, slab and cabinets", 799),
                        category("clean-sofa", "Sofa Cleaning", "Shampoo and vacuum for up to 5 seats", 599),
                    ],
                    packages: vec![package("clean-full", "Full Home Deep Clean", 3499)],
                    faqs: vec![Faq::new(
                        "Do I need to provide cleaning supplies?",
                        "No, our professionals bring all equipment and supplies.",
                    )],
                },
                Service {
                    id: "plumbing".to_string(),
                    name: "Plumbing".to_string(),
                    description: "Leak fixes, tap and pipe repairs, and fittings.".to_string(),
                    categories: vec![],
                    packages: vec![
                        package("plumb-visit", "Plumber Visit", 199),
                        package("plumb-tap", "Tap Replacement", 349),
                    ],
                    faqs: vec![],
                },
                Service {
                    id: "electrician".to_string(),
                    name: "Electrician".to_string(),
                    description: "Wiring, switchboards, fans and lights.".to_string(),
                    categories: vec![],
                    packages: vec![package("elec-visit", "Electrician Visit", 199)],
                    faqs: vec![],
                },
            ],
            offers: vec![
                Offer {
                    title: "AC Installation Offer".to_string(),
                    description: Some("Get 20% off on new installations".to_string()),
                    code: Some("COOL20".to_string()),
                },
                Offer::new("Flat \u{20b9}100 off on your first booking"),
            ],
            faqs: vec![
                Faq::new(
                    "How do I book a service?",
                    "Pick a service, choose a slot and confirm your address.",
                ),
                Faq::new(
                    "Can I reschedule a booking?",
                    "Yes, from My Bookings up to 2 hours before the slot.",
                ),
                Faq::new(
                    "Is there a service warranty?",
                    "All services carry a 30-day warranty.",
                ),
            ],
            addresses: vec![
                SavedAddress {
                    label: "Home".to_string(),
                    address: "12 Lake View Road, Chennai".to_string(),
                },
                SavedAddress {
                    label: "Office".to_string(),
                    address: "4th Floor, Tidel Park, Chennai".to_string(),
                },
            ],
        }
    }
}
