pub mod catalog;
pub mod config;
pub mod error;
pub mod price;

pub use catalog::{
    Catalog, CatalogSource, Category, Faq, Offer, Package, SavedAddress, Service,
};
pub use config::{AssistantConfig, FieldeazeConfig, GeneralConfig};
pub use error::{FieldeazeError, Result};
