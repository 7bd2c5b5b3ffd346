pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
pub mod pricing;
pub mod wizard;

pub use catalog::{AddonOption, RoofOption, SidingOption, SizeOption, StyleOption};
pub use domain::design::{DesignId, NewShedDesign, ShedConfiguration, ShedDesign};
pub use domain::email::{Email, EmailError};
pub use domain::quote::{CustomerQuote, NewCustomerQuote, QuoteId};
pub use domain::user::{User, UserId, UserProfile};
pub use errors::{ApplicationError, DomainError};
pub use pricing::{
    price_configuration, unrecognized_labels, DeterministicPricingEngine, PriceBreakdown,
    PricingEngine,
};
pub use wizard::{DesignWizard, SelectionOutcome, WizardError, WizardStep};
