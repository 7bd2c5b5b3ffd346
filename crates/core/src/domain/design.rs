use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::pricing::PriceBreakdown;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DesignId(pub String);

impl DesignId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }
}

impl fmt::Display for DesignId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The raw selections a customer made, as label strings.
///
/// Labels normally come from the catalog, but the pricing path accepts
/// arbitrary strings and prices unknown ones leniently, so this type does not
/// constrain them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShedConfiguration {
    pub size: String,
    pub style: String,
    pub siding: String,
    pub roof: String,
    pub addons: Vec<String>,
}

/// A configuration plus its computed breakdown, ready to persist.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewShedDesign {
    pub configuration: ShedConfiguration,
    pub pricing: PriceBreakdown,
}

/// A stored, priced design. Immutable once created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShedDesign {
    pub id: DesignId,
    pub configuration: ShedConfiguration,
    pub pricing: PriceBreakdown,
    pub created_at: DateTime<Utc>,
}
