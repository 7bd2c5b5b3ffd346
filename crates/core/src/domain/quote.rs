use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::design::DesignId;
use crate::domain::email::Email;
use crate::errors::DomainError;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuoteId(pub String);

impl QuoteId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }
}

impl fmt::Display for QuoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A validated quote request, ready to persist.
///
/// Construct through [`NewCustomerQuote::new`], which enforces the intake
/// contract: non-empty name and phone, syntactically valid email. The
/// design reference is checked against the store at the API boundary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCustomerQuote {
    pub shed_design_id: DesignId,
    pub customer_name: String,
    pub email: Email,
    pub phone: String,
    pub address: Option<String>,
    pub message: Option<String>,
    pub site_photos: Vec<String>,
}

impl NewCustomerQuote {
    pub fn new(
        shed_design_id: DesignId,
        customer_name: &str,
        email: &str,
        phone: &str,
        address: Option<String>,
        message: Option<String>,
        site_photos: Vec<String>,
    ) -> Result<Self, DomainError> {
        let customer_name = customer_name.trim();
        if customer_name.is_empty() {
            return Err(DomainError::Validation {
                field: "customerName",
                reason: "must not be empty".to_string(),
            });
        }

        let phone = phone.trim();
        if phone.is_empty() {
            return Err(DomainError::Validation {
                field: "phone",
                reason: "must not be empty".to_string(),
            });
        }

        let email = Email::parse(email.trim())
            .map_err(|error| DomainError::Validation { field: "email", reason: error.to_string() })?;

        Ok(Self {
            shed_design_id,
            customer_name: customer_name.to_string(),
            email,
            phone: phone.to_string(),
            address,
            message,
            site_photos,
        })
    }
}

/// A stored quote request. Immutable once created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerQuote {
    pub id: QuoteId,
    pub shed_design_id: DesignId,
    pub customer_name: String,
    pub email: Email,
    pub phone: String,
    pub address: Option<String>,
    pub message: Option<String>,
    pub site_photos: Vec<String>,
    pub created_at: DateTime<Utc>,
}
