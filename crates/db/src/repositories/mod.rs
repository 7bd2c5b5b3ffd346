use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use thiserror::Error;

use shedquote_core::domain::design::{DesignId, NewShedDesign, ShedDesign};
use shedquote_core::domain::quote::{CustomerQuote, NewCustomerQuote, QuoteId};
use shedquote_core::domain::user::{User, UserId, UserProfile};

pub mod design;
pub mod memory;
pub mod quote;
pub mod user;

pub use design::SqlDesignRepository;
pub use memory::{InMemoryDesignRepository, InMemoryQuoteRepository};
pub use quote::SqlQuoteRepository;
pub use user::SqlUserRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

#[async_trait]
pub trait DesignRepository: Send + Sync {
    async fn create(&self, design: NewShedDesign) -> Result<ShedDesign, RepositoryError>;
    async fn find_by_id(&self, id: &DesignId) -> Result<Option<ShedDesign>, RepositoryError>;
    async fn list(&self) -> Result<Vec<ShedDesign>, RepositoryError>;
}

#[async_trait]
pub trait QuoteRepository: Send + Sync {
    async fn create(&self, quote: NewCustomerQuote) -> Result<CustomerQuote, RepositoryError>;
    async fn find_by_id(&self, id: &QuoteId) -> Result<Option<CustomerQuote>, RepositoryError>;
    async fn list_for_design(
        &self,
        design_id: &DesignId,
    ) -> Result<Vec<CustomerQuote>, RepositoryError>;
    async fn list(&self) -> Result<Vec<CustomerQuote>, RepositoryError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn upsert(&self, profile: UserProfile) -> Result<User, RepositoryError>;
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, RepositoryError>;
}

// Shared column decoders. Money is stored as canonical decimal strings and
// string lists as JSON text; anything that fails to parse is a Decode error,
// never a silent default.

pub(crate) fn decode_decimal(row: &SqliteRow, column: &str) -> Result<Decimal, RepositoryError> {
    let raw: String = row.try_get(column)?;
    Decimal::from_str(&raw)
        .map_err(|error| RepositoryError::Decode(format!("column `{column}`: {error}")))
}

pub(crate) fn decode_timestamp(
    row: &SqliteRow,
    column: &str,
) -> Result<DateTime<Utc>, RepositoryError> {
    let raw: String = row.try_get(column)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|error| RepositoryError::Decode(format!("column `{column}`: {error}")))
}

pub(crate) fn decode_string_list(
    row: &SqliteRow,
    column: &str,
) -> Result<Vec<String>, RepositoryError> {
    let raw: String = row.try_get(column)?;
    serde_json::from_str(&raw)
        .map_err(|error| RepositoryError::Decode(format!("column `{column}`: {error}")))
}

pub(crate) fn encode_string_list(values: &[String]) -> Result<String, RepositoryError> {
    serde_json::to_string(values)
        .map_err(|error| RepositoryError::Decode(format!("string list encode: {error}")))
}
