//! In-memory store objects, used when the service runs without a database
//! (tests, demos). Unlike a process-wide map, these are explicit values
//! handed to request handlers, with lifecycle scoped to the process.

use chrono::Utc;
use tokio::sync::RwLock;

use shedquote_core::domain::design::{DesignId, NewShedDesign, ShedDesign};
use shedquote_core::domain::quote::{CustomerQuote, NewCustomerQuote, QuoteId};

use super::{DesignRepository, QuoteRepository, RepositoryError};

#[derive(Default)]
pub struct InMemoryDesignRepository {
    designs: RwLock<Vec<ShedDesign>>,
}

#[async_trait::async_trait]
impl DesignRepository for InMemoryDesignRepository {
    async fn create(&self, design: NewShedDesign) -> Result<ShedDesign, RepositoryError> {
        let stored = ShedDesign {
            id: DesignId::generate(),
            configuration: design.configuration,
            pricing: design.pricing,
            created_at: Utc::now(),
        };
        self.designs.write().await.push(stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: &DesignId) -> Result<Option<ShedDesign>, RepositoryError> {
        let designs = self.designs.read().await;
        Ok(designs.iter().find(|design| &design.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<ShedDesign>, RepositoryError> {
        Ok(self.designs.read().await.clone())
    }
}

#[derive(Default)]
pub struct InMemoryQuoteRepository {
    quotes: RwLock<Vec<CustomerQuote>>,
}

#[async_trait::async_trait]
impl QuoteRepository for InMemoryQuoteRepository {
    async fn create(&self, quote: NewCustomerQuote) -> Result<CustomerQuote, RepositoryError> {
        let stored = CustomerQuote {
            id: QuoteId::generate(),
            shed_design_id: quote.shed_design_id,
            customer_name: quote.customer_name,
            email: quote.email,
            phone: quote.phone,
            address: quote.address,
            message: quote.message,
            site_photos: quote.site_photos,
            created_at: Utc::now(),
        };
        self.quotes.write().await.push(stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: &QuoteId) -> Result<Option<CustomerQuote>, RepositoryError> {
        let quotes = self.quotes.read().await;
        Ok(quotes.iter().find(|quote| &quote.id == id).cloned())
    }

    async fn list_for_design(
        &self,
        design_id: &DesignId,
    ) -> Result<Vec<CustomerQuote>, RepositoryError> {
        let quotes = self.quotes.read().await;
        Ok(quotes.iter().filter(|quote| &quote.shed_design_id == design_id).cloned().collect())
    }

    async fn list(&self) -> Result<Vec<CustomerQuote>, RepositoryError> {
        Ok(self.quotes.read().await.clone())
    }
}
