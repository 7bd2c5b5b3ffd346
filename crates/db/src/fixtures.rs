//! Deterministic demo fixtures for local development and smoke checks.

use shedquote_core::domain::design::{NewShedDesign, ShedConfiguration};
use shedquote_core::domain::quote::NewCustomerQuote;
use shedquote_core::pricing::price_configuration;

use crate::repositories::{
    DesignRepository, QuoteRepository, RepositoryError, SqlDesignRepository, SqlQuoteRepository,
};
use crate::DbPool;

/// Demo configurations: one base-tier build and one fully upgraded build.
fn demo_configurations() -> Vec<ShedConfiguration> {
    vec![
        ShedConfiguration {
            size: "8x10 ($3,500)".to_string(),
            style: "A-Frame".to_string(),
            siding: "Smart Panel T1-11 (Included)".to_string(),
            roof: "Asphalt Shingles (Included)".to_string(),
            addons: Vec::new(),
        },
        ShedConfiguration {
            size: "12x20 ($8,000)".to_string(),
            style: "Lofted Barn".to_string(),
            siding: "Cedar (+$1,200)".to_string(),
            roof: "Metal Standing Seam (+$400)".to_string(),
            addons: vec![
                "Extra Windows (+$150)".to_string(),
                "Electrical (+$800)".to_string(),
            ],
        },
    ]
}

#[derive(Clone, Debug)]
pub struct SeedSummary {
    pub design_ids: Vec<String>,
    pub quote_ids: Vec<String>,
}

pub struct DemoSeed;

impl DemoSeed {
    /// Price and store the demo designs, plus one quote request against the
    /// upgraded build. Safe to run repeatedly; each run appends fresh records.
    pub async fn load(pool: &DbPool) -> Result<SeedSummary, RepositoryError> {
        let designs = SqlDesignRepository::new(pool.clone());
        let quotes = SqlQuoteRepository::new(pool.clone());

        let mut design_ids = Vec::new();
        let mut stored_designs = Vec::new();
        for configuration in demo_configurations() {
            let pricing = price_configuration(&configuration);
            let stored = designs.create(NewShedDesign { configuration, pricing }).await?;
            design_ids.push(stored.id.to_string());
            stored_designs.push(stored);
        }

        let upgraded = stored_designs.last().ok_or_else(|| {
            RepositoryError::Decode("demo dataset produced no designs".to_string())
        })?;
        let request = NewCustomerQuote::new(
            upgraded.id.clone(),
            "Sam Carter",
            "sam.carter@example.com",
            "555-0199",
            Some("48 Birchline Rd".to_string()),
            Some("Sloped yard; looking for a fall install.".to_string()),
            Vec::new(),
        )
        .map_err(|error| RepositoryError::Decode(error.to_string()))?;
        let quote = quotes.create(request).await?;

        Ok(SeedSummary { design_ids, quote_ids: vec![quote.id.to_string()] })
    }

    /// Confirm the demo rows are present.
    pub async fn verify(pool: &DbPool) -> Result<bool, RepositoryError> {
        let design_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM shed_design")
            .fetch_one(pool)
            .await?;
        let quote_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customer_quote")
            .fetch_one(pool)
            .await?;

        Ok(design_count >= 2 && quote_count >= 1)
    }
}

#[cfg(test)]
mod tests {
    use super::DemoSeed;
    use crate::{connect_with_settings, migrations};

    #[tokio::test]
    async fn demo_seed_loads_and_verifies() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrations");

        let summary = DemoSeed::load(&pool).await.expect("seed");
        assert_eq!(summary.design_ids.len(), 2);
        assert_eq!(summary.quote_ids.len(), 1);

        assert!(DemoSeed::verify(&pool).await.expect("verify"));
    }
}
