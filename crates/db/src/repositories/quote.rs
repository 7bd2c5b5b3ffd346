use chrono::Utc;
use sqlx::sqlite::SqliteRow;

use shedquote_core::domain::design::DesignId;
use shedquote_core::domain::email::Email;
use shedquote_core::domain::quote::{CustomerQuote, NewCustomerQuote, QuoteId};

use super::{
    decode_string_list, decode_timestamp, encode_string_list, QuoteRepository, RepositoryError,
};
use crate::DbPool;

pub struct SqlQuoteRepository {
    pool: DbPool,
}

impl SqlQuoteRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

const SELECT_COLUMNS: &str = "id, shed_design_id, customer_name, email, phone,
                              address, message, site_photos, created_at";

#[async_trait::async_trait]
impl QuoteRepository for SqlQuoteRepository {
    async fn create(&self, quote: NewCustomerQuote) -> Result<CustomerQuote, RepositoryError> {
        let id = QuoteId::generate();
        let created_at = Utc::now();
        let site_photos = encode_string_list(&quote.site_photos)?;

        sqlx::query(
            "INSERT INTO customer_quote
                (id, shed_design_id, customer_name, email, phone,
                 address, message, site_photos, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id.0)
        .bind(&quote.shed_design_id.0)
        .bind(&quote.customer_name)
        .bind(quote.email.as_str())
        .bind(&quote.phone)
        .bind(&quote.address)
        .bind(&quote.message)
        .bind(&site_photos)
        .bind(created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(CustomerQuote {
            id,
            shed_design_id: quote.shed_design_id,
            customer_name: quote.customer_name,
            email: quote.email,
            phone: quote.phone,
            address: quote.address,
            message: quote.message,
            site_photos: quote.site_photos,
            created_at,
        })
    }

    async fn find_by_id(&self, id: &QuoteId) -> Result<Option<CustomerQuote>, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM customer_quote WHERE id = ?"
        ))
        .bind(&id.0)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| decode_quote(&row)).transpose()
    }

    async fn list_for_design(
        &self,
        design_id: &DesignId,
    ) -> Result<Vec<CustomerQuote>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM customer_quote
             WHERE shed_design_id = ? ORDER BY created_at"
        ))
        .bind(&design_id.0)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(decode_quote).collect()
    }

    async fn list(&self) -> Result<Vec<CustomerQuote>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM customer_quote ORDER BY created_at"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(decode_quote).collect()
    }
}

fn decode_quote(row: &SqliteRow) -> Result<CustomerQuote, RepositoryError> {
    use sqlx::Row;

    let email_raw: String = row.try_get("email")?;
    let email = Email::parse(&email_raw)
        .map_err(|error| RepositoryError::Decode(format!("column `email`: {error}")))?;

    Ok(CustomerQuote {
        id: QuoteId(row.try_get("id")?),
        shed_design_id: DesignId(row.try_get("shed_design_id")?),
        customer_name: row.try_get("customer_name")?,
        email,
        phone: row.try_get("phone")?,
        address: row.try_get("address")?,
        message: row.try_get("message")?,
        site_photos: decode_string_list(row, "site_photos")?,
        created_at: decode_timestamp(row, "created_at")?,
    })
}

#[cfg(test)]
mod tests {
    use shedquote_core::domain::design::{NewShedDesign, ShedConfiguration};
    use shedquote_core::domain::quote::{NewCustomerQuote, QuoteId};
    use shedquote_core::pricing::price_configuration;

    use super::SqlQuoteRepository;
    use crate::repositories::{DesignRepository, QuoteRepository, SqlDesignRepository};
    use crate::{connect_with_settings, migrations, DbPool};

    async fn pool() -> DbPool {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrations");
        pool
    }

    async fn seeded_design(pool: &DbPool) -> shedquote_core::domain::design::ShedDesign {
        let configuration = ShedConfiguration {
            size: "10x12 ($4,200)".to_string(),
            style: "Quaker".to_string(),
            siding: "Smart Panel T1-11 (Included)".to_string(),
            roof: "Metal Standing Seam (+$400)".to_string(),
            addons: Vec::new(),
        };
        let pricing = price_configuration(&configuration);
        SqlDesignRepository::new(pool.clone())
            .create(NewShedDesign { configuration, pricing })
            .await
            .expect("seed design")
    }

    fn quote_for(design_id: shedquote_core::domain::design::DesignId) -> NewCustomerQuote {
        NewCustomerQuote::new(
            design_id,
            "Jane Doe",
            "jane@example.com",
            "555-0101",
            Some("12 Harbour Rd".to_string()),
            Some("Level gravel pad already in place".to_string()),
            vec!["/uploads/site.jpg".to_string()],
        )
        .expect("valid quote request")
    }

    #[tokio::test]
    async fn created_quotes_read_back_unchanged() {
        let pool = pool().await;
        let design = seeded_design(&pool).await;
        let repo = SqlQuoteRepository::new(pool);

        let stored = repo.create(quote_for(design.id.clone())).await.expect("create quote");
        let found = repo.find_by_id(&stored.id).await.expect("find quote");

        assert_eq!(found, Some(stored.clone()));
        assert_eq!(stored.site_photos, vec!["/uploads/site.jpg".to_string()]);
    }

    #[tokio::test]
    async fn quotes_list_by_referenced_design() {
        let pool = pool().await;
        let first_design = seeded_design(&pool).await;
        let second_design = seeded_design(&pool).await;
        let repo = SqlQuoteRepository::new(pool);

        repo.create(quote_for(first_design.id.clone())).await.expect("first quote");
        repo.create(quote_for(first_design.id.clone())).await.expect("second quote");
        repo.create(quote_for(second_design.id.clone())).await.expect("other design quote");

        let for_first = repo.list_for_design(&first_design.id).await.expect("list for design");
        assert_eq!(for_first.len(), 2);
        assert!(for_first.iter().all(|quote| quote.shed_design_id == first_design.id));

        let all = repo.list().await.expect("list all");
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn unknown_quote_ids_read_back_as_none() {
        let pool = pool().await;
        let repo = SqlQuoteRepository::new(pool);
        let missing =
            repo.find_by_id(&QuoteId("no-such-quote".to_string())).await.expect("lookup");
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn foreign_keys_reject_quotes_for_missing_designs() {
        let pool = pool().await;
        let repo = SqlQuoteRepository::new(pool);

        let result = repo
            .create(quote_for(shedquote_core::domain::design::DesignId(
                "ghost-design".to_string(),
            )))
            .await;

        assert!(result.is_err(), "foreign key constraint should reject the insert");
    }
}
