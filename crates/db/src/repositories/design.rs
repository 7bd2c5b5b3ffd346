use chrono::Utc;
use sqlx::sqlite::SqliteRow;

use shedquote_core::domain::design::{DesignId, NewShedDesign, ShedConfiguration, ShedDesign};
use shedquote_core::pricing::PriceBreakdown;

use super::{
    decode_decimal, decode_string_list, decode_timestamp, encode_string_list, DesignRepository,
    RepositoryError,
};
use crate::DbPool;

pub struct SqlDesignRepository {
    pool: DbPool,
}

impl SqlDesignRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl DesignRepository for SqlDesignRepository {
    async fn create(&self, design: NewShedDesign) -> Result<ShedDesign, RepositoryError> {
        let id = DesignId::generate();
        let created_at = Utc::now();
        let addons = encode_string_list(&design.configuration.addons)?;

        sqlx::query(
            "INSERT INTO shed_design
                (id, size, style, siding, roof, addons,
                 materials_cost, labor_cost, addons_cost,
                 subtotal, tax, total, monthly_payment, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id.0)
        .bind(&design.configuration.size)
        .bind(&design.configuration.style)
        .bind(&design.configuration.siding)
        .bind(&design.configuration.roof)
        .bind(&addons)
        .bind(design.pricing.materials_cost.to_string())
        .bind(design.pricing.labor_cost.to_string())
        .bind(design.pricing.addons_cost.to_string())
        .bind(design.pricing.subtotal.to_string())
        .bind(design.pricing.tax.to_string())
        .bind(design.pricing.total.to_string())
        .bind(design.pricing.monthly_payment.to_string())
        .bind(created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(ShedDesign {
            id,
            configuration: design.configuration,
            pricing: design.pricing,
            created_at,
        })
    }

    async fn find_by_id(&self, id: &DesignId) -> Result<Option<ShedDesign>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, size, style, siding, roof, addons,
                    materials_cost, labor_cost, addons_cost,
                    subtotal, tax, total, monthly_payment, created_at
             FROM shed_design WHERE id = ?",
        )
        .bind(&id.0)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| decode_design(&row)).transpose()
    }

    async fn list(&self) -> Result<Vec<ShedDesign>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, size, style, siding, roof, addons,
                    materials_cost, labor_cost, addons_cost,
                    subtotal, tax, total, monthly_payment, created_at
             FROM shed_design ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(decode_design).collect()
    }
}

fn decode_design(row: &SqliteRow) -> Result<ShedDesign, RepositoryError> {
    use sqlx::Row;

    Ok(ShedDesign {
        id: DesignId(row.try_get("id")?),
        configuration: ShedConfiguration {
            size: row.try_get("size")?,
            style: row.try_get("style")?,
            siding: row.try_get("siding")?,
            roof: row.try_get("roof")?,
            addons: decode_string_list(row, "addons")?,
        },
        pricing: PriceBreakdown {
            materials_cost: decode_decimal(row, "materials_cost")?,
            labor_cost: decode_decimal(row, "labor_cost")?,
            addons_cost: decode_decimal(row, "addons_cost")?,
            subtotal: decode_decimal(row, "subtotal")?,
            tax: decode_decimal(row, "tax")?,
            total: decode_decimal(row, "total")?,
            monthly_payment: decode_decimal(row, "monthly_payment")?,
        },
        created_at: decode_timestamp(row, "created_at")?,
    })
}
