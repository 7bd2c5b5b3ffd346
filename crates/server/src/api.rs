//! JSON API for pricing and quote intake.
//!
//! Endpoints:
//! - `POST /api/calculate-price`  — price a configuration, store the design
//! - `POST /api/request-quote`    — record a customer quote request
//! - `GET  /api/shed-designs`     — list stored designs (admin)
//! - `GET  /api/customer-quotes`  — list quote requests (admin)

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use shedquote_core::domain::design::{DesignId, NewShedDesign, ShedConfiguration, ShedDesign};
use shedquote_core::domain::quote::{CustomerQuote, NewCustomerQuote};
use shedquote_core::errors::{ApplicationError, DomainError};
use shedquote_core::pricing::{price_configuration, unrecognized_labels};
use shedquote_db::repositories::{
    DesignRepository, InMemoryDesignRepository, InMemoryQuoteRepository, QuoteRepository,
    RepositoryError, SqlDesignRepository, SqlQuoteRepository,
};
use shedquote_db::DbPool;

/// Store objects handed to every handler; no hidden globals.
#[derive(Clone)]
pub struct ApiState {
    pub designs: Arc<dyn DesignRepository>,
    pub quotes: Arc<dyn QuoteRepository>,
}

impl ApiState {
    pub fn sql(pool: DbPool) -> Self {
        Self {
            designs: Arc::new(SqlDesignRepository::new(pool.clone())),
            quotes: Arc::new(SqlQuoteRepository::new(pool)),
        }
    }

    pub fn in_memory() -> Self {
        Self {
            designs: Arc::new(InMemoryDesignRepository::default()),
            quotes: Arc::new(InMemoryQuoteRepository::default()),
        }
    }
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/api/calculate-price", post(calculate_price))
        .route("/api/request-quote", post(request_quote))
        .route("/api/shed-designs", get(list_designs))
        .route("/api/customer-quotes", get(list_quotes))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct CalculatePriceRequest {
    pub size: String,
    pub style: String,
    pub siding: String,
    pub roof: String,
    pub addons: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceResponse {
    #[serde(with = "rust_decimal::serde::float")]
    pub materials_cost: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub labor_cost: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub addons_cost: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub tax: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub monthly_payment: Decimal,
    pub shed_design_id: String,
}

impl From<&ShedDesign> for PriceResponse {
    fn from(design: &ShedDesign) -> Self {
        Self {
            materials_cost: design.pricing.materials_cost,
            labor_cost: design.pricing.labor_cost,
            addons_cost: design.pricing.addons_cost,
            subtotal: design.pricing.subtotal,
            tax: design.pricing.tax,
            total: design.pricing.total,
            monthly_payment: design.pricing.monthly_payment,
            shed_design_id: design.id.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequestBody {
    pub shed_design_id: String,
    pub customer_name: String,
    pub email: String,
    pub phone: String,
    pub address: Option<String>,
    pub message: Option<String>,
    pub site_photos: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub success: bool,
    pub quote_id: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignSummary {
    pub id: String,
    pub size: String,
    pub style: String,
    pub siding: String,
    pub roof: String,
    pub addons: Vec<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub materials_cost: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub labor_cost: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub addons_cost: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub tax: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub monthly_payment: Decimal,
    pub created_at: String,
}

impl From<&ShedDesign> for DesignSummary {
    fn from(design: &ShedDesign) -> Self {
        Self {
            id: design.id.to_string(),
            size: design.configuration.size.clone(),
            style: design.configuration.style.clone(),
            siding: design.configuration.siding.clone(),
            roof: design.configuration.roof.clone(),
            addons: design.configuration.addons.clone(),
            materials_cost: design.pricing.materials_cost,
            labor_cost: design.pricing.labor_cost,
            addons_cost: design.pricing.addons_cost,
            subtotal: design.pricing.subtotal,
            tax: design.pricing.tax,
            total: design.pricing.total,
            monthly_payment: design.pricing.monthly_payment,
            created_at: design.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSummary {
    pub id: String,
    pub shed_design_id: String,
    pub customer_name: String,
    pub email: String,
    pub phone: String,
    pub address: Option<String>,
    pub message: Option<String>,
    pub site_photos: Vec<String>,
    pub created_at: String,
}

impl From<&CustomerQuote> for QuoteSummary {
    fn from(quote: &CustomerQuote) -> Self {
        Self {
            id: quote.id.to_string(),
            shed_design_id: quote.shed_design_id.to_string(),
            customer_name: quote.customer_name.clone(),
            email: quote.email.as_str().to_string(),
            phone: quote.phone.clone(),
            address: quote.address.clone(),
            message: quote.message.clone(),
            site_photos: quote.site_photos.clone(),
            created_at: quote.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

pub async fn calculate_price(
    State(state): State<ApiState>,
    payload: Result<Json<CalculatePriceRequest>, JsonRejection>,
) -> Result<Json<PriceResponse>, (StatusCode, Json<ApiError>)> {
    let Json(request) = payload.map_err(invalid_request)?;

    let configuration = ShedConfiguration {
        size: request.size,
        style: request.style,
        siding: request.siding,
        roof: request.roof,
        addons: request.addons,
    };

    // Unknown labels price leniently; keep that observable.
    let stray = unrecognized_labels(&configuration);
    if !stray.is_empty() {
        warn!(
            event_name = "pricing.unrecognized_label",
            labels = ?stray,
            "configuration contains labels the catalog does not recognize"
        );
    }

    let pricing = price_configuration(&configuration);
    let design = state
        .designs
        .create(NewShedDesign { configuration, pricing })
        .await
        .map_err(store_error)?;

    info!(
        event_name = "pricing.design_priced",
        design_id = %design.id,
        total = %design.pricing.total,
        "shed design priced and stored"
    );

    Ok(Json(PriceResponse::from(&design)))
}

pub async fn request_quote(
    State(state): State<ApiState>,
    payload: Result<Json<QuoteRequestBody>, JsonRejection>,
) -> Result<Json<QuoteResponse>, (StatusCode, Json<ApiError>)> {
    let Json(body) = payload.map_err(invalid_request)?;

    let design_id = DesignId(body.shed_design_id);
    let request = NewCustomerQuote::new(
        design_id.clone(),
        &body.customer_name,
        &body.email,
        &body.phone,
        body.address,
        body.message,
        body.site_photos.unwrap_or_default(),
    )
    .map_err(domain_error)?;

    // The design must exist before anything is written.
    let design_exists =
        state.designs.find_by_id(&design_id).await.map_err(store_error)?.is_some();
    if !design_exists {
        return Err(domain_error(DomainError::DesignNotFound(design_id.to_string())));
    }

    let quote = state.quotes.create(request).await.map_err(store_error)?;

    info!(
        event_name = "quotes.request_recorded",
        quote_id = %quote.id,
        design_id = %quote.shed_design_id,
        "customer quote request recorded"
    );

    Ok(Json(QuoteResponse {
        success: true,
        quote_id: quote.id.to_string(),
        message: "Quote request submitted successfully".to_string(),
    }))
}

pub async fn list_designs(
    State(state): State<ApiState>,
) -> Result<Json<Vec<DesignSummary>>, (StatusCode, Json<ApiError>)> {
    let designs = state.designs.list().await.map_err(store_error)?;
    Ok(Json(designs.iter().map(DesignSummary::from).collect()))
}

pub async fn list_quotes(
    State(state): State<ApiState>,
) -> Result<Json<Vec<QuoteSummary>>, (StatusCode, Json<ApiError>)> {
    let quotes = state.quotes.list().await.map_err(store_error)?;
    Ok(Json(quotes.iter().map(QuoteSummary::from).collect()))
}

// ---------------------------------------------------------------------------
// Error mapping
// ---------------------------------------------------------------------------

fn invalid_request(rejection: JsonRejection) -> (StatusCode, Json<ApiError>) {
    (StatusCode::BAD_REQUEST, Json(ApiError { error: format!("invalid request data: {rejection}") }))
}

fn domain_error(error: DomainError) -> (StatusCode, Json<ApiError>) {
    error_response(ApplicationError::Domain(error))
}

fn store_error(error: RepositoryError) -> (StatusCode, Json<ApiError>) {
    error!(event_name = "api.store_error", error = %error, "store operation failed");
    error_response(ApplicationError::Persistence(error.to_string()))
}

fn error_response(error: ApplicationError) -> (StatusCode, Json<ApiError>) {
    let status = match &error {
        ApplicationError::Domain(DomainError::Validation { .. }) => StatusCode::BAD_REQUEST,
        ApplicationError::Domain(DomainError::DesignNotFound(_)) => StatusCode::NOT_FOUND,
        ApplicationError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    // Persistence details stay in the logs, not on the wire.
    let message = match &error {
        ApplicationError::Persistence(_) => "an internal error occurred".to_string(),
        other => other.to_string(),
    };
    (status, Json(ApiError { error: message }))
}

#[cfg(test)]
mod tests {
    use axum::{extract::State, http::StatusCode, Json};
    use rust_decimal::Decimal;
    use tower::ServiceExt;

    use super::*;

    fn price_request(addons: Vec<&str>) -> CalculatePriceRequest {
        CalculatePriceRequest {
            size: "8x10 ($3,500)".to_string(),
            style: "A-Frame".to_string(),
            siding: "Smart Panel T1-11 (Included)".to_string(),
            roof: "Asphalt Shingles (Included)".to_string(),
            addons: addons.into_iter().map(str::to_string).collect(),
        }
    }

    fn quote_body(design_id: &str) -> QuoteRequestBody {
        QuoteRequestBody {
            shed_design_id: design_id.to_string(),
            customer_name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            phone: "555-0101".to_string(),
            address: None,
            message: Some("Corner lot, rear access".to_string()),
            site_photos: Some(vec!["/uploads/site.jpg".to_string()]),
        }
    }

    #[tokio::test]
    async fn calculate_price_returns_breakdown_and_persists_the_design() {
        let state = ApiState::in_memory();

        let Json(response) =
            calculate_price(State(state.clone()), Ok(Json(price_request(Vec::new()))))
                .await
                .expect("should price");

        assert_eq!(response.materials_cost, Decimal::from(1580));
        assert_eq!(response.labor_cost, Decimal::from(2000));
        assert_eq!(response.subtotal, Decimal::from(3580));
        assert_eq!(response.tax, Decimal::new(53700, 2));
        assert_eq!(response.total, Decimal::new(411700, 2));
        assert_eq!(response.monthly_payment, Decimal::new(11436, 2));

        let stored = state
            .designs
            .find_by_id(&DesignId(response.shed_design_id.clone()))
            .await
            .expect("lookup")
            .expect("design should be stored");
        assert_eq!(stored.pricing.total, response.total);
    }

    #[tokio::test]
    async fn calculate_price_tolerates_unknown_labels() {
        let state = ApiState::in_memory();
        let mut request = price_request(vec!["Moat (+$12,000)"]);
        request.size = "14x28 (custom)".to_string();

        let Json(response) = calculate_price(State(state), Ok(Json(request)))
            .await
            .expect("unknown labels should not fail pricing");

        // Fallback base, zero-cost stray addon.
        assert_eq!(response.materials_cost, Decimal::from(2150));
        assert_eq!(response.addons_cost, Decimal::ZERO);
    }

    #[tokio::test]
    async fn price_breakdown_serializes_as_numbers() {
        let state = ApiState::in_memory();
        let Json(response) = calculate_price(State(state), Ok(Json(price_request(Vec::new()))))
            .await
            .expect("should price");

        let wire = serde_json::to_value(&response).expect("serialize");
        assert_eq!(wire["tax"], serde_json::json!(537.0));
        assert_eq!(wire["monthlyPayment"], serde_json::json!(114.36));
        assert!(wire["shedDesignId"].is_string());
    }

    #[tokio::test]
    async fn request_quote_round_trips_for_an_existing_design() {
        let state = ApiState::in_memory();
        let Json(priced) =
            calculate_price(State(state.clone()), Ok(Json(price_request(Vec::new()))))
                .await
                .expect("seed design");

        let Json(response) =
            request_quote(State(state.clone()), Ok(Json(quote_body(&priced.shed_design_id))))
                .await
                .expect("quote should be recorded");

        assert!(response.success);

        let quotes = state.quotes.list().await.expect("list quotes");
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].shed_design_id.to_string(), priced.shed_design_id);
        assert_eq!(quotes[0].site_photos, vec!["/uploads/site.jpg".to_string()]);
    }

    #[tokio::test]
    async fn request_quote_for_unknown_design_is_not_found_and_writes_nothing() {
        let state = ApiState::in_memory();

        let (status, Json(error)) =
            request_quote(State(state.clone()), Ok(Json(quote_body("ghost-design"))))
                .await
                .expect_err("should fail");

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(error.error.contains("not found"));
        assert!(state.quotes.list().await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn request_quote_rejects_invalid_contact_details() {
        let state = ApiState::in_memory();
        let Json(priced) =
            calculate_price(State(state.clone()), Ok(Json(price_request(Vec::new()))))
                .await
                .expect("seed design");

        let mut body = quote_body(&priced.shed_design_id);
        body.email = "not-an-email".to_string();
        let (status, _) = request_quote(State(state.clone()), Ok(Json(body)))
            .await
            .expect_err("bad email");
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let mut body = quote_body(&priced.shed_design_id);
        body.customer_name = "   ".to_string();
        let (status, _) = request_quote(State(state.clone()), Ok(Json(body)))
            .await
            .expect_err("blank name");
        assert_eq!(status, StatusCode::BAD_REQUEST);

        assert!(state.quotes.list().await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn listings_return_stored_records() {
        let state = ApiState::in_memory();
        let Json(priced) =
            calculate_price(State(state.clone()), Ok(Json(price_request(vec!["Skylights (+$300)"]))))
                .await
                .expect("seed design");
        request_quote(State(state.clone()), Ok(Json(quote_body(&priced.shed_design_id))))
            .await
            .expect("seed quote");

        let Json(designs) = list_designs(State(state.clone())).await.expect("list designs");
        assert_eq!(designs.len(), 1);
        assert_eq!(designs[0].addons, vec!["Skylights (+$300)".to_string()]);

        let Json(quotes) = list_quotes(State(state)).await.expect("list quotes");
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].customer_name, "Jane Doe");
    }

    #[tokio::test]
    async fn schema_violations_are_rejected_with_bad_request() {
        let router = router(ApiState::in_memory());

        // addons must be a list of strings
        let request = axum::http::Request::builder()
            .method("POST")
            .uri("/api/calculate-price")
            .header("content-type", "application/json")
            .body(axum::body::Body::from(
                r#"{"size":"8x10 ($3,500)","style":"A-Frame","siding":"s","roof":"r","addons":"nope"}"#,
            ))
            .expect("request");
        let response = router.clone().oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        // missing required field
        let request = axum::http::Request::builder()
            .method("POST")
            .uri("/api/calculate-price")
            .header("content-type", "application/json")
            .body(axum::body::Body::from(r#"{"size":"8x10 ($3,500)"}"#))
            .expect("request");
        let response = router.oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn sql_backed_state_round_trips_through_the_router() {
        let pool = shedquote_db::connect_with_settings("sqlite::memory:", 1, 30)
            .await
            .expect("connect");
        shedquote_db::migrations::run_pending(&pool).await.expect("migrations");
        let router = router(ApiState::sql(pool));

        let request = axum::http::Request::builder()
            .method("POST")
            .uri("/api/calculate-price")
            .header("content-type", "application/json")
            .body(axum::body::Body::from(
                r#"{"size":"8x10 ($3,500)","style":"A-Frame","siding":"Cedar (+$1,200)","roof":"Metal Standing Seam (+$400)","addons":["Electrical (+$800)"]}"#,
            ))
            .expect("request");
        let response = router.oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024).await.expect("body");
        let wire: serde_json::Value = serde_json::from_slice(&bytes).expect("json");
        assert_eq!(wire["materialsCost"], serde_json::json!(3180.0));
        assert_eq!(wire["total"], serde_json::json!(6877.0));
        assert_eq!(wire["monthlyPayment"], serde_json::json!(191.03));
    }
}
