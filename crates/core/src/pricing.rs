//! Deterministic pricing over the fixed rule table.
//!
//! Pure lookup-and-sum: no I/O, no state. Persisting the priced design is
//! the caller's concern.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::catalog::{AddonOption, RoofOption, SidingOption, SizeOption, StyleOption};
use crate::domain::design::ShedConfiguration;

/// Equal-installment display term: 36 months at 0% interest.
pub const INSTALLMENT_MONTHS: u32 = 36;

fn hst_rate() -> Decimal {
    Decimal::new(15, 2)
}

fn flat_labor_cost() -> Decimal {
    Decimal::from(2000)
}

/// Mid-tier base applied when a size label is not in the catalog.
fn default_materials_base() -> Decimal {
    Decimal::from(2150)
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub materials_cost: Decimal,
    pub labor_cost: Decimal,
    pub addons_cost: Decimal,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub monthly_payment: Decimal,
}

pub trait PricingEngine: Send + Sync {
    fn price(&self, configuration: &ShedConfiguration) -> PriceBreakdown;
}

#[derive(Default)]
pub struct DeterministicPricingEngine;

impl PricingEngine for DeterministicPricingEngine {
    fn price(&self, configuration: &ShedConfiguration) -> PriceBreakdown {
        price_configuration(configuration)
    }
}

pub fn price_configuration(configuration: &ShedConfiguration) -> PriceBreakdown {
    let mut materials_cost = SizeOption::parse(&configuration.size)
        .map(SizeOption::materials_cost)
        .unwrap_or_else(default_materials_base);

    if let Some(siding) = SidingOption::parse(&configuration.siding) {
        materials_cost += siding.upcharge();
    }
    if let Some(roof) = RoofOption::parse(&configuration.roof) {
        materials_cost += roof.upcharge();
    }

    let addons_cost: Decimal = configuration
        .addons
        .iter()
        .filter_map(|label| AddonOption::parse(label))
        .map(AddonOption::fee)
        .sum();

    let labor_cost = flat_labor_cost();
    let subtotal = materials_cost + labor_cost + addons_cost;
    let tax = (subtotal * hst_rate()).round_dp(2);
    let total = subtotal + tax;
    // Matches display rounding of `round(total / 36 * 100) / 100`.
    let monthly_payment = (total / Decimal::from(INSTALLMENT_MONTHS))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

    PriceBreakdown {
        materials_cost,
        labor_cost,
        addons_cost,
        subtotal,
        tax,
        total,
        monthly_payment,
    }
}

/// Labels in the configuration that the catalog does not recognize.
///
/// Pricing tolerates these (unknown size falls back to the mid-tier base,
/// everything else prices as zero effect); callers surface them so the
/// leniency stays observable.
pub fn unrecognized_labels(configuration: &ShedConfiguration) -> Vec<String> {
    let mut labels = Vec::new();
    if SizeOption::parse(&configuration.size).is_none() {
        labels.push(configuration.size.clone());
    }
    if StyleOption::parse(&configuration.style).is_none() {
        labels.push(configuration.style.clone());
    }
    if SidingOption::parse(&configuration.siding).is_none() {
        labels.push(configuration.siding.clone());
    }
    if RoofOption::parse(&configuration.roof).is_none() {
        labels.push(configuration.roof.clone());
    }
    for addon in &configuration.addons {
        if AddonOption::parse(addon).is_none() {
            labels.push(addon.clone());
        }
    }
    labels
}
