//! Pricing domain types.
//!
//! A `PricingQuery` is derived from the design snapshot; a `PricingResult`
//! carries distributor offers plus a selected best offer, and is always
//! tagged with its provenance (`Live` vs `Demo`). The tag is what lets the
//! prompt compiler and ultimately the user distinguish real distributor data
//! from synthesized demo data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A pricing lookup request for one component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingQuery {
    /// Reference designator the query is about.
    pub component_ref: String,

    /// Declared component value.
    pub value: String,

    /// Footprint name, used by distributors to narrow the package.
    pub footprint: String,
}

/// One distributor offer for a component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    /// Distributor name ("Digi-Key", "Mouser", ...).
    pub distributor: String,

    /// Price for a single unit.
    pub unit_price: f64,

    /// ISO currency code.
    pub currency: String,

    /// Units currently in stock at this distributor.
    pub stock_quantity: u32,

    /// When this offer was obtained.
    pub fetched_at: DateTime<Utc>,
}

/// Where a pricing result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PricingSource {
    /// An authenticated call to the live pricing service succeeded.
    Live,
    /// Synthesized data: demo mode, missing credential, or a failed call.
    Demo,
}

/// Offers for one component, with the selected best offer.
///
/// Invariant: `best_offer`, when present, is a member of `offers`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingResult {
    pub component_ref: String,
    pub offers: Vec<Offer>,
    pub best_offer: Option<Offer>,
    pub source: PricingSource,
}
