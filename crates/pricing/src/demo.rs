//! Deterministic demo pricing synthesis.
//!
//! Demo offers are a pure function of the query: the same (reference, value)
//! pair always yields the same prices and stock levels, so demo sessions are
//! reproducible and tests can assert exact values. Prices are banded by
//! component class (first letter of the reference designator), then varied
//! within ±10% by an FNV-1a hash of the query.

use chrono::Utc;
use kicai_core::pricing::{Offer, PricingQuery, PricingResult, PricingSource};

use crate::select;

/// Demo distributors with their price multiplier relative to the base band.
const DEMO_DISTRIBUTORS: [(&str, f64); 3] =
    [("Digi-Key", 1.00), ("Mouser", 0.94), ("Farnell", 1.12)];

/// Base unit price in USD by component class.
fn base_price(reference: &str) -> f64 {
    let class = reference
        .chars()
        .next()
        .map(|c| c.to_ascii_uppercase())
        .unwrap_or('?');
    match class {
        'R' => 0.012, // resistors
        'C' => 0.009, // capacitors
        'L' => 0.045, // inductors
        'D' => 0.030, // diodes, LEDs
        'Q' => 0.080, // transistors
        'U' => 1.850, // ICs
        'J' => 0.350, // connectors
        'Y' | 'X' => 0.220, // crystals, oscillators
        'K' => 1.200, // relays
        _ => 0.050,
    }
}

/// FNV-1a, 64-bit. Stable across platforms and releases, unlike
/// `DefaultHasher`.
fn fnv1a(data: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for &byte in data {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

/// Synthesize offers for a batch of queries. Pure except for the
/// `fetched_at` timestamps, which are metadata and never rendered into
/// prompts.
pub fn synthesize(queries: &[PricingQuery], priority: &[String]) -> Vec<PricingResult> {
    queries
        .iter()
        .map(|query| synthesize_one(query, priority))
        .collect()
}

fn synthesize_one(query: &PricingQuery, priority: &[String]) -> PricingResult {
    let seed = fnv1a(format!("{}|{}", query.component_ref, query.value).as_bytes());
    let base = base_price(&query.component_ref);

    // ±10% variation in 1% steps
    let variation = 1.0 + ((seed % 21) as f64 - 10.0) / 100.0;
    let fetched_at = Utc::now();

    let offers: Vec<Offer> = DEMO_DISTRIBUTORS
        .iter()
        .enumerate()
        .map(|(i, (distributor, multiplier))| {
            let unit_price = round4(base * variation * multiplier);
            // Stock varies per distributor; one in seven queries finds the
            // first distributor out of stock, exercising the in-stock filter.
            let stock_quantity = if i == 0 && seed % 7 == 0 {
                0
            } else {
                5_000 + ((seed >> (8 * (i as u64 + 1))) % 95_000) as u32
            };
            Offer {
                distributor: (*distributor).into(),
                unit_price,
                currency: "USD".into(),
                stock_quantity,
                fetched_at,
            }
        })
        .collect();

    let best_offer = select::select_best(&offers, priority);

    PricingResult {
        component_ref: query.component_ref.clone(),
        offers,
        best_offer,
        source: PricingSource::Demo,
    }
}

fn round4(price: f64) -> f64 {
    (price * 10_000.0).round() / 10_000.0
}
