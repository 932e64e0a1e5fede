//! Best-offer selection.
//!
//! Policy: the lowest unit price among in-stock offers wins; when nothing is
//! in stock, the lowest price overall. Exact price ties break on the
//! configured distributor priority order, distributors absent from the list
//! ranking last; a remaining tie breaks on distributor name so selection is
//! total and deterministic.

use kicai_core::pricing::Offer;
use std::cmp::Ordering;

/// Select the best offer, or `None` when `offers` is empty.
pub fn select_best(offers: &[Offer], priority: &[String]) -> Option<Offer> {
    let in_stock: Vec<&Offer> = offers.iter().filter(|o| o.stock_quantity > 0).collect();
    let pool: Vec<&Offer> = if in_stock.is_empty() {
        offers.iter().collect()
    } else {
        in_stock
    };

    pool.into_iter()
        .min_by(|a, b| compare(a, b, priority))
        .cloned()
}

fn compare(a: &Offer, b: &Offer, priority: &[String]) -> Ordering {
    a.unit_price
        .total_cmp(&b.unit_price)
        .then_with(|| rank(&a.distributor, priority).cmp(&rank(&b.distributor, priority)))
        .then_with(|| a.distributor.cmp(&b.distributor))
}

fn rank(distributor: &str, priority: &[String]) -> usize {
    priority
        .iter()
        .position(|p| p == distributor)
        .unwrap_or(priority.len())
}
