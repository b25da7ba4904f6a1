//! Multi-source price aggregation: normalize scraped price records and pick
//! the best offer per component across sources.

use serde::Serialize;

use crate::models::PriceRecord;

/// Best-offer summary for one component across every source that listed it.
#[derive(Debug, Clone, Serialize)]
pub struct PriceComparison {
    pub component: String,
    /// Cheapest observed offer.
    pub best: PriceRecord,
    pub offer_count: usize,
    pub min_price: f64,
    pub max_price: f64,
}

/// Drop records that cannot be used: blank names, non-positive or
/// non-finite prices. Names and URLs are trimmed.
pub fn normalize(records: Vec<PriceRecord>) -> Vec<PriceRecord> {
    records
        .into_iter()
        .filter_map(|mut r| {
            r.component = r.component.trim().to_string();
            r.source_url = r.source_url.trim().to_string();
            if r.component.is_empty() || !r.price.is_finite() || r.price <= 0.0 {
                None
            } else {
                Some(r)
            }
        })
        .collect()
}

/// Group normalized records per component (case-insensitive) and summarize
/// the best offer for each. Components keep first-appearance order.
pub fn best_offers(records: &[PriceRecord]) -> Vec<PriceComparison> {
    let mut comparisons: Vec<PriceComparison> = Vec::new();

    for record in records {
        let key = record.component.to_lowercase();
        match comparisons
            .iter_mut()
            .find(|c| c.component.to_lowercase() == key)
        {
            Some(c) => {
                c.offer_count += 1;
                c.min_price = c.min_price.min(record.price);
                c.max_price = c.max_price.max(record.price);
                if record.price < c.best.price {
                    c.best = record.clone();
                }
            }
            None => comparisons.push(PriceComparison {
                component: record.component.clone(),
                best: record.clone(),
                offer_count: 1,
                min_price: record.price,
                max_price: record.price,
            }),
        }
    }

    comparisons
}
