use axum::Json;

use crate::models::PriceCompareRequest;
use crate::pricing::{self, PriceComparison};

/// POST /api/prices/compare - Normalize scraped price records and summarize
/// the best offer per component across sources.
pub async fn compare_prices(Json(req): Json<PriceCompareRequest>) -> Json<Vec<PriceComparison>> {
    let records = pricing::normalize(req.records);
    Json(pricing::best_offers(&records))
}
