//! Budget allocation: archetype + total budget → per-category price bands.

use std::collections::BTreeMap;

use crate::config::BudgetConfig;
use crate::error::{AdvisorError, Result};
use crate::models::{BudgetPlan, BuildArchetype, PriceBand};

/// Compute a `BudgetPlan` for an archetype. Pure: same inputs always yield
/// the same plan.
///
/// Each category gets `total_budget × share`, widened into a band of
/// `±band_tolerance` around it. Shares need not sum to 1; unallocated
/// categories are simply absent from the plan.
pub fn allocate(
    config: &BudgetConfig,
    archetype: BuildArchetype,
    total_budget: f64,
) -> Result<BudgetPlan> {
    if !total_budget.is_finite() || total_budget <= 0.0 {
        return Err(AdvisorError::configuration(format!(
            "total budget {total_budget} must be a positive finite number"
        )));
    }
    config.shares.validate()?;

    let table = config.shares.for_archetype(archetype);
    let mut bands = BTreeMap::new();
    for (category, share) in table {
        let category_budget = total_budget * share;
        bands.insert(
            category.clone(),
            PriceBand {
                lower: category_budget * (1.0 - config.band_tolerance),
                upper: category_budget * (1.0 + config.band_tolerance),
            },
        );
    }

    Ok(BudgetPlan {
        archetype,
        total_budget,
        bands,
    })
}
