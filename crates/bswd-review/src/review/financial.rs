use serde::{Deserialize, Serialize};

use super::domain::RequestedItem;

/// Combined BSWD ($2K) and CSG-DSE ($20K) ceiling for one academic year.
pub const ANNUAL_FUNDING_CAP: f64 = 22_000.0;

/// Funding need compared against the requested item costs and the annual cap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialSummary {
    pub total_need: f64,
    pub total_requested: f64,
    pub within_cap: bool,
    pub utilization_rate: f64,
    pub exceeds_cap_by: f64,
}

pub fn analyze_financials(
    provincial_need: f64,
    federal_need: f64,
    requested_items: &[RequestedItem],
) -> FinancialSummary {
    let total_need = provincial_need + federal_need;
    let total_requested: f64 = requested_items.iter().map(|item| item.cost).sum();

    // zero need is a defined case, not a division error
    let utilization_rate = if total_need == 0.0 {
        0.0
    } else {
        total_requested / total_need * 100.0
    };

    FinancialSummary {
        total_need,
        total_requested,
        within_cap: total_requested <= ANNUAL_FUNDING_CAP,
        utilization_rate,
        exceeds_cap_by: (total_requested - ANNUAL_FUNDING_CAP).max(0.0),
    }
}
