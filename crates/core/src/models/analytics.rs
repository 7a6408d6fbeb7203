use serde::{Deserialize, Serialize};

use super::holding::Holding;

/// Number of holdings listed in the top-holdings ranking.
pub const TOP_HOLDINGS_LIMIT: usize = 10;

/// Number of gainers/losers shown on the dashboard.
pub const DASHBOARD_MOVERS_LIMIT: usize = 5;

/// Number of gainers/losers printed in the PDF report.
pub const DOCUMENT_MOVERS_LIMIT: usize = 3;

/// Holdings counted towards concentration risk.
pub const CONCENTRATION_TOP_N: usize = 5;

/// One category of a sector or market-cap distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryShare {
    /// Category label (e.g. "Banking", "Large Cap")
    pub label: String,

    /// Summed current value of every holding in this category
    pub value: f64,

    /// Share of total portfolio value (0 when the portfolio is worth nothing)
    pub pct: f64,
}

/// Summary of the entire portfolio for one report generation.
///
/// Always recomputed from the holdings; never cached or patched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioSummary {
    /// Sum of quantity × buy price
    pub total_investment: f64,

    /// Sum of quantity × current price
    pub total_value: f64,

    /// total_value − total_investment
    pub total_gain_loss: f64,

    /// Percentage return, 0 when nothing was invested
    pub overall_return_pct: f64,

    /// Number of holdings (rows) in the portfolio
    pub holding_count: usize,

    /// Number of distinct sector labels, including zero-value ones
    pub sector_count: usize,

    /// Sector → value, largest first
    pub sector_distribution: Vec<CategoryShare>,

    /// Market cap → value, largest first
    pub market_cap_distribution: Vec<CategoryShare>,

    /// Largest holdings by current value
    pub top_holdings: Vec<Holding>,

    /// Best returns first
    pub top_gainers: Vec<Holding>,

    /// Worst returns first
    pub top_losers: Vec<Holding>,

    /// Summed weight of the five largest holdings
    pub concentration_risk: f64,

    /// Sector with the highest value, if any holdings exist
    pub top_sector: Option<String>,

    /// Percentage of total value held in `top_sector`
    pub top_sector_pct: f64,
}

impl PortfolioSummary {
    /// Gainers truncated for the PDF report.
    #[must_use]
    pub fn document_gainers(&self) -> &[Holding] {
        let n = self.top_gainers.len().min(DOCUMENT_MOVERS_LIMIT);
        &self.top_gainers[..n]
    }

    /// Losers truncated for the PDF report.
    #[must_use]
    pub fn document_losers(&self) -> &[Holding] {
        let n = self.top_losers.len().min(DOCUMENT_MOVERS_LIMIT);
        &self.top_losers[..n]
    }
}

/// What `derive` had to do to make the sheet usable.
///
/// Coerced cells are not errors: a non-numeric quantity silently becomes 0.
/// The count is exposed so callers and tests can see the data loss.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivationReport {
    /// Data rows present in the sheet
    pub rows_read: usize,

    /// Rows skipped because every cell was blank
    pub blank_rows_skipped: usize,

    /// Numeric cells that were blank or unparsable and were replaced by 0
    pub coerced_cells: usize,

    /// True when the sheet had no `Sector` column
    pub sector_column_synthesized: bool,

    /// True when the sheet had no `Market Cap` column
    pub market_cap_column_synthesized: bool,
}

/// Everything derived from one upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analysis {
    pub holdings: Vec<Holding>,
    pub summary: PortfolioSummary,
    pub report: DerivationReport,
}
