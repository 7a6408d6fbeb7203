use std::cmp::Ordering;
use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::errors::CoreError;
use crate::models::analytics::{
    CategoryShare, DerivationReport, PortfolioSummary, CONCENTRATION_TOP_N,
    DASHBOARD_MOVERS_LIMIT, TOP_HOLDINGS_LIMIT,
};
use crate::models::holding::{Holding, DEFAULT_MARKET_CAP, DEFAULT_SECTOR};
use crate::models::table::{
    CellValue, RawTable, COL_BUY_PRICE, COL_CURRENT_PRICE, COL_MARKET_CAP, COL_NAME,
    COL_QUANTITY, COL_SECTOR,
};

/// Computes portfolio analytics: per-holding gain/loss and weight, then
/// the portfolio summary (totals, distributions, rankings, concentration).
///
/// Pure business logic with no I/O.
pub struct AnalyticsService;

/// Resolved column positions for one sheet.
struct ColumnMap {
    name: usize,
    quantity: usize,
    buy_price: usize,
    current_price: usize,
    sector: Option<usize>,
    market_cap: Option<usize>,
}

impl ColumnMap {
    fn resolve(table: &RawTable) -> Result<Self, CoreError> {
        // Checked in sheet-documentation order so the first missing column is reported.
        let required = |col: &str| {
            table
                .column_index(col)
                .ok_or_else(|| CoreError::MissingColumn(col.to_string()))
        };

        Ok(Self {
            name: required(COL_NAME)?,
            quantity: required(COL_QUANTITY)?,
            buy_price: required(COL_BUY_PRICE)?,
            current_price: required(COL_CURRENT_PRICE)?,
            sector: table.column_index(COL_SECTOR),
            market_cap: table.column_index(COL_MARKET_CAP),
        })
    }
}

impl AnalyticsService {
    pub fn new() -> Self {
        Self
    }

    /// Turn the raw sheet into enriched holdings.
    ///
    /// Fails only when a required column is missing. Absent `Sector` /
    /// `Market Cap` columns are filled with their defaults, non-numeric
    /// numbers become 0 and fully blank rows are skipped. What was patched
    /// up is returned in the `DerivationReport`.
    pub fn derive(&self, table: &RawTable) -> Result<(Vec<Holding>, DerivationReport), CoreError> {
        let columns = ColumnMap::resolve(table)?;

        let mut report = DerivationReport {
            rows_read: table.row_count(),
            sector_column_synthesized: columns.sector.is_none(),
            market_cap_column_synthesized: columns.market_cap.is_none(),
            ..DerivationReport::default()
        };

        let mut holdings = Vec::with_capacity(table.row_count());
        for (idx, row) in table.rows.iter().enumerate() {
            if row.iter().all(CellValue::is_blank) {
                report.blank_rows_skipped += 1;
                continue;
            }

            let mut number = |col: usize, column: &str| -> f64 {
                let cell = table.cell(idx, col);
                match cell.as_number() {
                    Some(n) => n,
                    None => {
                        if !matches!(cell, CellValue::Empty) {
                            debug!(row = idx + 1, column, cell = ?cell, "non-numeric cell coerced to 0");
                        }
                        report.coerced_cells += 1;
                        0.0
                    }
                }
            };
            let quantity = number(columns.quantity, COL_QUANTITY);
            let buy_price = number(columns.buy_price, COL_BUY_PRICE);
            let current_price = number(columns.current_price, COL_CURRENT_PRICE);

            let label = |col: Option<usize>, default: &str| {
                col.and_then(|c| table.cell(idx, c).as_label())
                    .unwrap_or_else(|| default.to_string())
            };
            let name = label(Some(columns.name), "");
            let sector = label(columns.sector, DEFAULT_SECTOR);
            let market_cap = label(columns.market_cap, DEFAULT_MARKET_CAP);

            holdings.push(Holding::new(
                name,
                quantity,
                buy_price,
                current_price,
                sector,
                market_cap,
            ));
        }

        if report.blank_rows_skipped > 0 {
            warn!(skipped = report.blank_rows_skipped, "blank rows skipped");
        }

        let total_value: f64 = holdings.iter().map(|h| h.current_value).sum();
        for holding in &mut holdings {
            holding.weight_pct = share_of(holding.current_value, total_value);
        }

        info!(
            holdings = holdings.len(),
            blank_rows = report.blank_rows_skipped,
            coerced_cells = report.coerced_cells,
            "portfolio derived"
        );
        Ok((holdings, report))
    }

    /// Compute the portfolio summary from enriched holdings.
    ///
    /// Rankings are stable: when two holdings tie on the ranking key the one
    /// that appeared first in the sheet wins.
    #[must_use]
    pub fn summarize(&self, holdings: &[Holding]) -> PortfolioSummary {
        let total_investment: f64 = holdings.iter().map(|h| h.investment).sum();
        let total_value: f64 = holdings.iter().map(|h| h.current_value).sum();
        let total_gain_loss: f64 = holdings.iter().map(|h| h.gain_loss).sum();
        let overall_return_pct = if total_investment > 0.0 {
            total_gain_loss / total_investment * 100.0
        } else {
            0.0
        };

        let sector_distribution = Self::distribution(holdings, total_value, |h| &h.sector);
        let market_cap_distribution = Self::distribution(holdings, total_value, |h| &h.market_cap);

        let by_value = Self::ranked(holdings, |a, b| b.current_value.total_cmp(&a.current_value));
        let concentration_risk: f64 = by_value
            .iter()
            .take(CONCENTRATION_TOP_N)
            .map(|h| h.weight_pct)
            .sum();
        let top_holdings: Vec<Holding> = by_value.into_iter().take(TOP_HOLDINGS_LIMIT).collect();

        let top_gainers: Vec<Holding> = Self::ranked(holdings, |a, b| b.gain_loss_pct.total_cmp(&a.gain_loss_pct))
            .into_iter()
            .take(DASHBOARD_MOVERS_LIMIT)
            .collect();
        let top_losers: Vec<Holding> = Self::ranked(holdings, |a, b| a.gain_loss_pct.total_cmp(&b.gain_loss_pct))
            .into_iter()
            .take(DASHBOARD_MOVERS_LIMIT)
            .collect();

        let (top_sector, top_sector_pct) = match sector_distribution.first() {
            Some(share) => (Some(share.label.clone()), share.pct),
            None => (None, 0.0),
        };

        PortfolioSummary {
            total_investment,
            total_value,
            total_gain_loss,
            overall_return_pct,
            holding_count: holdings.len(),
            sector_count: sector_distribution.len(),
            sector_distribution,
            market_cap_distribution,
            top_holdings,
            top_gainers,
            top_losers,
            concentration_risk,
            top_sector,
            top_sector_pct,
        }
    }

    /// Group current value by a label, largest first; ties by label.
    fn distribution<'a, F>(holdings: &'a [Holding], total_value: f64, key: F) -> Vec<CategoryShare>
    where
        F: Fn(&'a Holding) -> &'a String,
    {
        let mut sums: HashMap<&str, f64> = HashMap::new();
        for holding in holdings {
            *sums.entry(key(holding).as_str()).or_insert(0.0) += holding.current_value;
        }

        let mut shares: Vec<CategoryShare> = sums
            .into_iter()
            .map(|(label, value)| CategoryShare {
                label: label.to_string(),
                value,
                pct: share_of(value, total_value),
            })
            .collect();
        shares.sort_by(|a, b| {
            b.value
                .total_cmp(&a.value)
                .then_with(|| a.label.cmp(&b.label))
        });
        shares
    }

    /// Clone and stable-sort holdings by `cmp`.
    fn ranked<F>(holdings: &[Holding], cmp: F) -> Vec<Holding>
    where
        F: FnMut(&Holding, &Holding) -> Ordering,
    {
        let mut sorted = holdings.to_vec();
        sorted.sort_by(cmp);
        sorted
    }
}

impl Default for AnalyticsService {
    fn default() -> Self {
        Self::new()
    }
}

/// `part / total × 100`, or 0 when the total is zero.
///
/// A negative total (net short book) still divides, so weights keep summing to 100.
fn share_of(part: f64, total: f64) -> f64 {
    if total != 0.0 {
        part / total * 100.0
    } else {
        0.0
    }
}
