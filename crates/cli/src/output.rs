use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use portfolio_health_core::format::{money, pct};
use portfolio_health_core::models::analytics::Analysis;
use portfolio_health_core::models::holding::Holding;
use portfolio_health_core::models::risk::RiskAssessment;

fn table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header.iter().map(|h| Cell::new(*h)));
    table
}

/// Totals and counts.
pub fn summary_table(analysis: &Analysis, symbol: &str) -> Table {
    let s = &analysis.summary;
    let mut t = table(&["Metric", "Value"]);
    t.add_row(vec!["Total Investment".to_string(), money(s.total_investment, symbol)]);
    t.add_row(vec!["Current Value".to_string(), money(s.total_value, symbol)]);
    t.add_row(vec!["Total Gain/Loss".to_string(), money(s.total_gain_loss, symbol)]);
    t.add_row(vec!["Overall Return".to_string(), pct(s.overall_return_pct, 2)]);
    t.add_row(vec!["Number of Holdings".to_string(), s.holding_count.to_string()]);
    t.add_row(vec!["Number of Sectors".to_string(), s.sector_count.to_string()]);
    t
}

pub fn holdings_table(holdings: &[Holding], symbol: &str) -> Table {
    let mut t = table(&["Stock", "Sector", "Value", "Weight", "Return %"]);
    for h in holdings {
        t.add_row(vec![
            h.name.clone(),
            h.sector.clone(),
            money(h.current_value, symbol),
            pct(h.weight_pct, 1),
            pct(h.gain_loss_pct, 1),
        ]);
    }
    t
}

pub fn movers_table(analysis: &Analysis, symbol: &str) -> Table {
    let s = &analysis.summary;
    let mut t = table(&["", "Stock", "Return %", "Gain/Loss"]);
    let rows = s
        .top_gainers
        .iter()
        .map(|h| ("Top Gainer", h))
        .chain(s.top_losers.iter().map(|h| ("Top Loser", h)));
    for (role, h) in rows {
        t.add_row(vec![
            role.to_string(),
            h.name.clone(),
            pct(h.gain_loss_pct, 1),
            money(h.gain_loss, symbol),
        ]);
    }
    t
}

pub fn risk_table(risk: &RiskAssessment) -> Table {
    let mut t = table(&["Metric", "Value", "Assessment"]);
    t.add_row(vec![
        "Concentration (Top 5)".to_string(),
        pct(risk.concentration_pct, 1),
        risk.concentration_level.to_string(),
    ]);
    t.add_row(vec![
        "Largest Sector".to_string(),
        format!(
            "{} ({})",
            risk.top_sector.as_deref().unwrap_or("N/A"),
            pct(risk.top_sector_pct, 1)
        ),
        risk.sector_level.to_string(),
    ]);
    t
}
