use std::fmt::Write as _;

use crate::errors::CoreError;
use crate::format::{grouped, html_escape, money, pct};
use crate::models::analytics::Analysis;
use crate::models::chart::{Palette, PieChart};
use crate::models::holding::Holding;
use crate::models::settings::DashboardOptions;
use crate::models::table::RawTable;
use crate::services::chart_service::ChartService;

const SVG_WIDTH: f64 = 520.0;
const SVG_HEIGHT: f64 = 300.0;
const SVG_RADIUS: f64 = 120.0;
const SVG_CENTER: (f64, f64) = (150.0, 150.0);
const LEGEND_X: f64 = 300.0;

/// Renders the interactive projection: a self-contained HTML page with
/// summary cards, distribution charts, gainers/losers and the holdings table.
pub struct DashboardService {
    chart_service: ChartService,
    currency_symbol: String,
}

impl DashboardService {
    pub fn new(currency_symbol: impl Into<String>) -> Self {
        Self {
            chart_service: ChartService::new(),
            currency_symbol: currency_symbol.into(),
        }
    }

    /// Render the dashboard page.
    ///
    /// When `report_action` is set, the page ends with a form that posts the
    /// holdings back to that URL as JSON so the PDF matches what is shown.
    pub fn render(
        &self,
        analysis: &Analysis,
        options: &DashboardOptions,
        report_action: Option<&str>,
    ) -> Result<String, CoreError> {
        let charts = if options.generate_charts {
            self.render_charts(analysis)
        } else {
            String::new()
        };
        let export = match report_action {
            Some(action) => self.render_export_form(analysis, action)?,
            None => String::new(),
        };

        Ok(format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Portfolio Health Report</title>
    <style>{css}</style>
</head>
<body>
    <div class="container">
        <h1 class="main-title">Portfolio Health Report Generator</h1>
        <p class="success">Successfully processed {count} holdings</p>
        {cards}
        {charts}
        {highlights}
        {table}
        {export}
    </div>
    <script>{js}</script>
</body>
</html>"#,
            css = inline_css(),
            js = inline_javascript(),
            count = analysis.holdings.len(),
            cards = self.render_cards(analysis),
            charts = charts,
            highlights = self.render_highlights(analysis),
            table = self.render_holdings_table(&analysis.holdings),
            export = export,
        ))
    }

    fn render_cards(&self, analysis: &Analysis) -> String {
        let s = &analysis.summary;
        let sym = self.currency_symbol.as_str();
        let gain_color = if s.total_gain_loss >= 0.0 { "#10B981" } else { "#EF4444" };
        let cards = [
            ("Total Investment", money(s.total_investment, sym), "#4299E1"),
            ("Current Value", money(s.total_value, sym), "#48BB78"),
            (
                "Gain/Loss",
                format!("{} ({})", money(s.total_gain_loss, sym), pct(s.overall_return_pct, 2)),
                gain_color,
            ),
            ("Holdings", s.holding_count.to_string(), "#9F7AEA"),
        ];

        let mut html = String::from(r#"<h2>Portfolio Summary</h2><div class="cards">"#);
        for (label, value, color) in cards {
            let _ = write!(
                html,
                r#"<div class="metric-card" style="border-top-color: {color};"><div class="metric-label">{label}</div><div class="metric-value">{value}</div></div>"#,
                value = html_escape(&value),
            );
        }
        html.push_str("</div>");
        html
    }

    fn render_charts(&self, analysis: &Analysis) -> String {
        let s = &analysis.summary;
        let sector = self
            .chart_service
            .pie_chart(&s.sector_distribution, "Sector Distribution", Palette::Set3);
        let cap = self.chart_service.pie_chart(
            &s.market_cap_distribution,
            "Market Cap Distribution",
            Palette::Viridis,
        );

        let mut html = String::from(r#"<h2>Portfolio Analysis</h2><div class="columns">"#);
        for chart in [sector, cap].iter().flatten() {
            let _ = write!(html, r#"<div class="chart-container">{}</div>"#, render_svg(chart));
        }
        html.push_str("</div>");
        html
    }

    fn render_highlights(&self, analysis: &Analysis) -> String {
        let s = &analysis.summary;
        let sym = self.currency_symbol.as_str();

        let mut gainers = String::new();
        for h in &s.top_gainers {
            let _ = write!(
                gainers,
                r#"<div class="mover"><strong>{name}</strong><div>Return: {ret}</div><div>Gain: {amount}</div></div>"#,
                name = html_escape(&h.name),
                ret = pct(h.gain_loss_pct, 1),
                amount = html_escape(&money(h.gain_loss, sym)),
            );
        }
        let mut losers = String::new();
        for h in &s.top_losers {
            let _ = write!(
                losers,
                r#"<div class="mover"><strong>{name}</strong><div>Return: {ret}</div><div>Loss: {amount}</div></div>"#,
                name = html_escape(&h.name),
                ret = pct(h.gain_loss_pct, 1),
                amount = html_escape(&money(h.gain_loss.abs(), sym)),
            );
        }

        format!(
            r#"<h2>Performance Highlights</h2>
<div class="columns">
    <div><h3>Top Gainers</h3>{gainers}</div>
    <div><h3>Top Losers</h3>{losers}</div>
</div>"#
        )
    }

    fn render_holdings_table(&self, holdings: &[Holding]) -> String {
        let mut by_value: Vec<&Holding> = holdings.iter().collect();
        by_value.sort_by(|a, b| b.current_value.total_cmp(&a.current_value));

        let mut rows = String::new();
        for h in by_value {
            let _ = write!(
                rows,
                r#"<tr><td>{name}</td><td data-value="{q}">{qty}</td><td data-value="{p}">{price}</td><td>{sector}</td><td data-value="{r}" class="{trend}">{ret}</td><td data-value="{v}">{value}</td></tr>"#,
                name = html_escape(&h.name),
                q = h.quantity,
                qty = grouped(h.quantity, 2),
                p = h.current_price,
                price = grouped(h.current_price, 2),
                sector = html_escape(&h.sector),
                r = h.gain_loss_pct,
                trend = if h.is_gain() { "gain" } else { "loss" },
                ret = pct(h.gain_loss_pct, 2),
                v = h.current_value,
                value = grouped(h.current_value, 2),
            );
        }

        format!(
            r#"<details class="data-table">
    <summary>View Portfolio Data</summary>
    <table id="holdings" class="sortable">
        <thead><tr><th>Stock Name</th><th>Quantity</th><th>Current Price</th><th>Sector</th><th>Gain/Loss %</th><th>Current Value</th></tr></thead>
        <tbody>{rows}</tbody>
    </table>
</details>"#
        )
    }

    fn render_export_form(&self, analysis: &Analysis, action: &str) -> Result<String, CoreError> {
        let payload = serde_json::to_string(&RawTable::from_holdings(&analysis.holdings))
            .map_err(|e| CoreError::Serialization(e.to_string()))?;
        Ok(format!(
            r#"<h2>Generate Report</h2>
<form method="post" action="{action}" enctype="multipart/form-data">
    <input type="hidden" name="holdings" value="{payload}">
    <button type="submit" class="primary">Generate PDF Report</button>
</form>"#,
            action = html_escape(action),
            payload = html_escape(&payload),
        ))
    }
}

impl Default for DashboardService {
    fn default() -> Self {
        Self::new("₹")
    }
}

/// Donut chart with an external legend as an inline SVG element.
#[must_use]
pub fn render_svg(chart: &PieChart) -> String {
    let (cx, cy) = SVG_CENTER;
    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {SVG_WIDTH} {SVG_HEIGHT}" role="img" aria-label="{title}"><text x="{cx}" y="18" text-anchor="middle" class="chart-title">{title}</text>"#,
        title = html_escape(&chart.title),
    );

    for slice in &chart.slices {
        let points = slice.outline(0.0, 0.0, SVG_RADIUS, SVG_RADIUS * PieChart::HOLE_RATIO);
        let mut d = String::new();
        for (i, (x, y)) in points.iter().enumerate() {
            let cmd = if i == 0 { 'M' } else { 'L' };
            // Chart space is y-up, SVG is y-down.
            let _ = write!(d, "{cmd}{:.2} {:.2} ", cx + x, cy - y);
        }
        d.push('Z');
        let _ = write!(
            svg,
            r##"<path d="{d}" fill="{fill}" stroke="#ffffff" stroke-width="1"><title>{tip}</title></path>"##,
            fill = slice.color.hex(),
            tip = html_escape(&slice.legend_label(None)),
        );
    }

    let legend_top = cy - (chart.slices.len() as f64 * 18.0) / 2.0;
    let _ = write!(
        svg,
        r#"<text x="{LEGEND_X}" y="{y:.1}" class="legend-title">{title}</text>"#,
        y = legend_top - 8.0,
        title = html_escape(&chart.title),
    );
    for (i, slice) in chart.slices.iter().enumerate() {
        let y = legend_top + i as f64 * 18.0;
        let _ = write!(
            svg,
            r#"<rect x="{LEGEND_X}" y="{y:.1}" width="12" height="12" fill="{fill}"/><text x="{tx}" y="{ty:.1}" class="legend">{label}</text>"#,
            fill = slice.color.hex(),
            tx = LEGEND_X + 18.0,
            ty = y + 10.0,
            label = html_escape(&slice.legend_label(None)),
        );
    }
    svg.push_str("</svg>");
    svg
}

fn inline_css() -> &'static str {
    r#"
body { font-family: -apple-system, "Segoe UI", Roboto, sans-serif; background: #f8f9fa; color: #2D3748; margin: 0; }
.container { max-width: 1200px; margin: 0 auto; padding: 2rem; }
.main-title { font-size: 2.4rem; color: #1E3A8A; text-align: center; font-weight: 700; }
.success { background: #D1FAE5; color: #065F46; padding: .75rem 1rem; border-radius: 8px; }
.cards { display: grid; grid-template-columns: repeat(4, 1fr); gap: 1rem; }
.metric-card { background: white; padding: 1.2rem; border-radius: 12px; box-shadow: 0 4px 12px rgba(0,0,0,0.08); text-align: center; border-top: 5px solid #4299E1; }
.metric-value { font-size: 1.6rem; font-weight: 700; margin: .5rem 0; }
td.gain { color: #10B981; }
td.loss { color: #EF4444; }
.metric-label { font-size: .9rem; color: #718096; text-transform: uppercase; letter-spacing: 1px; font-weight: 600; }
.columns { display: grid; grid-template-columns: 1fr 1fr; gap: 1.5rem; }
.chart-container { background: white; padding: 1rem; border-radius: 12px; box-shadow: 0 4px 12px rgba(0,0,0,0.08); }
.chart-title { font-size: 16px; font-weight: bold; }
.legend-title { font-size: 12px; font-weight: bold; }
.legend { font-size: 11px; }
.mover { border-bottom: 1px solid #E2E8F0; padding: .5rem 0; }
.data-table { margin-top: 1.5rem; }
table.sortable { width: 100%; border-collapse: collapse; background: white; }
table.sortable th { cursor: pointer; background: #F7FAFC; text-align: left; }
table.sortable th, table.sortable td { padding: 8px; border: 1px solid #E2E8F0; }
button.primary { background: #1E3A8A; color: white; border: 0; padding: .75rem 1.5rem; border-radius: 8px; cursor: pointer; }
"#
}

fn inline_javascript() -> &'static str {
    r#"
document.querySelectorAll('table.sortable th').forEach(function (th, col) {
    th.addEventListener('click', function () {
        var tbody = th.closest('table').querySelector('tbody');
        var rows = Array.prototype.slice.call(tbody.rows);
        var asc = th.dataset.order !== 'asc';
        th.dataset.order = asc ? 'asc' : 'desc';
        rows.sort(function (a, b) {
            var x = a.cells[col], y = b.cells[col];
            var xv = x.dataset.value !== undefined ? parseFloat(x.dataset.value) : x.textContent;
            var yv = y.dataset.value !== undefined ? parseFloat(y.dataset.value) : y.textContent;
            var cmp = typeof xv === 'number' ? xv - yv : String(xv).localeCompare(String(yv));
            return asc ? cmp : -cmp;
        });
        rows.forEach(function (r) { tbody.appendChild(r); });
    });
});
"#
}
