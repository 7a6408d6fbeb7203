use chrono::{DateTime, Local};
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Polygon, Rgb as PdfRgb,
};
use tracing::{debug, info};

use crate::errors::CoreError;
use crate::format::{money, pct, truncate};
use crate::models::analytics::PortfolioSummary;
use crate::models::chart::{Palette, PieChart, Rgb};
use crate::models::report::{Align, Block, ReportDocument, TableBlock, TableStyle};
use crate::models::risk::RiskAssessment;
use crate::models::settings::ReportSettings;
use crate::services::chart_service::ChartService;

pub const REPORT_TITLE: &str = "Portfolio Health Report";
pub const REPORT_FOOTER: &str = "Generated by Portfolio Health Report Generator";

// ── Page geometry (points) ──────────────────────────────────────────

const PAGE_WIDTH: f32 = 595.28;
const PAGE_HEIGHT: f32 = 841.89;
const MARGIN: f32 = 30.0;
const CELL_PADDING: f32 = 3.0;
const CHART_WIDTH: f32 = 288.0; // 4in
const CHART_HEIGHT: f32 = 216.0; // 3in

// ── Label budgets (characters) ──────────────────────────────────────

const HOLDING_NAME_CHARS: usize = 20;
const HOLDING_SECTOR_CHARS: usize = 15;
const MOVER_NAME_CHARS: usize = 15;
const RISK_SECTOR_CHARS: usize = 15;
const LEGEND_LABEL_CHARS: usize = 15;
const LEGEND_TITLE_CHARS: usize = 20;
const LEGEND_LINE: f32 = 9.0;
// Chart title band at the top of the chart box.
const CHART_TITLE_SPACE: f32 = 17.0;

const NAVY: Rgb = Rgb::new(0x1E, 0x3A, 0x8A);
const SLATE: Rgb = Rgb::new(0x2D, 0x37, 0x48);
const BLUE: Rgb = Rgb::new(0x42, 0x99, 0xE1);
const ORANGE: Rgb = Rgb::new(0xED, 0x89, 0x36);
const RED: Rgb = Rgb::new(0xF5, 0x65, 0x65);
const PALE: Rgb = Rgb::new(0xF7, 0xFA, 0xFC);
const WHITE: Rgb = Rgb::new(0xFF, 0xFF, 0xFF);
const BLACK: Rgb = Rgb::new(0x00, 0x00, 0x00);
const GREY: Rgb = Rgb::new(0x80, 0x80, 0x80);

/// Builds and renders the paginated PDF projection of a portfolio.
///
/// `build` is pure layout: it turns a summary into a list of blocks.
/// `render` typesets those blocks onto A4 pages. Charts are drawn as vector
/// paths, so no intermediate image files exist.
pub struct DocumentService {
    chart_service: ChartService,
    currency_symbol: String,
}

impl DocumentService {
    pub fn new(settings: &ReportSettings) -> Self {
        Self {
            chart_service: ChartService::new(),
            currency_symbol: settings.document_currency_symbol.clone(),
        }
    }

    /// Lay out the report for `summary`.
    #[must_use]
    pub fn build(&self, summary: &PortfolioSummary, generated_at: DateTime<Local>) -> ReportDocument {
        let mut blocks = vec![
            Block::Title(REPORT_TITLE.to_string()),
            Block::Subtitle(format!(
                "Generated on: {}",
                generated_at.format("%B %d, %Y at %H:%M")
            )),
            Block::Spacer(20.0),
            Block::Section("Portfolio Summary".to_string()),
            Block::Table(self.summary_table(summary)),
            Block::Spacer(15.0),
        ];

        let charts = [
            ("Sector Distribution", &summary.sector_distribution),
            ("Market Cap Distribution", &summary.market_cap_distribution),
        ];
        for (title, distribution) in charts {
            if let Some(chart) = self.chart_service.pie_chart(distribution, title, Palette::Set3) {
                blocks.push(Block::Section(title.to_string()));
                blocks.push(Block::Chart {
                    chart,
                    width: CHART_WIDTH,
                    height: CHART_HEIGHT,
                });
                blocks.push(Block::Spacer(10.0));
            }
        }

        blocks.extend([
            Block::Section("Top 10 Holdings".to_string()),
            Block::Table(self.holdings_table(summary)),
            Block::Spacer(15.0),
            Block::Section("Performance Highlights".to_string()),
            Block::Table(self.performance_table(summary)),
            Block::Spacer(15.0),
            Block::Section("Risk Assessment".to_string()),
            Block::Table(Self::risk_table(&RiskAssessment::from_summary(summary))),
            Block::Spacer(20.0),
            Block::Footer(REPORT_FOOTER.to_string()),
        ]);

        ReportDocument {
            title: REPORT_TITLE.to_string(),
            generated_at,
            blocks,
        }
    }

    /// Typeset a laid-out report into PDF bytes.
    pub fn render(&self, document: &ReportDocument) -> Result<Vec<u8>, CoreError> {
        let mut writer = PdfWriter::new(&document.title)?;
        for block in &document.blocks {
            writer.write_block(block);
        }
        info!(pages = writer.pages, "report typeset");
        writer.finish()
    }

    // ── Tables ──────────────────────────────────────────────────────

    fn summary_table(&self, s: &PortfolioSummary) -> TableBlock {
        let sym = self.currency_symbol.as_str();
        TableBlock {
            column_widths: vec![180.0, 120.0],
            rows: vec![
                row(["Metric", "Value"]),
                vec!["Total Investment".into(), money(s.total_investment, sym)],
                vec!["Current Value".into(), money(s.total_value, sym)],
                vec!["Total Gain/Loss".into(), money(s.total_gain_loss, sym)],
                vec!["Overall Return".into(), pct(s.overall_return_pct, 2)],
                vec!["Number of Holdings".into(), s.holding_count.to_string()],
                vec!["Number of Sectors".into(), s.sector_count.to_string()],
            ],
            style: TableStyle {
                header_background: NAVY,
                header_text: WHITE,
                header_bold: true,
                body_background: Some(PALE),
                font_size: 8.0,
                header_font_size: 9.0,
            },
        }
    }

    fn holdings_table(&self, s: &PortfolioSummary) -> TableBlock {
        let sym = self.currency_symbol.as_str();
        let mut rows = vec![vec![
            "Stock".to_string(),
            "Sector".to_string(),
            format!("Value ({})", sym),
            "Return %".to_string(),
        ]];
        rows.extend(s.top_holdings.iter().map(|h| {
            vec![
                truncate(&h.name, HOLDING_NAME_CHARS),
                truncate(&h.sector, HOLDING_SECTOR_CHARS),
                money(h.current_value, sym),
                pct(h.gain_loss_pct, 1),
            ]
        }));

        TableBlock {
            column_widths: vec![90.0, 70.0, 80.0, 50.0],
            rows,
            style: TableStyle {
                header_background: BLUE,
                header_text: WHITE,
                header_bold: true,
                body_background: None,
                font_size: 7.0,
                header_font_size: 7.0,
            },
        }
    }

    fn performance_table(&self, s: &PortfolioSummary) -> TableBlock {
        let sym = self.currency_symbol.as_str();
        let mut rows = vec![vec![
            String::new(),
            "Stock".to_string(),
            "Return %".to_string(),
            format!("Gain/Loss ({})", sym),
        ]];
        let labelled = s
            .document_gainers()
            .iter()
            .map(|h| ("Top Gainer", h))
            .chain(s.document_losers().iter().map(|h| ("Top Loser", h)));
        rows.extend(labelled.map(|(role, h)| {
            vec![
                role.to_string(),
                truncate(&h.name, MOVER_NAME_CHARS),
                pct(h.gain_loss_pct, 1),
                money(h.gain_loss, sym),
            ]
        }));

        TableBlock {
            column_widths: vec![60.0, 80.0, 50.0, 80.0],
            rows,
            style: TableStyle {
                header_background: ORANGE,
                header_text: WHITE,
                header_bold: false,
                body_background: None,
                font_size: 7.0,
                header_font_size: 7.0,
            },
        }
    }

    fn risk_table(risk: &RiskAssessment) -> TableBlock {
        let sector = risk.top_sector.as_deref().unwrap_or("N/A");
        TableBlock {
            column_widths: vec![100.0, 80.0, 70.0],
            rows: vec![
                row(["Metric", "Value", "Assessment"]),
                vec![
                    "Concentration (Top 5)".into(),
                    pct(risk.concentration_pct, 1),
                    risk.concentration_level.to_string(),
                ],
                vec![
                    "Largest Sector".into(),
                    format!(
                        "{} ({})",
                        truncate(sector, RISK_SECTOR_CHARS),
                        pct(risk.top_sector_pct, 1)
                    ),
                    risk.sector_level.to_string(),
                ],
            ],
            style: TableStyle {
                header_background: RED,
                header_text: WHITE,
                header_bold: false,
                body_background: None,
                font_size: 7.0,
                header_font_size: 7.0,
            },
        }
    }
}

fn row<const N: usize>(cells: [&str; N]) -> Vec<String> {
    cells.iter().map(|c| c.to_string()).collect()
}

// ═══════════════════════════════════════════════════════════════════
// PDF typesetting
// ═══════════════════════════════════════════════════════════════════

fn mm(pt: f32) -> Mm {
    Mm(pt * 25.4 / 72.0)
}

fn point(x: f32, y: f32) -> Point {
    Point::new(mm(x), mm(y))
}

fn pdf_color(c: Rgb) -> Color {
    let (r, g, b) = c.unit();
    Color::Rgb(PdfRgb::new(r, g, b, None))
}

/// The standard 14 fonts only cover WinAnsi; keep text to printable ASCII.
fn pdf_text(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii() && !c.is_ascii_control() { c } else { '?' })
        .collect()
}

/// Approximate Helvetica advance width. Good enough to centre short labels.
fn text_width(s: &str, size: f32) -> f32 {
    s.chars().count() as f32 * size * 0.5
}

/// Cursor-based writer: blocks flow top to bottom and a new page starts
/// whenever the next element does not fit above the bottom margin.
struct PdfWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    /// Distance of the cursor from the page bottom, in points
    y: f32,
    pages: usize,
}

impl PdfWriter {
    fn new(title: &str) -> Result<Self, CoreError> {
        let (doc, page, layer) =
            PdfDocument::new(pdf_text(title), mm(PAGE_WIDTH), mm(PAGE_HEIGHT), "Layer 1");
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| CoreError::Document(e.to_string()))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| CoreError::Document(e.to_string()))?;
        let layer = doc.get_page(page).get_layer(layer);

        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            y: PAGE_HEIGHT - MARGIN,
            pages: 1,
        })
    }

    fn finish(self) -> Result<Vec<u8>, CoreError> {
        self.doc
            .save_to_bytes()
            .map_err(|e| CoreError::Document(e.to_string()))
    }

    fn ensure_space(&mut self, height: f32) {
        if self.y - height >= MARGIN {
            return;
        }
        let (page, layer) = self
            .doc
            .add_page(mm(PAGE_WIDTH), mm(PAGE_HEIGHT), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = PAGE_HEIGHT - MARGIN;
        self.pages += 1;
        debug!(page = self.pages, "page break");
    }

    fn write_block(&mut self, block: &Block) {
        match block {
            Block::Title(text) => self.paragraph(text, 16.0, true, NAVY, Align::Center, 15.0),
            Block::Subtitle(text) => self.paragraph(text, 8.0, false, BLACK, Align::Center, 0.0),
            Block::Section(text) => self.paragraph(text, 12.0, true, SLATE, Align::Left, 8.0),
            Block::Footer(text) => self.paragraph(text, 6.0, false, GREY, Align::Center, 0.0),
            Block::Spacer(h) => {
                self.y -= h;
            }
            Block::Table(table) => self.table(table),
            Block::Chart {
                chart,
                width,
                height,
            } => self.chart(chart, *width, *height),
        }
    }

    fn paragraph(&mut self, text: &str, size: f32, bold: bool, color: Rgb, align: Align, space_after: f32) {
        let leading = size * 1.2;
        self.ensure_space(leading);
        let text = pdf_text(text);
        let x = match align {
            Align::Left => MARGIN,
            Align::Center => (PAGE_WIDTH - text_width(&text, size)) / 2.0,
        };
        self.y -= leading;
        self.text(&text, size, bold, color, x, self.y + size * 0.2);
        self.y -= space_after;
    }

    fn text(&self, text: &str, size: f32, bold: bool, color: Rgb, x: f32, baseline: f32) {
        let font = if bold { &self.bold } else { &self.regular };
        self.layer.set_fill_color(pdf_color(color));
        self.layer.use_text(text, size, mm(x), mm(baseline), font);
    }

    fn fill_polygon(&self, points: &[(f32, f32)], color: Rgb) {
        self.layer.set_fill_color(pdf_color(color));
        self.layer.add_polygon(Polygon {
            rings: vec![points.iter().map(|&(x, y)| (point(x, y), false)).collect()],
            mode: PaintMode::Fill,
            winding_order: WindingOrder::NonZero,
        });
    }

    fn stroke_rect(&self, x: f32, y: f32, w: f32, h: f32, color: Rgb, thickness: f32) {
        self.layer.set_outline_color(pdf_color(color));
        self.layer.set_outline_thickness(thickness);
        self.layer.add_line(Line {
            points: vec![
                (point(x, y), false),
                (point(x + w, y), false),
                (point(x + w, y + h), false),
                (point(x, y + h), false),
            ],
            is_closed: true,
        });
    }

    fn table(&mut self, table: &TableBlock) {
        let left = (PAGE_WIDTH - table.width()) / 2.0;
        for (idx, cells) in table.rows.iter().enumerate() {
            let is_header = idx == 0;
            let size = if is_header {
                table.style.header_font_size
            } else {
                table.style.font_size
            };
            let height = size * 1.2 + CELL_PADDING * 2.0;
            self.ensure_space(height);
            let bottom = self.y - height;

            let background = if is_header {
                Some(table.style.header_background)
            } else {
                table.style.body_background
            };
            if let Some(bg) = background {
                self.fill_polygon(
                    &[
                        (left, bottom),
                        (left + table.width(), bottom),
                        (left + table.width(), self.y),
                        (left, self.y),
                    ],
                    bg,
                );
            }

            let color = if is_header { table.style.header_text } else { BLACK };
            let bold = is_header && table.style.header_bold;
            let mut x = left;
            for (cell, width) in cells.iter().zip(&table.column_widths) {
                let text = pdf_text(cell);
                let tx = x + (width - text_width(&text, size)) / 2.0;
                self.text(&text, size, bold, color, tx, bottom + CELL_PADDING + size * 0.25);
                self.stroke_rect(x, bottom, *width, height, GREY, 0.5);
                x += width;
            }
            self.y = bottom;
        }
    }

    fn chart(&mut self, chart: &PieChart, width: f32, height: f32) {
        self.ensure_space(height);
        let left = (PAGE_WIDTH - width) / 2.0;
        let top = self.y;
        let bottom = top - height;

        let title = pdf_text(&chart.title);
        let title_size = 9.0;
        self.text(
            &title,
            title_size,
            true,
            BLACK,
            left + (width - text_width(&title, title_size)) / 2.0,
            top - title_size - 2.0,
        );

        let radius = height * 0.36;
        let cx = f64::from(left + width * 0.3);
        let cy = f64::from(bottom + (height - title_size - 4.0) / 2.0);
        for slice in &chart.slices {
            let outline: Vec<(f32, f32)> = slice
                .outline(cx, cy, f64::from(radius), f64::from(radius) * PieChart::HOLE_RATIO)
                .into_iter()
                .map(|(x, y)| (x as f32, y as f32))
                .collect();
            self.fill_polygon(&outline, slice.color);
        }

        let legend_x = left + width * 0.6;
        let fit = LegendFit::new(chart.slices.len(), height);
        let rows = fit.shown + usize::from(fit.hidden > 0);
        let mut ly = (cy as f32 + (rows as f32 * LEGEND_LINE) / 2.0)
            .min(top - CHART_TITLE_SPACE - LEGEND_LINE);
        let legend_title = pdf_text(&truncate(&chart.title, LEGEND_TITLE_CHARS));
        self.text(&legend_title, 7.0, true, BLACK, legend_x, ly + 2.0);
        for slice in chart.slices.iter().take(fit.shown) {
            ly -= LEGEND_LINE;
            self.fill_polygon(
                &[
                    (legend_x, ly),
                    (legend_x + 6.0, ly),
                    (legend_x + 6.0, ly + 6.0),
                    (legend_x, ly + 6.0),
                ],
                slice.color,
            );
            let label = pdf_text(&slice.legend_label(Some(LEGEND_LABEL_CHARS)));
            self.text(&label, 6.0, false, BLACK, legend_x + 9.0, ly + 1.0);
        }
        if fit.hidden > 0 {
            ly -= LEGEND_LINE;
            let note = format!("+{} more", fit.hidden);
            self.text(&note, 6.0, false, GREY, legend_x + 9.0, ly + 1.0);
        }

        self.y = bottom;
    }
}

/// How many legend entries fit beside a chart box of `height`.
///
/// Slices arrive largest first, so the smallest are the ones folded into
/// the "+N more" row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LegendFit {
    shown: usize,
    hidden: usize,
}

impl LegendFit {
    fn new(entries: usize, height: f32) -> Self {
        // Rows below the legend title.
        let capacity = ((height - CHART_TITLE_SPACE - LEGEND_LINE) / LEGEND_LINE)
            .floor()
            .max(1.0) as usize;
        if entries <= capacity {
            Self {
                shown: entries,
                hidden: 0,
            }
        } else {
            let shown = capacity - 1;
            Self {
                shown,
                hidden: entries - shown,
            }
        }
    }
}
