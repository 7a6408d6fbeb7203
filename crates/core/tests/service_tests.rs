// ═══════════════════════════════════════════════════════════════════
// Service Tests: ImportService, AnalyticsService, ChartService,
// DashboardService, DocumentService
// ═══════════════════════════════════════════════════════════════════

use chrono::{Local, TimeZone};

use portfolio_health_core::errors::CoreError;
use portfolio_health_core::models::analytics::{Analysis, PortfolioSummary};
use portfolio_health_core::models::chart::Palette;
use portfolio_health_core::models::holding::{Holding, DEFAULT_MARKET_CAP, DEFAULT_SECTOR};
use portfolio_health_core::models::report::Block;
use portfolio_health_core::models::settings::{DashboardOptions, ReportSettings};
use portfolio_health_core::models::table::{CellValue, RawTable};
use portfolio_health_core::services::analytics_service::AnalyticsService;
use portfolio_health_core::services::chart_service::ChartService;
use portfolio_health_core::services::dashboard_service::DashboardService;
use portfolio_health_core::services::document_service::{DocumentService, REPORT_FOOTER};
use portfolio_health_core::services::import_service::{ImportService, SpreadsheetFormat};

// ═══════════════════════════════════════════════════════════════════
// Fixtures
// ═══════════════════════════════════════════════════════════════════

const FULL_CSV: &str = "\
Stock Name,Quantity,Buy Price,Current Price,Sector,Market Cap
Reliance,10,2000,2500,Energy,Large Cap
HDFC Bank,20,1500,1400,Banking,Large Cap
Infosys,15,1200,1500,IT,Large Cap
Tata Motors,50,400,600,Automobile,Large Cap
Zomato,100,80,60,Consumer,Mid Cap
ICICI Bank,25,900,1000,Banking,Large Cap
Dixon,5,3000,5000,Electronics,Small Cap
";

fn table_from_csv(csv: &str) -> RawTable {
    ImportService::new()
        .read_bytes(csv.as_bytes(), Some("holdings.csv"))
        .unwrap()
}

fn analyze(csv: &str) -> Analysis {
    let service = AnalyticsService::new();
    let (holdings, report) = service.derive(&table_from_csv(csv)).unwrap();
    let summary = service.summarize(&holdings);
    Analysis {
        holdings,
        summary,
        report,
    }
}

fn holding(name: &str, qty: f64, buy: f64, current: f64, sector: &str) -> Holding {
    Holding::new(name, qty, buy, current, sector, "Large Cap")
}

fn summarize(holdings: &[Holding]) -> PortfolioSummary {
    // Weights come from derive; rebuild through a raw table so they are set.
    let service = AnalyticsService::new();
    let (derived, _) = service.derive(&RawTable::from_holdings(holdings)).unwrap();
    service.summarize(&derived)
}

// ═══════════════════════════════════════════════════════════════════
// ImportService
// ═══════════════════════════════════════════════════════════════════

mod import_service {
    use super::*;

    #[test]
    fn csv_header_and_rows() {
        let table = table_from_csv(FULL_CSV);
        assert_eq!(table.headers.len(), 6);
        assert_eq!(table.headers[0], "Stock Name");
        assert_eq!(table.row_count(), 7);
        assert_eq!(table.cell(0, 0), &CellValue::from("Reliance"));
    }

    #[test]
    fn csv_bom_is_stripped() {
        let table = table_from_csv("\u{feff}Stock Name,Quantity\nA,1\n");
        assert_eq!(table.column_index("Stock Name"), Some(0));
    }

    #[test]
    fn csv_empty_fields_are_empty_cells() {
        let table = table_from_csv("Stock Name,Quantity\nA,\n");
        assert_eq!(table.cell(0, 1), &CellValue::Empty);
    }

    #[test]
    fn csv_ragged_rows_are_accepted() {
        let table = table_from_csv("Stock Name,Quantity,Buy Price\nA,1\nB,2,3,4\n");
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.cell(0, 2), &CellValue::Empty);
    }

    #[test]
    fn empty_csv_is_an_empty_sheet() {
        let err = ImportService::new()
            .read_bytes(b"", Some("empty.csv"))
            .unwrap_err();
        assert!(matches!(err, CoreError::EmptySheet));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = ImportService::new()
            .read_bytes(b"anything", Some("notes.txt"))
            .unwrap_err();
        assert!(matches!(err, CoreError::UnsupportedFormat(ref ext) if ext == ".txt"));
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(
            SpreadsheetFormat::from_file_name("book.XLSX").unwrap(),
            Some(SpreadsheetFormat::Excel)
        );
        assert_eq!(
            SpreadsheetFormat::from_file_name("a.csv").unwrap(),
            Some(SpreadsheetFormat::Csv)
        );
        assert_eq!(SpreadsheetFormat::from_file_name("noext").unwrap(), None);
    }

    #[test]
    fn sniffing() {
        assert_eq!(SpreadsheetFormat::sniff(b"PK\x03\x04rest"), SpreadsheetFormat::Excel);
        assert_eq!(
            SpreadsheetFormat::sniff(&[0xD0, 0xCF, 0x11, 0xE0, 0]),
            SpreadsheetFormat::Excel
        );
        assert_eq!(SpreadsheetFormat::sniff(b"Stock Name,"), SpreadsheetFormat::Csv);
    }

    #[test]
    fn unnamed_bytes_are_sniffed_as_csv() {
        let table = ImportService::new()
            .read_bytes(FULL_CSV.as_bytes(), None)
            .unwrap();
        assert_eq!(table.row_count(), 7);
    }

    #[test]
    fn workbook_first_sheet_is_read() {
        let bytes = include_bytes!("fixtures/holdings.xlsx");
        let table = ImportService::new()
            .read_bytes(bytes, Some("holdings.xlsx"))
            .unwrap();

        assert_eq!(
            table.headers,
            ["Stock Name", "Quantity", "Buy Price", "Current Price", "Sector", "Market Cap"]
        );
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.cell(0, 0), &CellValue::from("Reliance"));
        assert_eq!(table.cell(0, 1), &CellValue::Number(10.0));
        assert_eq!(table.cell(0, 3), &CellValue::Number(2500.5));
        assert_eq!(table.cell(2, 1), &CellValue::from("n/a"));
        assert!(table.column_index("Comment").is_none());
    }

    #[test]
    fn workbook_rows_derive_like_csv_rows() {
        let service = AnalyticsService::new();
        let table = ImportService::new()
            .read_bytes(include_bytes!("fixtures/holdings.xlsx"), None)
            .unwrap();
        let (holdings, report) = service.derive(&table).unwrap();

        assert_eq!(holdings.len(), 3);
        assert_eq!(report.coerced_cells, 1);
        assert_eq!(holdings[0].current_value, 25005.0);
        assert_eq!(holdings[1].name, "Bonus");
        assert_eq!(holdings[1].gain_loss_pct, 5000.0);
        assert_eq!(holdings[2].quantity, 0.0);
        assert_eq!(holdings[2].sector, "Banking");
    }

    #[test]
    fn corrupt_workbook_is_a_spreadsheet_error() {
        let err = ImportService::new()
            .read_bytes(b"PK\x03\x04garbage", Some("book.xlsx"))
            .unwrap_err();
        assert!(matches!(err, CoreError::Spreadsheet(_)));
        assert!(err.is_input_error());
    }

    #[test]
    fn read_path_uses_the_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("portfolio.csv");
        std::fs::write(&path, FULL_CSV).unwrap();
        let table = ImportService::new().read_path(&path).unwrap();
        assert_eq!(table.row_count(), 7);
    }

    #[test]
    fn read_path_missing_file() {
        let err = ImportService::new()
            .read_path("/no/such/portfolio.csv")
            .unwrap_err();
        assert!(matches!(err, CoreError::FileIO(_)));
    }
}

// ═══════════════════════════════════════════════════════════════════
// AnalyticsService::derive
// ═══════════════════════════════════════════════════════════════════

mod derive {
    use super::*;

    #[test]
    fn investment_plus_gain_is_value() {
        let analysis = analyze(FULL_CSV);
        for h in &analysis.holdings {
            assert!((h.investment + h.gain_loss - h.current_value).abs() < 1e-9);
        }
    }

    #[test]
    fn weights_sum_to_one_hundred() {
        let analysis = analyze(FULL_CSV);
        let total: f64 = analysis.holdings.iter().map(|h| h.weight_pct).sum();
        assert!((total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn negative_total_value_still_weighs_holdings() {
        let analysis = analyze("Stock Name,Quantity,Buy Price,Current Price\nShort,-10,5,6\nLong,1,10,20\n");
        assert_eq!(analysis.summary.total_value, -40.0);

        let weights: Vec<f64> = analysis.holdings.iter().map(|h| h.weight_pct).collect();
        assert!((weights[0] - 150.0).abs() < 1e-9);
        assert!((weights[1] + 50.0).abs() < 1e-9);
        assert!((weights.iter().sum::<f64>() - 100.0).abs() < 1e-9);
        assert!((analysis.summary.top_sector_pct - 100.0).abs() < 1e-9);
    }

    #[test]
    fn missing_required_column_is_reported() {
        let table = table_from_csv("Stock Name,Quantity,Current Price\nA,1,2\n");
        let err = AnalyticsService::new().derive(&table).unwrap_err();
        assert!(matches!(err, CoreError::MissingColumn(ref c) if c == "Buy Price"));
    }

    #[test]
    fn first_missing_column_wins() {
        let table = table_from_csv("Sector\nIT\n");
        let err = AnalyticsService::new().derive(&table).unwrap_err();
        assert!(matches!(err, CoreError::MissingColumn(ref c) if c == "Stock Name"));
    }

    #[test]
    fn optional_columns_get_defaults() {
        let analysis = analyze("Stock Name,Quantity,Buy Price,Current Price\nA,1,10,12\nB,2,5,5\n");
        assert!(analysis.report.sector_column_synthesized);
        assert!(analysis.report.market_cap_column_synthesized);
        for h in &analysis.holdings {
            assert_eq!(h.sector, DEFAULT_SECTOR);
            assert_eq!(h.market_cap, DEFAULT_MARKET_CAP);
        }
        let dist = &analysis.summary.sector_distribution;
        assert_eq!(dist.len(), 1);
        assert_eq!(dist[0].label, "Uncategorized");
        assert_eq!(dist[0].value, analysis.summary.total_value);
    }

    #[test]
    fn blank_labels_fall_back_to_defaults() {
        let analysis = analyze(
            "Stock Name,Quantity,Buy Price,Current Price,Sector,Market Cap\nA,1,10,12, ,\n",
        );
        assert_eq!(analysis.holdings[0].sector, DEFAULT_SECTOR);
        assert_eq!(analysis.holdings[0].market_cap, DEFAULT_MARKET_CAP);
        assert!(!analysis.report.sector_column_synthesized);
    }

    #[test]
    fn zero_buy_price_keeps_the_raw_gain_ratio() {
        let analysis = analyze("Stock Name,Quantity,Buy Price,Current Price\nBonus,10,0,5\n");
        let h = &analysis.holdings[0];
        assert_eq!(h.investment, 0.0);
        assert_eq!(h.gain_loss, 50.0);
        assert_eq!(h.gain_loss_pct, 5000.0);
        assert_eq!(analysis.summary.overall_return_pct, 0.0);
    }

    #[test]
    fn unparsable_numbers_become_zero_and_are_counted() {
        let analysis = analyze(
            "Stock Name,Quantity,Buy Price,Current Price\nA,ten,10,12\nB,2,,5\nC,1,1,1\n",
        );
        assert_eq!(analysis.holdings.len(), 3);
        assert_eq!(analysis.holdings[0].quantity, 0.0);
        assert_eq!(analysis.holdings[1].buy_price, 0.0);
        assert_eq!(analysis.report.coerced_cells, 2);
    }

    #[test]
    fn blank_rows_are_skipped() {
        let analysis = analyze("Stock Name,Quantity,Buy Price,Current Price\nA,1,1,2\n,,,\nB,1,1,1\n");
        assert_eq!(analysis.holdings.len(), 2);
        assert_eq!(analysis.report.rows_read, 3);
        assert_eq!(analysis.report.blank_rows_skipped, 1);
    }

    #[test]
    fn duplicate_names_stay_separate() {
        let analysis = analyze("Stock Name,Quantity,Buy Price,Current Price\nA,1,1,2\nA,3,1,1\n");
        assert_eq!(analysis.holdings.len(), 2);
    }

    #[test]
    fn worthless_portfolio_has_zero_weights() {
        let analysis = analyze("Stock Name,Quantity,Buy Price,Current Price\nA,1,10,0\nB,0,5,5\n");
        assert!(analysis.holdings.iter().all(|h| h.weight_pct == 0.0));
        assert_eq!(analysis.summary.concentration_risk, 0.0);
        assert_eq!(analysis.summary.top_sector_pct, 0.0);
    }

    #[test]
    fn header_only_sheet_yields_no_holdings() {
        let analysis = analyze("Stock Name,Quantity,Buy Price,Current Price\n");
        assert!(analysis.holdings.is_empty());
        assert_eq!(analysis.summary.holding_count, 0);
        assert_eq!(analysis.summary.top_sector, None);
        assert!(analysis.summary.sector_distribution.is_empty());
    }
}

// ═══════════════════════════════════════════════════════════════════
// AnalyticsService::summarize
// ═══════════════════════════════════════════════════════════════════

mod summarize {
    use super::*;

    #[test]
    fn totals() {
        let s = analyze(FULL_CSV).summary;
        // 20000 + 30000 + 18000 + 20000 + 8000 + 22500 + 15000
        assert_eq!(s.total_investment, 133_500.0);
        // 25000 + 28000 + 22500 + 30000 + 6000 + 25000 + 25000
        assert_eq!(s.total_value, 161_500.0);
        assert_eq!(s.total_gain_loss, 28_000.0);
        assert!((s.overall_return_pct - 28_000.0 / 133_500.0 * 100.0).abs() < 1e-9);
        assert_eq!(s.holding_count, 7);
        assert_eq!(s.sector_count, 6);
    }

    #[test]
    fn sector_distribution_is_largest_first() {
        let s = analyze(FULL_CSV).summary;
        assert_eq!(s.sector_distribution[0].label, "Banking");
        assert_eq!(s.sector_distribution[0].value, 53_000.0);
        assert_eq!(s.top_sector.as_deref(), Some("Banking"));
        assert!((s.top_sector_pct - 53_000.0 / 161_500.0 * 100.0).abs() < 1e-9);
        let pct_sum: f64 = s.sector_distribution.iter().map(|c| c.pct).sum();
        assert!((pct_sum - 100.0).abs() < 1e-9);
    }

    #[test]
    fn distribution_ties_break_by_label() {
        let s = summarize(&[
            holding("X", 1.0, 1.0, 10.0, "Zeta"),
            holding("Y", 1.0, 1.0, 10.0, "Alpha"),
        ]);
        assert_eq!(s.sector_distribution[0].label, "Alpha");
        assert_eq!(s.top_sector.as_deref(), Some("Alpha"));
    }

    #[test]
    fn market_cap_distribution() {
        let s = analyze(FULL_CSV).summary;
        let labels: Vec<&str> = s
            .market_cap_distribution
            .iter()
            .map(|c| c.label.as_str())
            .collect();
        assert_eq!(labels, vec!["Large Cap", "Small Cap", "Mid Cap"]);
    }

    #[test]
    fn top_holdings_by_value_capped_at_ten() {
        let holdings: Vec<Holding> = (1..=12)
            .map(|i| holding(&format!("H{i}"), 1.0, 1.0, f64::from(i), "S"))
            .collect();
        let s = summarize(&holdings);
        assert_eq!(s.top_holdings.len(), 10);
        assert_eq!(s.top_holdings[0].name, "H12");
        assert_eq!(s.top_holdings[9].name, "H3");
    }

    #[test]
    fn ranking_ties_keep_sheet_order() {
        let s = summarize(&[
            holding("First", 1.0, 10.0, 20.0, "S"),
            holding("Second", 1.0, 10.0, 20.0, "S"),
        ]);
        assert_eq!(s.top_holdings[0].name, "First");
        assert_eq!(s.top_gainers[0].name, "First");
        assert_eq!(s.top_losers[0].name, "First");
    }

    #[test]
    fn concentration_of_three_holdings_is_total() {
        let s = summarize(&[
            holding("A", 1.0, 1.0, 600.0, "S"),
            holding("B", 1.0, 1.0, 300.0, "S"),
            holding("C", 1.0, 1.0, 100.0, "S"),
        ]);
        assert!((s.concentration_risk - 100.0).abs() < 1e-9);
    }

    #[test]
    fn concentration_counts_five_largest() {
        let holdings: Vec<Holding> = (0..10).map(|i| holding(&format!("H{i}"), 1.0, 1.0, 10.0, "S")).collect();
        let s = summarize(&holdings);
        assert!((s.concentration_risk - 50.0).abs() < 1e-9);
    }

    #[test]
    fn gainers_and_losers_are_ordered_by_return() {
        let s = analyze(FULL_CSV).summary;
        assert_eq!(s.top_gainers.len(), 5);
        assert_eq!(s.top_gainers[0].name, "Dixon");
        assert_eq!(s.top_losers[0].name, "Zomato");
        assert!(s
            .top_gainers
            .windows(2)
            .all(|w| w[0].gain_loss_pct >= w[1].gain_loss_pct));
        assert!(s
            .top_losers
            .windows(2)
            .all(|w| w[0].gain_loss_pct <= w[1].gain_loss_pct));
    }

    #[test]
    fn small_portfolios_list_everyone_as_gainer_and_loser() {
        let s = summarize(&[
            holding("A", 1.0, 10.0, 15.0, "S"),
            holding("B", 1.0, 10.0, 11.0, "S"),
            holding("C", 1.0, 10.0, 9.0, "S"),
            holding("D", 1.0, 10.0, 5.0, "S"),
        ]);
        assert_eq!(s.top_gainers.len(), 4);
        assert_eq!(s.top_losers.len(), 4);
        for g in &s.top_gainers {
            assert!(s.top_losers.iter().any(|l| l.name == g.name));
        }
    }

    #[test]
    fn document_movers_take_three() {
        let s = analyze(FULL_CSV).summary;
        assert_eq!(s.document_gainers().len(), 3);
        assert_eq!(s.document_losers().len(), 3);
        assert_eq!(s.document_gainers()[0].name, s.top_gainers[0].name);

        let tiny = summarize(&[holding("Only", 1.0, 1.0, 2.0, "S")]);
        assert_eq!(tiny.document_gainers().len(), 1);
    }
}

// ═══════════════════════════════════════════════════════════════════
// ChartService
// ═══════════════════════════════════════════════════════════════════

mod chart_service {
    use super::*;

    #[test]
    fn slices_cover_the_full_circle() {
        let s = analyze(FULL_CSV).summary;
        let chart = ChartService::new()
            .pie_chart(&s.sector_distribution, "Sector Distribution", Palette::Set3)
            .unwrap();
        assert_eq!(chart.slices.len(), 6);
        assert_eq!(chart.slices[0].start_angle, 90.0);
        let last = chart.slices.last().unwrap();
        assert!((last.end_angle - 450.0).abs() < 1e-9);
        for w in chart.slices.windows(2) {
            assert_eq!(w[0].end_angle, w[1].start_angle);
        }
        let pct_sum: f64 = chart.slices.iter().map(|s| s.pct).sum();
        assert!((pct_sum - 100.0).abs() < 1e-9);
    }

    #[test]
    fn zero_value_categories_are_dropped() {
        let s = summarize(&[
            holding("A", 1.0, 1.0, 10.0, "Live"),
            holding("B", 1.0, 1.0, 0.0, "Dead"),
        ]);
        assert_eq!(s.sector_count, 2);
        let chart = ChartService::new()
            .pie_chart(&s.sector_distribution, "t", Palette::Set3)
            .unwrap();
        assert_eq!(chart.slices.len(), 1);
        assert_eq!(chart.slices[0].label, "Live");
    }

    #[test]
    fn nothing_positive_means_no_chart() {
        assert!(ChartService::new().pie_chart(&[], "t", Palette::Viridis).is_none());
        let s = summarize(&[holding("A", 1.0, 1.0, 0.0, "S")]);
        assert!(ChartService::new()
            .pie_chart(&s.sector_distribution, "t", Palette::Set3)
            .is_none());
    }
}

// ═══════════════════════════════════════════════════════════════════
// DashboardService
// ═══════════════════════════════════════════════════════════════════

mod dashboard_service {
    use super::*;

    #[test]
    fn page_contains_every_section() {
        let analysis = analyze(FULL_CSV);
        let html = DashboardService::default()
            .render(&analysis, &DashboardOptions::default(), Some("/report"))
            .unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("Successfully processed 7 holdings"));
        assert!(html.contains("Total Investment"));
        assert!(html.contains("₹133,500"));
        assert!(html.contains("Sector Distribution"));
        assert!(html.contains("Market Cap Distribution"));
        assert!(html.contains("Top Gainers"));
        assert!(html.contains("Top Losers"));
        assert!(html.contains("Loss: ₹2,000"));
        assert!(html.contains(r#"action="/report""#));
        assert!(html.contains(r#"name="holdings""#));
    }

    #[test]
    fn charts_can_be_switched_off() {
        let analysis = analyze(FULL_CSV);
        let options = DashboardOptions {
            generate_charts: false,
            include_ai_analysis: false,
        };
        let html = DashboardService::default()
            .render(&analysis, &options, None)
            .unwrap();
        assert!(!html.contains("<svg"));
        assert!(!html.contains("<form"));
    }

    #[test]
    fn table_is_ordered_by_value() {
        let analysis = analyze(FULL_CSV);
        let html = DashboardService::default()
            .render(&analysis, &DashboardOptions::default(), None)
            .unwrap();
        let table = &html[html.find(r#"id="holdings""#).unwrap()..];
        let tata = table.find("Tata Motors").unwrap();
        let zomato = table.find("Zomato").unwrap();
        assert!(tata < zomato);
    }

    #[test]
    fn returns_are_coloured_by_sign() {
        let analysis = analyze(FULL_CSV);
        let html = DashboardService::default()
            .render(&analysis, &DashboardOptions::default(), None)
            .unwrap();
        assert!(html.contains(r#"class="gain">25.00%</td>"#));
        assert!(html.contains(r#"class="loss">-25.00%</td>"#));
    }

    #[test]
    fn user_text_is_escaped() {
        let analysis = analyze(
            "Stock Name,Quantity,Buy Price,Current Price,Sector\n<script>x</script>,1,1,2,A&B\n",
        );
        let html = DashboardService::default()
            .render(&analysis, &DashboardOptions::default(), Some("/report"))
            .unwrap();
        assert!(!html.contains("<script>x</script>"));
        assert!(html.contains("&lt;script&gt;x&lt;/script&gt;"));
        assert!(html.contains("A&amp;B"));
    }

    #[test]
    fn export_payload_round_trips() {
        let analysis = analyze(FULL_CSV);
        let table = RawTable::from_holdings(&analysis.holdings);
        let again = AnalyticsService::new().derive(&table).unwrap().0;
        assert_eq!(again, analysis.holdings);
    }
}

// ═══════════════════════════════════════════════════════════════════
// DocumentService
// ═══════════════════════════════════════════════════════════════════

mod document_service {
    use super::*;

    fn build(csv: &str) -> portfolio_health_core::models::report::ReportDocument {
        let at = Local.with_ymd_and_hms(2026, 10, 18, 14, 5, 0).single().unwrap();
        DocumentService::new(&ReportSettings::default()).build(&analyze(csv).summary, at)
    }

    #[test]
    fn sections_in_order() {
        let doc = build(FULL_CSV);
        let sections: Vec<&str> = doc.sections().collect();
        assert_eq!(
            sections,
            vec![
                "Portfolio Summary",
                "Sector Distribution",
                "Market Cap Distribution",
                "Top 10 Holdings",
                "Performance Highlights",
                "Risk Assessment",
            ]
        );
        assert_eq!(doc.tables().count(), 4);
        assert!(matches!(doc.blocks.first(), Some(Block::Title(t)) if t == "Portfolio Health Report"));
        assert!(matches!(doc.blocks.last(), Some(Block::Footer(f)) if f == REPORT_FOOTER));
    }

    #[test]
    fn generated_on_line() {
        let doc = build(FULL_CSV);
        assert!(doc
            .blocks
            .iter()
            .any(|b| matches!(b, Block::Subtitle(s) if s == "Generated on: October 18, 2026 at 14:05")));
    }

    #[test]
    fn summary_table() {
        let doc = build(FULL_CSV);
        let table = doc.table_after("Portfolio Summary").unwrap();
        assert_eq!(table.rows.len(), 7);
        assert_eq!(table.column_widths, vec![180.0, 120.0]);
        assert_eq!(table.rows[1], vec!["Total Investment", "Rs.133,500"]);
        assert_eq!(table.rows[4][1], "20.97%");
        assert_eq!(table.rows[5], vec!["Number of Holdings", "7"]);
        assert_eq!(table.rows[6], vec!["Number of Sectors", "6"]);
    }

    #[test]
    fn charts_are_four_by_three_inches() {
        let doc = build(FULL_CSV);
        assert_eq!(doc.charts().count(), 2);
        for block in &doc.blocks {
            if let Block::Chart { width, height, .. } = block {
                assert_eq!((*width, *height), (288.0, 216.0));
            }
        }
    }

    #[test]
    fn worthless_portfolio_has_no_charts() {
        let doc = build("Stock Name,Quantity,Buy Price,Current Price\nA,1,10,0\n");
        assert_eq!(doc.charts().count(), 0);
        assert!(!doc.sections().any(|s| s == "Sector Distribution"));
    }

    #[test]
    fn holdings_table_truncates() {
        let doc = build(
            "Stock Name,Quantity,Buy Price,Current Price,Sector\n\
             A Very Long Company Name Limited,1,1,2,Information Technology\n",
        );
        let table = doc.table_after("Top 10 Holdings").unwrap();
        assert_eq!(table.column_widths, vec![90.0, 70.0, 80.0, 50.0]);
        assert_eq!(table.rows[1][0], "A Very Long Company ");
        assert_eq!(table.rows[1][1], "Information Tec");
        assert_eq!(table.rows[1][3], "100.0%");
    }

    #[test]
    fn performance_table_labels_three_each() {
        let doc = build(FULL_CSV);
        let table = doc.table_after("Performance Highlights").unwrap();
        let roles: Vec<&str> = table.body().iter().map(|r| r[0].as_str()).collect();
        assert_eq!(
            roles,
            vec!["Top Gainer", "Top Gainer", "Top Gainer", "Top Loser", "Top Loser", "Top Loser"]
        );
        assert_eq!(table.body()[0][1], "Dixon");
        assert_eq!(table.body()[3][1], "Zomato");
        assert_eq!(table.body()[3][3], "Rs.-2,000");
    }

    #[test]
    fn risk_table() {
        let doc = build(FULL_CSV);
        let table = doc.table_after("Risk Assessment").unwrap();
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[1][0], "Concentration (Top 5)");
        assert_eq!(table.rows[2][0], "Largest Sector");
        assert_eq!(table.rows[2][1], "Banking (32.8%)");
        assert_eq!(table.rows[2][2], "Moderate");
    }

    #[test]
    fn empty_portfolio_risk_is_not_applicable() {
        let doc = build("Stock Name,Quantity,Buy Price,Current Price\n");
        let table = doc.table_after("Risk Assessment").unwrap();
        assert_eq!(table.rows[2][1], "N/A (0.0%)");
        assert_eq!(table.rows[2][2], "Low");
    }

    #[test]
    fn renders_a_pdf() {
        let service = DocumentService::new(&ReportSettings::default());
        let doc = build(FULL_CSV);
        let bytes = service.render(&doc).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn renders_a_chart_with_more_sectors_than_legend_rows() {
        let mut csv = String::from("Stock Name,Quantity,Buy Price,Current Price,Sector\n");
        for i in 0..40 {
            csv.push_str(&format!("S{i},1,10,{},Sector {i}\n", 10 + i));
        }
        let doc = build(&csv);
        let sector_chart = doc
            .charts()
            .find(|c| c.title == "Sector Distribution")
            .unwrap();
        assert_eq!(sector_chart.slices.len(), 40);

        let bytes = DocumentService::new(&ReportSettings::default())
            .render(&doc)
            .unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn renders_a_long_multi_page_pdf() {
        let mut csv = String::from("Stock Name,Quantity,Buy Price,Current Price,Sector,Market Cap\n");
        for i in 0..40 {
            csv.push_str(&format!("Stock ₹{i},{},10,{},Sector {},Cap {}\n", i + 1, 5 + i, i % 15, i % 4));
        }
        let service = DocumentService::new(&ReportSettings::default());
        let bytes = service.render(&build(&csv)).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
