pub mod errors;
pub mod format;
pub mod models;
pub mod services;

use std::path::Path;

use chrono::Local;
use tracing::info;

use errors::CoreError;
use models::{
    analytics::Analysis,
    report::{ReportArtifact, ReportDocument},
    settings::{DashboardOptions, ReportSettings},
    table::RawTable,
};
use services::{
    analytics_service::AnalyticsService, dashboard_service::DashboardService,
    document_service::DocumentService, import_service::ImportService,
};

/// Main entry point for the portfolio health core library.
/// Holds the report settings and every service needed to go from an
/// uploaded sheet to a dashboard page or a PDF report.
///
/// Stateless between calls: each analysis is returned to the caller.
#[must_use]
pub struct PortfolioHealth {
    settings: ReportSettings,
    import_service: ImportService,
    analytics_service: AnalyticsService,
    dashboard_service: DashboardService,
    document_service: DocumentService,
}

impl std::fmt::Debug for PortfolioHealth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortfolioHealth")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl Default for PortfolioHealth {
    fn default() -> Self {
        Self::new(ReportSettings::default())
    }
}

impl PortfolioHealth {
    pub fn new(settings: ReportSettings) -> Self {
        Self {
            import_service: ImportService::new(),
            analytics_service: AnalyticsService::new(),
            dashboard_service: DashboardService::new(settings.currency_symbol.clone()),
            document_service: DocumentService::new(&settings),
            settings,
        }
    }

    #[must_use]
    pub fn settings(&self) -> &ReportSettings {
        &self.settings
    }

    // ── Loading ─────────────────────────────────────────────────────

    /// Parse uploaded file contents. `file_name` selects the format by
    /// extension when present; otherwise the bytes are sniffed.
    pub fn load_bytes(&self, bytes: &[u8], file_name: Option<&str>) -> Result<RawTable, CoreError> {
        self.import_service.read_bytes(bytes, file_name)
    }

    /// Read a holdings file from disk.
    pub fn load_path(&self, path: impl AsRef<Path>) -> Result<RawTable, CoreError> {
        self.import_service.read_path(path)
    }

    /// Parse the JSON rows a dashboard posts back for PDF export.
    pub fn load_json(&self, json: &str) -> Result<RawTable, CoreError> {
        Ok(serde_json::from_str(json)?)
    }

    // ── Analysis ────────────────────────────────────────────────────

    /// Derive holdings and the portfolio summary from a raw sheet.
    pub fn analyze(&self, table: &RawTable) -> Result<Analysis, CoreError> {
        let (holdings, report) = self.analytics_service.derive(table)?;
        let summary = self.analytics_service.summarize(&holdings);
        Ok(Analysis {
            holdings,
            summary,
            report,
        })
    }

    // ── Projections ─────────────────────────────────────────────────

    /// Render the interactive dashboard page.
    ///
    /// `report_action` is the URL the page's "Generate PDF Report" form
    /// posts to; `None` leaves the form out.
    pub fn dashboard_html(
        &self,
        analysis: &Analysis,
        options: &DashboardOptions,
        report_action: Option<&str>,
    ) -> Result<String, CoreError> {
        if options.include_ai_analysis {
            info!("AI analysis requested; no analysis backend is configured");
        }
        self.dashboard_service.render(analysis, options, report_action)
    }

    /// Lay out the PDF report without typesetting it.
    pub fn report_document(&self, analysis: &Analysis) -> ReportDocument {
        self.document_service.build(&analysis.summary, Local::now())
    }

    /// Generate the PDF report. The caller owns the returned artifact.
    pub fn generate_report(&self, analysis: &Analysis) -> Result<ReportArtifact, CoreError> {
        let document = self.report_document(analysis);
        let bytes = self.document_service.render(&document)?;
        let artifact = ReportArtifact::new(document.generated_at, bytes);
        info!(
            id = %artifact.id,
            file = %artifact.file_name,
            size = artifact.bytes.len(),
            "report generated"
        );
        Ok(artifact)
    }
}
