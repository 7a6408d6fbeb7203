use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    http::header,
    response::{Html, IntoResponse, Response},
    Json,
};
use portfolio_health_core::models::analytics::{Analysis, PortfolioSummary};
use portfolio_health_core::models::holding::Holding;
use portfolio_health_core::models::report::ReportArtifact;
use portfolio_health_core::models::risk::RiskAssessment;
use portfolio_health_core::models::settings::DashboardOptions;
use portfolio_health_core::models::table::RawTable;
use serde::Serialize;

use crate::{error::AppError, pages, AppState};

/// Where the dashboard's export form posts to.
const REPORT_ROUTE: &str = "/report";

/// Fields of the upload form. Unknown fields are ignored.
#[derive(Debug, Default)]
struct UploadForm {
    file: Option<UploadedFile>,
    /// JSON `RawTable` posted back by a rendered dashboard
    holdings: Option<String>,
    include_ai: Option<bool>,
    generate_charts: Option<bool>,
}

#[derive(Debug)]
struct UploadedFile {
    name: Option<String>,
    bytes: Vec<u8>,
}

impl UploadForm {
    async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = UploadForm::default();
        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or("").to_string();
            match name.as_str() {
                "file" => {
                    let file_name = field.file_name().map(str::to_string);
                    let bytes = field.bytes().await?;
                    // Browsers send an empty part when no file was picked.
                    if !bytes.is_empty() {
                        form.file = Some(UploadedFile {
                            name: file_name.filter(|n| !n.is_empty()),
                            bytes: bytes.to_vec(),
                        });
                    }
                }
                "holdings" => form.holdings = Some(field.text().await?),
                // A hidden "false" precedes each checkbox, so the last value wins.
                "include_ai" => form.include_ai = Some(parse_toggle(&field.text().await?)),
                "generate_charts" => form.generate_charts = Some(parse_toggle(&field.text().await?)),
                other => tracing::debug!(field = other, "ignoring unknown form field"),
            }
        }
        Ok(form)
    }

    fn options(&self, defaults: DashboardOptions) -> DashboardOptions {
        DashboardOptions {
            generate_charts: self.generate_charts.unwrap_or(defaults.generate_charts),
            include_ai_analysis: self.include_ai.unwrap_or(defaults.include_ai_analysis),
        }
    }
}

fn parse_toggle(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "on" | "true" | "1" | "yes"
    )
}

impl AppState {
    fn load(&self, form: &UploadForm) -> Result<RawTable, AppError> {
        if let Some(file) = &form.file {
            tracing::info!(file = ?file.name, size = file.bytes.len(), "processing upload");
            return Ok(self.health.load_bytes(&file.bytes, file.name.as_deref())?);
        }
        if let Some(json) = &form.holdings {
            return Ok(self.health.load_json(json)?);
        }
        Err(AppError::BadRequest(
            "Please upload a portfolio file".to_string(),
        ))
    }

    fn analyze(&self, form: &UploadForm) -> Result<Analysis, AppError> {
        let table = self.load(form)?;
        Ok(self.health.analyze(&table)?)
    }
}

/// # GET /
pub async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(pages::upload_page(state.health.settings()))
}

/// # POST /analyze
/// Renders the dashboard for an uploaded sheet.
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Html<String>, AppError> {
    let form = UploadForm::read(multipart).await?;
    let analysis = state.analyze(&form)?;
    let options = form.options(DashboardOptions::from(state.health.settings()));
    let html = state
        .health
        .dashboard_html(&analysis, &options, Some(REPORT_ROUTE))?;
    Ok(Html(html))
}

/// # POST /report
/// Accepts either a sheet or the holdings JSON a dashboard posts back and
/// answers with the PDF as an attachment.
pub async fn report(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let form = UploadForm::read(multipart).await?;
    let analysis = state.analyze(&form)?;
    let artifact = state.health.generate_report(&analysis)?;
    Ok(pdf_response(artifact))
}

fn pdf_response(artifact: ReportArtifact) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", artifact.file_name);
    (
        [
            (header::CONTENT_TYPE, ReportArtifact::MIME_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        artifact.bytes,
    )
        .into_response()
}

#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub holdings: Vec<Holding>,
    pub summary: PortfolioSummary,
    pub risk: RiskAssessment,
}

/// # POST /api/analysis
/// The analysis as JSON, for scripts and other front ends.
pub async fn api_analysis(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<AnalysisResponse>, AppError> {
    let form = UploadForm::read(multipart).await?;
    let analysis = state.analyze(&form)?;
    let risk = RiskAssessment::from_summary(&analysis.summary);
    Ok(Json(AnalysisResponse {
        holdings: analysis.holdings,
        summary: analysis.summary,
        risk,
    }))
}
