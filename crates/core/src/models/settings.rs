use serde::{Deserialize, Serialize};

/// Report rendering settings, loaded from the application config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    /// Currency symbol used on the dashboard (e.g., "₹", "$").
    pub currency_symbol: String,

    /// Currency prefix used in the PDF. The built-in PDF fonts only cover
    /// Latin-1, so this is usually an ASCII spelling such as "Rs.".
    pub document_currency_symbol: String,

    /// Default for the dashboard's "Generate Charts" toggle.
    pub generate_charts: bool,

    /// Default for the "Include AI Analysis" toggle. Accepted and recorded,
    /// never used in any computation.
    pub include_ai_analysis: bool,

    /// Directory the CLI writes generated reports into.
    pub output_dir: String,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            currency_symbol: "₹".to_string(),
            document_currency_symbol: "Rs.".to_string(),
            generate_charts: true,
            include_ai_analysis: true,
            output_dir: ".".to_string(),
        }
    }
}

/// Per-request toggles for the interactive dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardOptions {
    pub generate_charts: bool,
    pub include_ai_analysis: bool,
}

impl From<&ReportSettings> for DashboardOptions {
    fn from(settings: &ReportSettings) -> Self {
        Self {
            generate_charts: settings.generate_charts,
            include_ai_analysis: settings.include_ai_analysis,
        }
    }
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self::from(&ReportSettings::default())
    }
}
