use serde::{Deserialize, Serialize};

use super::analytics::PortfolioSummary;

/// Concentration above this is High.
pub const CONCENTRATION_HIGH_PCT: f64 = 50.0;
/// Concentration above this (and not High) is Moderate.
pub const CONCENTRATION_MODERATE_PCT: f64 = 40.0;
/// Largest-sector share above this is High.
pub const SECTOR_HIGH_PCT: f64 = 40.0;
/// Largest-sector share above this (and not High) is Moderate.
pub const SECTOR_MODERATE_PCT: f64 = 30.0;

/// Three-step risk grade printed in the report's risk table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    /// Grade a top-5 concentration percentage. Thresholds are exclusive.
    #[must_use]
    pub fn from_concentration(pct: f64) -> Self {
        Self::grade(pct, CONCENTRATION_HIGH_PCT, CONCENTRATION_MODERATE_PCT)
    }

    /// Grade the largest sector's share of the portfolio. Thresholds are exclusive.
    #[must_use]
    pub fn from_sector_share(pct: f64) -> Self {
        Self::grade(pct, SECTOR_HIGH_PCT, SECTOR_MODERATE_PCT)
    }

    fn grade(pct: f64, high: f64, moderate: f64) -> Self {
        if pct > high {
            RiskLevel::High
        } else if pct > moderate {
            RiskLevel::Moderate
        } else {
            RiskLevel::Low
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "Low"),
            RiskLevel::Moderate => write!(f, "Moderate"),
            RiskLevel::High => write!(f, "High"),
        }
    }
}

/// The two concentration heuristics of a portfolio, graded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub concentration_pct: f64,
    pub concentration_level: RiskLevel,
    pub top_sector: Option<String>,
    pub top_sector_pct: f64,
    pub sector_level: RiskLevel,
}

impl RiskAssessment {
    #[must_use]
    pub fn from_summary(summary: &PortfolioSummary) -> Self {
        Self {
            concentration_pct: summary.concentration_risk,
            concentration_level: RiskLevel::from_concentration(summary.concentration_risk),
            top_sector: summary.top_sector.clone(),
            top_sector_pct: summary.top_sector_pct,
            sector_level: RiskLevel::from_sector_share(summary.top_sector_pct),
        }
    }
}
