use serde::{Deserialize, Serialize};

/// Label used when a holding has no sector.
pub const DEFAULT_SECTOR: &str = "Uncategorized";

/// Label used when a holding has no market-cap classification.
pub const DEFAULT_MARKET_CAP: &str = "Not Specified";

/// One portfolio line item with its derived metrics.
///
/// Built once per upload by `AnalyticsService::derive` and never mutated
/// afterwards. Names are not unique: two rows for the same security stay
/// two holdings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    /// Security name as written in the sheet
    pub name: String,

    /// Units held
    pub quantity: f64,

    /// Per-unit cost basis
    pub buy_price: f64,

    /// Per-unit market price
    pub current_price: f64,

    /// Industry sector, or `Uncategorized`
    pub sector: String,

    /// Market-cap tier, or `Not Specified`
    pub market_cap: String,

    /// quantity × buy_price
    pub investment: f64,

    /// quantity × current_price
    pub current_value: f64,

    /// current_value − investment
    pub gain_loss: f64,

    /// gain_loss / investment × 100, with a zero investment divided by 1
    pub gain_loss_pct: f64,

    /// Share of total portfolio value, 0 when the portfolio is worth nothing
    pub weight_pct: f64,
}

impl Holding {
    /// Build a holding from its input fields, computing everything except
    /// `weight_pct`, which needs the portfolio total.
    pub fn new(
        name: impl Into<String>,
        quantity: f64,
        buy_price: f64,
        current_price: f64,
        sector: impl Into<String>,
        market_cap: impl Into<String>,
    ) -> Self {
        let investment = quantity * buy_price;
        let current_value = quantity * current_price;
        let gain_loss = current_value - investment;
        // A zero investment divides by 1, so the "percentage" is gain × 100.
        let divisor = if investment == 0.0 { 1.0 } else { investment };
        let gain_loss_pct = gain_loss / divisor * 100.0;

        Self {
            name: name.into(),
            quantity,
            buy_price,
            current_price,
            sector: sector.into(),
            market_cap: market_cap.into(),
            investment,
            current_value,
            gain_loss,
            gain_loss_pct,
            weight_pct: 0.0,
        }
    }

    /// True when the holding is at or above its cost basis.
    #[must_use]
    pub fn is_gain(&self) -> bool {
        self.gain_loss >= 0.0
    }
}
