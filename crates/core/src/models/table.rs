use serde::{Deserialize, Serialize};

use super::holding::Holding;

// ── Column labels ───────────────────────────────────────────────────

pub const COL_NAME: &str = "Stock Name";
pub const COL_QUANTITY: &str = "Quantity";
pub const COL_BUY_PRICE: &str = "Buy Price";
pub const COL_CURRENT_PRICE: &str = "Current Price";
pub const COL_SECTOR: &str = "Sector";
pub const COL_MARKET_CAP: &str = "Market Cap";

/// Columns that must be present in every uploaded sheet, in the order
/// they are checked.
pub const REQUIRED_COLUMNS: [&str; 4] = [COL_NAME, COL_QUANTITY, COL_BUY_PRICE, COL_CURRENT_PRICE];

/// A single spreadsheet cell as read from the uploaded file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Empty,
    Number(f64),
    Text(String),
    Bool(bool),
}

impl CellValue {
    /// True for an empty cell or a cell holding only whitespace.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Numeric view of the cell.
    ///
    /// Returns `None` when the cell cannot be read as a finite number;
    /// the caller decides what to substitute.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        let value = match self {
            CellValue::Number(n) => *n,
            CellValue::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            CellValue::Text(s) => s.trim().parse::<f64>().ok()?,
            CellValue::Empty => return None,
        };
        value.is_finite().then_some(value)
    }

    /// Text view of the cell, trimmed. Blank cells yield `None`.
    #[must_use]
    pub fn as_label(&self) -> Option<String> {
        match self {
            CellValue::Empty => None,
            CellValue::Text(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            CellValue::Number(n) => Some(n.to_string()),
            CellValue::Bool(b) => Some(b.to_string()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

static EMPTY_CELL: CellValue = CellValue::Empty;

/// The uploaded sheet before any derivation: a header row plus data rows.
///
/// Rows may be shorter than the header; missing trailing cells read as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self { headers, rows }
    }

    /// Position of the first header exactly equal to `name`.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cell at `(row, col)`, or `Empty` when the row is short.
    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CELL)
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Rebuild a canonical six-column table from already derived holdings.
    ///
    /// Used when a rendered dashboard posts its data back for PDF export,
    /// so the report is derived from exactly what the user saw.
    #[must_use]
    pub fn from_holdings(holdings: &[Holding]) -> Self {
        let headers = [
            COL_NAME,
            COL_QUANTITY,
            COL_BUY_PRICE,
            COL_CURRENT_PRICE,
            COL_SECTOR,
            COL_MARKET_CAP,
        ]
        .iter()
        .map(|h| h.to_string())
        .collect();

        let rows = holdings
            .iter()
            .map(|h| {
                vec![
                    CellValue::Text(h.name.clone()),
                    CellValue::Number(h.quantity),
                    CellValue::Number(h.buy_price),
                    CellValue::Number(h.current_price),
                    CellValue::Text(h.sector.clone()),
                    CellValue::Text(h.market_cap.clone()),
                ]
            })
            .collect();

        Self { headers, rows }
    }
}
