use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::chart::{PieChart, Rgb};

/// A generated PDF handed back to the caller.
///
/// Nothing keeps a copy: whoever requested the report owns the bytes until
/// they are written out or dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportArtifact {
    pub id: Uuid,
    /// `portfolio_report_YYYYMMDD_HHMMSS.pdf`
    pub file_name: String,
    pub generated_at: DateTime<Local>,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

impl ReportArtifact {
    pub const MIME_TYPE: &'static str = "application/pdf";

    pub fn new(generated_at: DateTime<Local>, bytes: Vec<u8>) -> Self {
        Self {
            id: Uuid::new_v4(),
            file_name: Self::file_name_for(generated_at),
            generated_at,
            bytes,
        }
    }

    #[must_use]
    pub fn file_name_for(generated_at: DateTime<Local>) -> String {
        format!("portfolio_report_{}.pdf", generated_at.format("%Y%m%d_%H%M%S"))
    }
}

/// Horizontal text placement inside a block or cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Align {
    Left,
    Center,
}

/// Styling for a document table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableStyle {
    pub header_background: Rgb,
    pub header_text: Rgb,
    pub header_bold: bool,
    /// Fill for body rows, `None` for white
    pub body_background: Option<Rgb>,
    pub font_size: f32,
    pub header_font_size: f32,
}

/// A grid of text cells. The first row is the header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableBlock {
    /// Column widths in points
    pub column_widths: Vec<f32>,
    pub rows: Vec<Vec<String>>,
    pub style: TableStyle,
}

impl TableBlock {
    #[must_use]
    pub fn header(&self) -> Option<&[String]> {
        self.rows.first().map(Vec::as_slice)
    }

    /// Rows after the header.
    #[must_use]
    pub fn body(&self) -> &[Vec<String>] {
        self.rows.get(1..).unwrap_or(&[])
    }

    #[must_use]
    pub fn width(&self) -> f32 {
        self.column_widths.iter().sum()
    }
}

/// One element of the paginated report, laid out top to bottom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Block {
    Title(String),
    Subtitle(String),
    Section(String),
    Table(TableBlock),
    /// Donut chart drawn into a box of the given size in points
    Chart {
        chart: PieChart,
        width: f32,
        height: f32,
    },
    Spacer(f32),
    Footer(String),
}

/// The report as a layout-independent list of blocks.
///
/// Building it is pure, so tests can check content without parsing PDF.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportDocument {
    pub title: String,
    pub generated_at: DateTime<Local>,
    pub blocks: Vec<Block>,
}

impl ReportDocument {
    /// All tables in document order.
    pub fn tables(&self) -> impl Iterator<Item = &TableBlock> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Table(t) => Some(t),
            _ => None,
        })
    }

    /// Section headings in document order.
    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Section(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// Charts in document order.
    pub fn charts(&self) -> impl Iterator<Item = &PieChart> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Chart { chart, .. } => Some(chart),
            _ => None,
        })
    }

    /// The table that directly follows the section heading `name`.
    #[must_use]
    pub fn table_after(&self, name: &str) -> Option<&TableBlock> {
        let start = self
            .blocks
            .iter()
            .position(|b| matches!(b, Block::Section(s) if s == name))?;
        self.blocks[start + 1..]
            .iter()
            .take_while(|b| !matches!(b, Block::Section(_)))
            .find_map(|b| match b {
                Block::Table(t) => Some(t),
                _ => None,
            })
    }
}
