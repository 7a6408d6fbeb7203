use thiserror::Error;

/// Unified error type for the entire portfolio-health-core library.
/// Every public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Input / Import ──────────────────────────────────────────────
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    #[error("The uploaded sheet contains no header row")]
    EmptySheet,

    #[error("CSV error: {0}")]
    Csv(String),

    // ── Serialization ───────────────────────────────────────────────
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── Rendering ───────────────────────────────────────────────────
    #[error("Document rendering failed: {0}")]
    Document(String),

    // ── File I/O (native only) ──────────────────────────────────────
    #[error("File I/O error: {0}")]
    FileIO(String),
}

impl CoreError {
    /// True for errors caused by the uploaded file rather than by the system.
    /// Callers use this to decide between "fix your file" and a generic failure.
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            CoreError::MissingColumn(_)
                | CoreError::UnsupportedFormat(_)
                | CoreError::Spreadsheet(_)
                | CoreError::EmptySheet
                | CoreError::Csv(_)
                | CoreError::Deserialization(_)
        )
    }
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::FileIO(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<calamine::Error> for CoreError {
    fn from(e: calamine::Error) -> Self {
        CoreError::Spreadsheet(e.to_string())
    }
}

impl From<csv::Error> for CoreError {
    fn from(e: csv::Error) -> Self {
        CoreError::Csv(e.to_string())
    }
}
