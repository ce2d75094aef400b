//! Error types for loading and querying the agreements sheet.

use thiserror::Error;

/// Errors surfaced by the data core and the sheet sources.
///
/// Nothing in the core logs or retries: every failure reaches the caller
/// as one of these variants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum SheetError {
    /// The remote (or local) source could not deliver rows.
    #[error("data source unavailable: {0}")]
    SourceUnavailable(String),

    /// Two header cells trim to the same column name.
    #[error("duplicate column '{0}' in sheet header")]
    DuplicateColumn(String),

    /// A column name that is not part of the dataset schema.
    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    /// No row carries the requested key.
    #[error("no row where '{column}' is '{value}'")]
    NotFound {
        /// Key column that was searched.
        column: String,
        /// Value that was looked up.
        value: String,
    },
}

impl SheetError {
    /// Returns a user-friendly error message suitable for display in the UI.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::SourceUnavailable(_) => {
                "Could not read the spreadsheet. Check your connection and credentials."
            }
            Self::DuplicateColumn(_) => "The spreadsheet header repeats a column name.",
            Self::UnknownColumn(_) => "The spreadsheet is missing a column the dashboard needs.",
            Self::NotFound { .. } => "The selected entity is no longer in the spreadsheet.",
        }
    }

    /// Whether the caller can reasonably try again (reload or re-select).
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::SourceUnavailable(_) | Self::NotFound { .. })
    }
}

/// Result alias for sheet operations.
pub type Result<T> = std::result::Result<T, SheetError>;
