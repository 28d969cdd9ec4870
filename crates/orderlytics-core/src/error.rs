use thiserror::Error;

/// Failures the analytics layer reports to its callers.
///
/// These travel inside `anyhow::Error` through the backend trait; the HTTP
/// layer downcasts to pick a status code. Everything else stays an opaque
/// internal error.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// A required column was absent from an input CSV. Raised while reading
    /// the header row, before any data row is parsed.
    #[error("required column '{column}' missing from {dataset} input")]
    MissingColumn { dataset: String, column: String },

    /// The filtered table has zero rows. Every view reports this explicitly
    /// instead of emitting empty series or NaN metrics.
    #[error("no data in range")]
    EmptyRange,

    /// A non-empty timestamp cell did not parse. Raised at load time so
    /// aggregation never encounters a string where a temporal value is
    /// expected.
    #[error("unparseable timestamp in column '{column}' at line {line}: '{value}'")]
    UnparsedTemporal {
        column: String,
        value: String,
        line: u64,
    },
}
