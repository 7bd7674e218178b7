//! # Error Types
//!
//! This module defines the error type for the chart engine.
//!
//! Most of the engine never fails: chart text is user-authored and often
//! irregular, so malformed chords, bass notes and section labels fall back
//! to verbatim passthrough or a generic default. The variants here cover the
//! operations whose failures are shown to the user.
//!
//! ## Error Types
//! - `ImportUnreadable` - The PDF could not be read (corrupt, encrypted, image-only)
//! - `NoChartDetected` - Text was extracted but no chart could be synthesized from it
//! - `ImportInProgress` - An import was started while another one is in flight
//! - `Validation` - A setlist is missing its name or its songs
//! - `Config` - Invalid YAML in view options or chart frontmatter
//! - `Capture` - The external raster capture failed during PDF export
//! - `Storage` - The injected chart store reported a failure
//!
//! ## Usage
//! ```rust
//! use chartbook::{import_pages, ChartError};
//!
//! match import_pages(&[]) {
//!     Ok(body) => println!("{}", body),
//!     Err(ChartError::NoChartDetected) => eprintln!("nothing to import"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChartError {
    /// The PDF bytes could not be turned into text fragments.
    ///
    /// # Example
    /// ```
    /// # use chartbook::ChartError;
    /// let err = ChartError::ImportUnreadable("bad xref table".to_string());
    /// assert_eq!(
    ///     err.to_string(),
    ///     "Could not read file: possibly corrupt or image-only (bad xref table)"
    /// );
    /// ```
    #[error("Could not read file: possibly corrupt or image-only ({0})")]
    ImportUnreadable(String),

    /// The extracted text produced an empty chart body.
    #[error("No chord chart could be detected in the file")]
    NoChartDetected,

    /// Another import has not finished yet.
    #[error("An import is already in progress")]
    ImportInProgress,

    /// Required setlist fields are missing.
    ///
    /// # Example
    /// ```
    /// # use chartbook::ChartError;
    /// let err = ChartError::Validation("a setlist needs a name".to_string());
    /// assert_eq!(err.to_string(), "Invalid setlist: a setlist needs a name");
    /// ```
    #[error("Invalid setlist: {0}")]
    Validation(String),

    /// Invalid YAML in view options or chart frontmatter.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The rendered region could not be captured as an image.
    #[error("Could not capture the chart for export: {0}")]
    Capture(String),

    /// The chart store could not load or save records.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl ChartError {
    /// Short machine-readable name of the variant, used by the browser bindings.
    pub fn kind(&self) -> &'static str {
        match self {
            ChartError::ImportUnreadable(_) => "import-unreadable",
            ChartError::NoChartDetected => "no-chart-detected",
            ChartError::ImportInProgress => "import-in-progress",
            ChartError::Validation(_) => "validation",
            ChartError::Config(_) => "config",
            ChartError::Capture(_) => "capture",
            ChartError::Storage(_) => "storage",
        }
    }
}
