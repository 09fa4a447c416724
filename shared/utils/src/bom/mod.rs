//! BOM (Bill of Materials) Import Module
//!
//! Decodes spreadsheet uploads and pasted clipboard text into grids,
//! classifies the grid into a Block → Section → Item tree, and reviews and
//! flattens the result.

pub mod classifier;
pub mod coerce;
pub mod extractor;
pub mod ids;
pub mod parser;
pub mod validator;

#[cfg(test)]
mod property_tests;

pub use classifier::{classify, classify_row, classify_rows, classify_with_report, ClassificationReport, RowKind};
pub use extractor::{BomLine, SelectionExtractor};
pub use ids::{IdGenerator, SequentialIds, UuidGenerator};
pub use parser::{parse_pasted_text, BomFormat, Grid, GridDecoder, Row};
pub use validator::{BomValidator, ValidationIssue, ValidationResult, ValidationSeverity, ValidationSummary};
