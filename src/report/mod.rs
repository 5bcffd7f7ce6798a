//! Output rows and run summaries.
//!
//! - [`ReportBuilder`]: sample sheet rows (`sample, runtype, r1, r2, extra`)
//!   and isolate rows (`isolate, contig_count`)
//! - [`ReadsSummary`], [`IsolateSummary`]: totals for display
//!
//! Rows follow group discovery order, so the same directory listing always
//! produces the same sheet.
//!
//! [`ReportBuilder`]: rows::ReportBuilder
//! [`ReadsSummary`]: summary::ReadsSummary
//! [`IsolateSummary`]: summary::IsolateSummary

pub mod rows;
pub mod summary;
