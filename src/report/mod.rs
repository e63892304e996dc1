//! Report data derived from validation results.
//!
//! Produces plain tables (summary per classification code, documents per
//! responsible role, per-group detail) that a spreadsheet or text renderer
//! can lay out without re-running any matching.

pub mod summary;
pub mod table;

pub use summary::{
    detail_table, document_summary, facility_summary, grouping_summary, reportable_groups,
    DEFAULT_DOCUMENT_GROUPING,
};
pub use table::{ReportCell, ReportTable};
