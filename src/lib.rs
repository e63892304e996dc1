//! # COBie Validation - Requirement checking for facility handover data
//!
//! Compares a *submission* facility (the COBie data a contractor delivers)
//! against a *requirement* facility (the data the client asked for) and
//! annotates every requirement with a traffic-light attention style.
//!
//! ## Features
//!
//! - **Category matching**: submission nodes are found by shared classification codes
//! - **Two-level validation**: asset types with their assets, zones with their spaces
//! - **Typed comparison**: strings, integers, decimals (with tolerance), booleans and dates
//! - **Parallel execution**: requirement sections and groups are validated with rayon
//! - **Reports**: summary tables per classification code and per responsible role
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cobie_validation::prelude::*;
//!
//! let requirement = Facility::read_json_file("requirements.json")?;
//! let submission = Facility::read_json_file("submission.json")?;
//!
//! let options = ValidationOptions::new()
//!     .with_termination(TerminationMode::StopOnFirstFail)
//!     .with_classification("Uniclass2015");
//! let validator = FacilityValidator::with_options(options)?;
//!
//! let validated = validator.validate(&requirement, &submission);
//! println!("{}", validated.summary());
//!
//! for table in facility_summary(&validated) {
//!     println!("{}", table.render_text());
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`core`]: values, categories, the facility model, errors and diagnostics
//! - [`matching`]: category index and candidate ranking
//! - [`validation`]: object, two-level and facility validators
//! - [`report`]: summary and detail tables built from validation results

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod core;
pub mod matching;
pub mod report;
pub mod validation;

/// Prelude module for convenient imports.
///
/// Import everything commonly needed with:
/// ```rust,ignore
/// use cobie_validation::prelude::*;
/// ```
pub mod prelude {
    // Values and categories
    pub use crate::core::types::{
        Attribute, AttributeValue, Category, ValueKind, VisualAttentionStyle,
    };

    // Facility model
    pub use crate::core::model::{
        Asset, AssetType, CobieEntity, CobieObject, Contact, Document, Facility, Project,
        RequirementParent, Site, Space, Zone,
    };

    // Errors and diagnostics
    pub use crate::core::error::{
        CobieError, CobieResult, Diagnostic, DiagnosticKind, ValidationError, ValidationWarning,
    };
    pub use crate::core::diagnostics::{DiagnosticsSink, LogDiagnostics, SharedDiagnostics};
    pub use crate::core::serialization::JsonDocument;

    // Matching
    pub use crate::matching::{CandidateMatcher, MatchStrategy};

    // Validation
    pub use crate::validation::{
        AttributeOutcome, FacilityValidator, MatchResult, ObjectValidator, RequirementPointer,
        Section, TerminationMode, TwoLevelResult, TwoLevelValidator, ValidatedFacility,
        ValidationOptions,
    };

    // Reports
    pub use crate::report::{facility_summary, ReportCell, ReportTable};
}

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
