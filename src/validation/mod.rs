//! Validation of submissions against requirements.
//!
//! Validation runs bottom-up: the [`ObjectValidator`] compares one node's
//! attributes, the [`TwoLevelValidator`] handles a parent with its children,
//! and the [`FacilityValidator`] assembles the whole facility.

pub mod object;
pub mod two_level;
pub mod facility;
pub mod options;

pub use object::{AttributeOutcome, MatchResult, ObjectValidator, TerminationMode};
pub use two_level::{RequirementPointer, TwoLevelResult, TwoLevelValidator};
pub use facility::{FacilityValidator, Section, SectionCounts, ValidatedFacility};
pub use options::ValidationOptions;
