//! Core types for the validation engine.
//!
//! This module contains the foundational types shared by matching,
//! validation and reporting:
//! - Attribute values, categories and attention styles
//! - The COBie facility model
//! - Error and diagnostic types
//! - Diagnostics sinks
//! - JSON serialization

pub mod types;
pub mod model;
pub mod error;
pub mod diagnostics;
pub mod serialization;

// Re-export commonly used types
pub use types::{Attribute, AttributeValue, Category, CategoryKey, ValueKind, VisualAttentionStyle};
pub use model::{
    Asset, AssetType, CobieEntity, CobieObject, Contact, ContactKey, Document, Facility, Project,
    RequirementParent, Site, Space, Zone,
};
pub use error::{CobieError, Diagnostic, DiagnosticKind, ValidationError, ValidationWarning};
pub use diagnostics::{DiagnosticsSink, LogDiagnostics, NoopDiagnostics, SharedDiagnostics};
pub use serialization::JsonDocument;
