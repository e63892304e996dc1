//! Facility-level validation.
//!
//! The [`FacilityValidator`] walks every requirement section of a facility
//! (asset types, zones, documents, contacts), validates each through the
//! [`TwoLevelValidator`] and assembles a [`ValidatedFacility`] whose shape
//! mirrors the requirement tree.

use crate::core::diagnostics::{self, SharedDiagnostics};
use crate::core::error::{Diagnostic, ValidationError, ValidationResult, ValidationWarning};
use crate::core::model::Facility;
use crate::core::serialization::JsonDocument;
use crate::core::types::VisualAttentionStyle;
use crate::validation::object::{MatchResult, ObjectValidator, TerminationMode};
use crate::validation::options::ValidationOptions;
use crate::validation::two_level::{TwoLevelResult, TwoLevelValidator};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::time::Instant;

/// Requirement section of a facility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Section {
    /// Asset types with their assets.
    AssetTypes,
    /// Zones with their spaces.
    Zones,
    /// Documents.
    Documents,
    /// Contacts.
    Contacts,
}

impl Section {
    /// All sections, in report order.
    pub const ALL: [Section; 4] = [
        Section::AssetTypes,
        Section::Zones,
        Section::Documents,
        Section::Contacts,
    ];

    /// Report title of the section.
    pub fn title(&self) -> &'static str {
        match self {
            Section::AssetTypes => "Asset types report",
            Section::Zones => "Zones report",
            Section::Documents => "Documents report",
            Section::Contacts => "Contacts report",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}

/// Required and submitted counts of one section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionCounts {
    /// Requirement parents in the section.
    pub required: usize,
    /// Requirement parents with a matched submission.
    pub submitted: usize,
    /// Required children across the section.
    pub required_children: usize,
    /// Matched children across the section.
    pub submitted_children: usize,
}

/// The annotated facility handed to reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatedFacility {
    /// Facility name (from the requirement).
    pub name: String,
    /// Project name, empty when the requirement has none.
    pub project_name: String,
    /// Site name, empty when the requirement has none.
    pub site_name: String,
    /// Classification used for grouping and report titles.
    pub classification_preference: String,
    /// Termination mode the run used.
    pub termination: TerminationMode,
    /// Facility-level attribute comparison.
    pub facility: MatchResult,
    /// Asset types and their assets.
    pub asset_types: Vec<TwoLevelResult>,
    /// Zones and their spaces.
    pub zones: Vec<TwoLevelResult>,
    /// Documents.
    pub documents: Vec<TwoLevelResult>,
    /// Contacts.
    pub contacts: Vec<TwoLevelResult>,
    /// Malformed-input warnings collected during the run.
    pub warnings: Vec<ValidationWarning>,
    /// Rolled-up style of the whole facility.
    pub style: VisualAttentionStyle,
}

impl JsonDocument for ValidatedFacility {}

impl ValidatedFacility {
    /// Results of one section.
    pub fn section(&self, section: Section) -> &[TwoLevelResult] {
        match section {
            Section::AssetTypes => &self.asset_types,
            Section::Zones => &self.zones,
            Section::Documents => &self.documents,
            Section::Contacts => &self.contacts,
        }
    }

    /// Every group result across all sections.
    pub fn groups(&self) -> impl Iterator<Item = &TwoLevelResult> {
        Section::ALL.into_iter().flat_map(move |s| self.section(s).iter())
    }

    /// Counts of one section.
    pub fn counts(&self, section: Section) -> SectionCounts {
        self.section(section)
            .iter()
            .fold(SectionCounts::default(), |mut counts, group| {
                counts.required += 1;
                if group.parent.is_matched() {
                    counts.submitted += 1;
                }
                counts.required_children += group.required_children_count();
                counts.submitted_children += group.submitted_children_count();
                counts
            })
    }

    /// Number of malformed-input warnings.
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// Whether every requirement was met.
    pub fn passed(&self) -> bool {
        self.style.is_green()
    }

    /// Get a human-readable summary.
    pub fn summary(&self) -> String {
        let groups = self.groups().count();
        let failed = self.groups().filter(|g| !g.style.is_green()).count();
        if failed == 0 && self.facility.style.is_green() {
            if self.warnings.is_empty() {
                format!("✓ All {} requirement group(s) satisfied", groups)
            } else {
                format!(
                    "✓ All {} requirement group(s) satisfied with {} warning(s)",
                    groups,
                    self.warnings.len()
                )
            }
        } else {
            format!(
                "✗ {} of {} requirement group(s) not satisfied ({} warning(s))",
                failed,
                groups,
                self.warnings.len()
            )
        }
    }
}

/// Validates a submission facility against a requirement facility.
pub struct FacilityValidator {
    options: ValidationOptions,
    diagnostics: SharedDiagnostics,
    pool: Option<rayon::ThreadPool>,
}

impl fmt::Debug for FacilityValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FacilityValidator")
            .field("options", &self.options)
            .field("diagnostics", &"<sink>")
            .field("pool", &self.pool.as_ref().map(|p| p.current_num_threads()))
            .finish()
    }
}

impl Default for FacilityValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl FacilityValidator {
    /// Create a validator with default options and no diagnostics output.
    pub fn new() -> Self {
        Self {
            options: ValidationOptions::default(),
            diagnostics: diagnostics::noop(),
            pool: None,
        }
    }

    /// Create a validator with checked options.
    pub fn with_options(options: ValidationOptions) -> ValidationResult<Self> {
        options.validate()?;

        let pool = if options.parallel && options.max_threads > 0 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(options.max_threads)
                .build()
                .map_err(|e| ValidationError::ThreadPool(e.to_string()))?;
            Some(pool)
        } else {
            None
        };

        Ok(Self {
            options,
            diagnostics: diagnostics::noop(),
            pool,
        })
    }

    /// Set the diagnostics sink.
    pub fn with_diagnostics(mut self, diagnostics: SharedDiagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// The options in use.
    pub fn options(&self) -> &ValidationOptions {
        &self.options
    }

    /// Validate `submission` against `requirement`.
    ///
    /// Inputs are never modified; running twice on the same inputs yields
    /// equal results.
    pub fn validate(&self, requirement: &Facility, submission: &Facility) -> ValidatedFacility {
        match &self.pool {
            Some(pool) => pool.install(|| self.run(requirement, submission)),
            None => self.run(requirement, submission),
        }
    }

    fn run(&self, requirement: &Facility, submission: &Facility) -> ValidatedFacility {
        let start = Instant::now();
        let options = &self.options;

        let object = ObjectValidator::from_options(options, self.diagnostics.clone());
        let groups = TwoLevelValidator::new(object.clone())
            .with_termination(options.termination)
            .with_strategies(options.parent_strategy, options.child_strategy)
            .with_parallel(options.parallel);

        let facility = object.validate_root(&requirement.object, Some(&submission.object), options.termination);

        let ((asset_types, zones), (documents, contacts)) = if options.parallel {
            rayon::join(
                || {
                    rayon::join(
                        || groups.validate_group(&requirement.asset_types, &submission.asset_types),
                        || groups.validate_group(&requirement.zones, &submission.zones),
                    )
                },
                || {
                    rayon::join(
                        || groups.validate_group(&requirement.documents, &submission.documents),
                        || groups.validate_group(&requirement.contacts, &submission.contacts),
                    )
                },
            )
        } else {
            (
                (
                    groups.validate_group(&requirement.asset_types, &submission.asset_types),
                    groups.validate_group(&requirement.zones, &submission.zones),
                ),
                (
                    groups.validate_group(&requirement.documents, &submission.documents),
                    groups.validate_group(&requirement.contacts, &submission.contacts),
                ),
            )
        };

        let mut validated = ValidatedFacility {
            name: requirement.object.name.clone(),
            project_name: requirement.project_name().to_string(),
            site_name: requirement.site_name().to_string(),
            classification_preference: options.classification_preference.clone(),
            termination: options.termination,
            facility,
            asset_types,
            zones,
            documents,
            contacts,
            warnings: Vec::new(),
            style: VisualAttentionStyle::None,
        };

        // A submitted node matched by several requirements is reported once.
        let mut seen = HashSet::new();
        validated.warnings = std::iter::once(&validated.facility)
            .chain(validated.groups().flat_map(|g| g.results()))
            .flat_map(|result| result.notes.iter())
            .filter(|note| !note.submitted || seen.insert((note.subject.clone(), note.message.clone())))
            .filter_map(Diagnostic::as_warning)
            .collect();
        validated.style = VisualAttentionStyle::roll_up(
            std::iter::once(validated.facility.style).chain(validated.groups().map(|g| g.style)),
        );

        log::debug!(
            "Validated '{}' in {} ms: {} group(s), {} warning(s), overall {}",
            validated.name,
            start.elapsed().as_millis(),
            validated.groups().count(),
            validated.warnings.len(),
            validated.style
        );

        validated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{AssetType, CobieObject, Document, Project, Space, Zone};
    use crate::core::types::Category;

    fn uniclass(code: &str) -> Category {
        Category::new("Uniclass2015", code)
    }

    fn requirement() -> Facility {
        let mut facility = Facility::new("Lakeside Restaurant");
        facility.project = Some(Project {
            name: "Lakeside".to_string(),
            description: None,
        });
        facility.asset_types.push(AssetType {
            object: CobieObject::new("Brick Wall")
                .with_category(uniclass("Ss_25_10"))
                .with_attribute("Fire Rating", "60 min"),
            assets: Vec::new(),
        });
        facility.zones.push(Zone {
            object: CobieObject::new("Zone A").with_category(uniclass("SL_20")),
            spaces: vec![Space {
                object: CobieObject::new("A001").with_category(uniclass("SL_20_15")),
            }],
        });
        facility.documents.push(Document {
            object: CobieObject::new("Fire Strategy").with_category(Category::new("Role", "Fire Engineer")),
        });
        facility
    }

    fn submission() -> Facility {
        let mut facility = Facility::new("Lakeside Restaurant (as built)");
        facility.asset_types.push(AssetType {
            object: CobieObject::new("External Wall Type 1")
                .with_category(uniclass("Ss_25_10"))
                .with_attribute("Fire Rating", "60 min"),
            assets: Vec::new(),
        });
        facility.zones.push(Zone {
            object: CobieObject::new("Zone A").with_category(uniclass("SL_20")),
            spaces: vec![Space {
                object: CobieObject::new("A001").with_category(uniclass("SL_20_15")),
            }],
        });
        facility.documents.push(Document {
            object: CobieObject::new("Fire Strategy rev C").with_category(Category::new("Role", "Fire Engineer")),
        });
        facility
    }

    #[test]
    fn test_all_sections_satisfied() {
        let result = FacilityValidator::new().validate(&requirement(), &submission());
        assert_eq!(result.project_name, "Lakeside");
        assert_eq!(result.site_name, "");
        assert_eq!(result.asset_types.len(), 1);
        assert_eq!(result.zones.len(), 1);
        assert_eq!(result.documents.len(), 1);
        assert!(result.contacts.is_empty());
        assert!(result.passed(), "{}", result.summary());
        assert!(result.summary().starts_with('✓'));
    }

    #[test]
    fn test_missing_section_in_submission() {
        let mut submission = submission();
        submission.zones.clear();

        let result = FacilityValidator::new().validate(&requirement(), &submission);
        assert_eq!(result.zones[0].style, VisualAttentionStyle::Red);
        assert_eq!(result.style, VisualAttentionStyle::Red);
        let counts = result.counts(Section::Zones);
        assert_eq!(counts.required, 1);
        assert_eq!(counts.submitted, 0);
        assert_eq!(counts.required_children, 1);
        assert_eq!(counts.submitted_children, 0);
    }

    #[test]
    fn test_empty_requirement_sections_skipped() {
        let requirement = Facility::new("Empty");
        let result = FacilityValidator::new().validate(&requirement, &submission());
        assert_eq!(result.groups().count(), 0);
        assert_eq!(result.project_name, "");
    }

    #[test]
    fn test_malformed_nodes_counted() {
        let mut requirement = requirement();
        requirement.asset_types.push(AssetType {
            object: CobieObject::new("").with_attribute("Width", 1),
            assets: Vec::new(),
        });

        let result = FacilityValidator::new().validate(&requirement, &submission());
        assert_eq!(result.asset_types.len(), 2);
        assert_eq!(result.asset_types[1].style, VisualAttentionStyle::Red);
        assert!(result.warning_count() >= 2);
    }

    #[test]
    fn test_clean_run_has_no_warnings() {
        let mut requirement = Facility::new("Lakeside");
        requirement.asset_types.push(AssetType {
            object: CobieObject::new("Brick Wall").with_category(uniclass("Ss_25_10")),
            assets: Vec::new(),
        });

        let result = FacilityValidator::new().validate(&requirement, &requirement.clone());
        assert_eq!(result.warning_count(), 0);
        assert_eq!(result.summary(), "✓ All 1 requirement group(s) satisfied");
    }

    #[test]
    fn test_shared_submission_warned_once() {
        let wall = |name: &str| AssetType {
            object: CobieObject::new(name).with_category(uniclass("Ss_25_10")),
            assets: Vec::new(),
        };
        let mut requirement = Facility::new("Lakeside");
        requirement.asset_types.push(wall("Brick Wall"));
        requirement.asset_types.push(wall("Block Wall"));

        let mut submission = Facility::new("Lakeside");
        submission.asset_types.push(wall(""));

        let result = FacilityValidator::new().validate(&requirement, &submission);
        assert!(result.asset_types.iter().all(|g| g.parent.is_matched()));
        assert_eq!(result.warning_count(), 1);
    }

    #[test]
    fn test_invalid_options_rejected() {
        let err = FacilityValidator::with_options(ValidationOptions::new().with_epsilon(-1.0)).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidOptions { .. }));
    }

    #[test]
    fn test_dedicated_thread_pool() {
        let validator = FacilityValidator::with_options(ValidationOptions::new().with_max_threads(2)).unwrap();
        let result = validator.validate(&requirement(), &submission());
        assert!(result.passed());
        assert_eq!(result, FacilityValidator::new().validate(&requirement(), &submission()));
    }

    #[test]
    fn test_classification_preference_threaded() {
        let validator =
            FacilityValidator::with_options(ValidationOptions::new().with_classification("NRM1")).unwrap();
        let result = validator.validate(&requirement(), &submission());
        assert_eq!(result.classification_preference, "NRM1");
    }
}
