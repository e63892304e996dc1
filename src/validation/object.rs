//! Attribute-by-attribute comparison of one requirement node.

use crate::core::diagnostics::{self, SharedDiagnostics};
use crate::core::error::{Diagnostic, DiagnosticKind, ValidationWarning};
use crate::core::model::CobieObject;
use crate::core::types::{
    names_equivalent, Attribute, AttributeValue, ValueComparison, VisualAttentionStyle,
    DEFAULT_DECIMAL_EPSILON,
};
use crate::validation::options::ValidationOptions;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// When attribute iteration stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationMode {
    /// Evaluate every attribute.
    #[default]
    Full,
    /// Stop at the first attribute that is not green; the rest stay `None`.
    StopOnFirstFail,
}

/// Outcome for one required attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeOutcome {
    /// Name of the required attribute.
    pub name: String,
    /// Comparison outcome.
    pub style: VisualAttentionStyle,
    /// Value demanded by the requirement (`Absent` accepts any value).
    pub required_value: AttributeValue,
    /// Value found on the submission, if it was looked up and found.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_value: Option<AttributeValue>,
}

impl AttributeOutcome {
    /// Value shown in reports: the submitted value when there is one,
    /// otherwise the required value.
    pub fn compared_value(&self) -> &AttributeValue {
        self.submitted_value.as_ref().unwrap_or(&self.required_value)
    }
}

/// Result of validating one requirement node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// The requirement node.
    pub requirement: CobieObject,
    /// The submission node it was compared with.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched: Option<CobieObject>,
    /// One outcome per required attribute, in declaration order.
    pub outcomes: Vec<AttributeOutcome>,
    /// Object-level style.
    pub style: VisualAttentionStyle,
    /// Recoverable issues met while validating.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<Diagnostic>,
}

impl MatchResult {
    /// Whether a submission node was found.
    pub fn is_matched(&self) -> bool {
        self.matched.is_some()
    }

    /// Outcome for the named attribute.
    pub fn outcome(&self, name: &str) -> Option<&AttributeOutcome> {
        self.outcomes.iter().find(|o| names_equivalent(&o.name, name))
    }

    /// Number of outcomes with the given style.
    pub fn count(&self, style: VisualAttentionStyle) -> usize {
        self.outcomes.iter().filter(|o| o.style == style).count()
    }

    /// Warnings derived from the attached notes.
    pub fn warnings(&self) -> impl Iterator<Item = ValidationWarning> + '_ {
        self.notes.iter().filter_map(Diagnostic::as_warning)
    }

    /// Whether any note of `kind` is attached.
    pub fn has_note(&self, kind: DiagnosticKind) -> bool {
        self.notes.iter().any(|n| n.kind == kind)
    }
}

/// Compares a requirement node with a submission node.
#[derive(Clone)]
pub struct ObjectValidator {
    epsilon: f64,
    aliases: Arc<IndexMap<String, Vec<String>>>,
    diagnostics: SharedDiagnostics,
}

impl fmt::Debug for ObjectValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectValidator")
            .field("epsilon", &self.epsilon)
            .field("aliases", &self.aliases)
            .field("diagnostics", &"<sink>")
            .finish()
    }
}

impl Default for ObjectValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectValidator {
    /// Create a validator with the default tolerance and no aliases.
    pub fn new() -> Self {
        Self {
            epsilon: DEFAULT_DECIMAL_EPSILON,
            aliases: Arc::new(IndexMap::new()),
            diagnostics: diagnostics::noop(),
        }
    }

    /// Create a validator configured from `options`.
    pub fn from_options(options: &ValidationOptions, diagnostics: SharedDiagnostics) -> Self {
        Self {
            epsilon: options.decimal_epsilon,
            aliases: Arc::new(options.attribute_aliases.clone()),
            diagnostics,
        }
    }

    /// Set the decimal tolerance.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Set the diagnostics sink.
    pub fn with_diagnostics(mut self, diagnostics: SharedDiagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Validate `requirement` against `submission`.
    ///
    /// Without a submission every required attribute is red, whatever the
    /// termination mode.
    pub fn validate(
        &self,
        requirement: &CobieObject,
        submission: Option<&CobieObject>,
        mode: TerminationMode,
    ) -> MatchResult {
        self.run(requirement, submission, mode, true)
    }

    /// Validate a root node such as the facility itself, which needs no
    /// categories.
    pub fn validate_root(
        &self,
        requirement: &CobieObject,
        submission: Option<&CobieObject>,
        mode: TerminationMode,
    ) -> MatchResult {
        self.run(requirement, submission, mode, false)
    }

    fn run(
        &self,
        requirement: &CobieObject,
        submission: Option<&CobieObject>,
        mode: TerminationMode,
        categorized: bool,
    ) -> MatchResult {
        let mut notes = identity_notes(requirement, categorized, false);

        let (outcomes, style) = match submission {
            None => {
                notes.push(Diagnostic::no_match(requirement.label()));
                let outcomes = requirement
                    .attributes
                    .iter()
                    .map(|attribute| AttributeOutcome {
                        name: attribute.name.clone(),
                        style: VisualAttentionStyle::Red,
                        required_value: attribute.value.clone(),
                        submitted_value: None,
                    })
                    .collect();
                (outcomes, VisualAttentionStyle::Red)
            }
            Some(submitted) => {
                notes.extend(identity_notes(submitted, categorized, true));
                let outcomes = self.compare_attributes(requirement, submitted, mode, &mut notes);
                let style = if outcomes.is_empty() {
                    VisualAttentionStyle::Green
                } else {
                    VisualAttentionStyle::roll_up(outcomes.iter().map(|o: &AttributeOutcome| o.style))
                };
                (outcomes, style)
            }
        };

        for note in &notes {
            self.diagnostics.report(note);
        }

        MatchResult {
            requirement: requirement.clone(),
            matched: submission.cloned(),
            outcomes,
            style,
            notes,
        }
    }

    fn compare_attributes(
        &self,
        requirement: &CobieObject,
        submitted: &CobieObject,
        mode: TerminationMode,
        notes: &mut Vec<Diagnostic>,
    ) -> Vec<AttributeOutcome> {
        let mut outcomes = Vec::with_capacity(requirement.attributes.len());
        let mut stopped = false;

        for required in &requirement.attributes {
            if stopped {
                outcomes.push(AttributeOutcome {
                    name: required.name.clone(),
                    style: VisualAttentionStyle::None,
                    required_value: required.value.clone(),
                    submitted_value: None,
                });
                continue;
            }

            let found = self.find_attribute(submitted, &required.name);
            if let Some((attribute, true)) = found {
                notes.push(Diagnostic::alias(requirement.label(), &required.name, &attribute.name));
            }

            let (style, submitted_value) = match found {
                Some((attribute, _)) if !attribute.value.is_absent() => {
                    let style = self.compare_value(requirement, required, &attribute.value, notes);
                    (style, Some(attribute.value.clone()))
                }
                _ => (VisualAttentionStyle::Red, None),
            };

            if mode == TerminationMode::StopOnFirstFail && !style.is_green() {
                stopped = true;
            }

            outcomes.push(AttributeOutcome {
                name: required.name.clone(),
                style,
                required_value: required.value.clone(),
                submitted_value,
            });
        }

        outcomes
    }

    fn compare_value(
        &self,
        requirement: &CobieObject,
        required: &Attribute,
        submitted: &AttributeValue,
        notes: &mut Vec<Diagnostic>,
    ) -> VisualAttentionStyle {
        if required.value.is_absent() {
            return VisualAttentionStyle::Green;
        }

        match required.value.compare(submitted, self.epsilon) {
            ValueComparison::Equal => VisualAttentionStyle::Green,
            ValueComparison::Different => VisualAttentionStyle::Amber,
            ValueComparison::KindMismatch { expected, got } => {
                notes.push(Diagnostic::type_mismatch(
                    requirement.label(),
                    &required.name,
                    expected,
                    got,
                ));
                VisualAttentionStyle::Amber
            }
        }
    }

    /// Find the submitted attribute for `name`; the flag tells whether it was
    /// found through an alias.
    fn find_attribute<'s>(&self, submitted: &'s CobieObject, name: &str) -> Option<(&'s Attribute, bool)> {
        if let Some(attribute) = submitted.attribute(name) {
            return Some((attribute, false));
        }

        self.aliases_of(name)
            .into_iter()
            .find_map(|alias| submitted.attribute(alias))
            .map(|attribute| (attribute, true))
    }

    fn aliases_of<'s>(&'s self, name: &str) -> Vec<&'s str> {
        let mut found = Vec::new();
        for (canonical, aliases) in self.aliases.iter() {
            let in_group = names_equivalent(canonical, name)
                || aliases.iter().any(|a| names_equivalent(a, name));
            if !in_group {
                continue;
            }
            for candidate in std::iter::once(canonical).chain(aliases.iter()) {
                if !names_equivalent(candidate, name) {
                    found.push(candidate.as_str());
                }
            }
        }
        found
    }
}

fn identity_notes(object: &CobieObject, categorized: bool, submitted: bool) -> Vec<Diagnostic> {
    let mut notes = Vec::new();
    if object.name.trim().is_empty() {
        notes.push(Diagnostic::malformed(object.label(), "Object has no name"));
    }
    if categorized && object.matching_categories().is_empty() {
        notes.push(Diagnostic::malformed(
            object.label(),
            format!("Object '{}' has no categories", object.label()),
        ));
    }
    if submitted {
        for note in &mut notes {
            note.submitted = true;
        }
    }
    notes
}
