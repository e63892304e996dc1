//! Two-level validation: a requirement parent together with its children.

use crate::core::model::{CobieEntity, CobieObject, RequirementParent};
use crate::core::types::{Category, VisualAttentionStyle};
use crate::matching::{CandidateMatcher, MatchStrategy};
use crate::validation::object::{MatchResult, ObjectValidator, TerminationMode};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// A requirement parent node and its children, ready for comparison.
#[derive(Debug)]
pub struct RequirementPointer<'a, P> {
    parent: &'a P,
    requirement_categories: Vec<Category>,
}

impl<'a, P: RequirementParent> RequirementPointer<'a, P> {
    /// Wrap a requirement parent.
    pub fn new(parent: &'a P) -> Self {
        let requirement_categories = parent
            .object()
            .matching_categories()
            .into_iter()
            .cloned()
            .collect();
        Self {
            parent,
            requirement_categories,
        }
    }

    /// Name of the requirement parent.
    pub fn name(&self) -> &str {
        &self.parent.object().name
    }

    /// External identifier of the requirement parent.
    pub fn external_id(&self) -> Option<&str> {
        self.parent.object().external_id.as_deref()
    }

    /// Categories of the parent, requirement markers excluded.
    pub fn requirement_categories(&self) -> &[Category] {
        &self.requirement_categories
    }

    /// The parent node.
    pub fn parent(&self) -> &'a P {
        self.parent
    }

    /// Required children.
    pub fn children(&self) -> &'a [P::Child] {
        self.parent.children()
    }
}

/// Result of validating one requirement parent and its children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TwoLevelResult {
    /// Name of the requirement parent.
    pub name: String,
    /// External identifier of the requirement parent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    /// Categories of the requirement parent, for grouping and hyperlinks.
    pub requirement_categories: Vec<Category>,
    /// Result for the parent itself.
    pub parent: MatchResult,
    /// Results for each required child, in requirement order.
    pub children: Vec<MatchResult>,
    /// Rolled-up style of the parent and all children.
    pub style: VisualAttentionStyle,
}

impl TwoLevelResult {
    /// Number of children with a matched submission node.
    pub fn submitted_children_count(&self) -> usize {
        self.children.iter().filter(|c| c.is_matched()).count()
    }

    /// Number of required children.
    pub fn required_children_count(&self) -> usize {
        self.children.len()
    }

    /// The submission parent matched to the requirement.
    pub fn matched_parent(&self) -> Option<&CobieObject> {
        self.parent.matched.as_ref()
    }

    /// First requirement category in `classification`.
    pub fn preferred_category(&self, classification: &str) -> Option<&Category> {
        self.requirement_categories
            .iter()
            .find(|c| c.is_in(classification))
    }

    /// All match results, parent first.
    pub fn results(&self) -> impl Iterator<Item = &MatchResult> {
        std::iter::once(&self.parent).chain(self.children.iter())
    }
}

/// Validates requirement parents together with their children.
///
/// Children are only ever searched among the children of the matched
/// submission parent.
#[derive(Debug, Clone)]
pub struct TwoLevelValidator {
    object: ObjectValidator,
    termination: TerminationMode,
    parent_strategy: MatchStrategy,
    child_strategy: MatchStrategy,
    parallel: bool,
}

impl Default for TwoLevelValidator {
    fn default() -> Self {
        Self::new(ObjectValidator::new())
    }
}

impl TwoLevelValidator {
    /// Create a validator around an object validator.
    pub fn new(object: ObjectValidator) -> Self {
        Self {
            object,
            termination: TerminationMode::Full,
            parent_strategy: MatchStrategy::Category,
            child_strategy: MatchStrategy::NameThenCategory,
            parallel: false,
        }
    }

    /// Set the termination mode.
    pub fn with_termination(mut self, termination: TerminationMode) -> Self {
        self.termination = termination;
        self
    }

    /// Set the parent and child candidate strategies.
    pub fn with_strategies(mut self, parent: MatchStrategy, child: MatchStrategy) -> Self {
        self.parent_strategy = parent;
        self.child_strategy = child;
        self
    }

    /// Enable/disable parallel validation of requirement parents.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Validate one requirement parent against a submission pool.
    pub fn validate<P: RequirementParent>(&self, pointer: &RequirementPointer<'_, P>, pool: &[P]) -> TwoLevelResult {
        let matcher = CandidateMatcher::new(pool, self.parent_strategy);
        self.validate_with(pointer, &matcher)
    }

    /// Validate every requirement parent of a group against one pool.
    ///
    /// The pool is indexed once; results follow requirement order.
    pub fn validate_group<P: RequirementParent>(&self, requirements: &[P], pool: &[P]) -> Vec<TwoLevelResult> {
        if requirements.is_empty() {
            return Vec::new();
        }

        let matcher = CandidateMatcher::new(pool, self.parent_strategy);
        if self.parallel {
            requirements
                .par_iter()
                .map(|parent| self.validate_with(&RequirementPointer::new(parent), &matcher))
                .collect()
        } else {
            requirements
                .iter()
                .map(|parent| self.validate_with(&RequirementPointer::new(parent), &matcher))
                .collect()
        }
    }

    /// Validate one requirement parent with a prepared parent matcher.
    pub fn validate_with<P: RequirementParent>(
        &self,
        pointer: &RequirementPointer<'_, P>,
        matcher: &CandidateMatcher<'_, P>,
    ) -> TwoLevelResult {
        let requirement = pointer.parent().object();
        let best = matcher.best(requirement);
        if let Some(candidate) = &best {
            log::trace!(
                "'{}' matched '{}' sharing {} categories",
                requirement.label(),
                candidate.node.object().label(),
                candidate.shared_category_count
            );
        }

        let parent = self.object.validate(
            requirement,
            best.map(|c| c.node.object()),
            self.termination,
        );

        let scope: &[P::Child] = best.map(|c| c.node.children()).unwrap_or(&[]);
        let child_matcher = CandidateMatcher::new(scope, self.child_strategy);

        // Submitted children named like a required sibling are kept for that
        // sibling and only reachable by name.
        let required_children = pointer.children();
        let claimed: Vec<usize> = required_children
            .iter()
            .flat_map(|child| child_matcher.index().lookup_name(&child.object().name).iter().copied())
            .collect();

        let children: Vec<MatchResult> = required_children
            .iter()
            .map(|child| {
                let child = child.object();
                let found = child_matcher
                    .best_excluding(child, &claimed)
                    .map(|c| c.node.object());
                self.object.validate(child, found, self.termination)
            })
            .collect();

        let style = VisualAttentionStyle::roll_up(
            std::iter::once(parent.style).chain(children.iter().map(|c| c.style)),
        );

        TwoLevelResult {
            name: pointer.name().to_string(),
            external_id: pointer.external_id().map(str::to_string),
            requirement_categories: pointer.requirement_categories().to_vec(),
            parent,
            children,
            style,
        }
    }
}
