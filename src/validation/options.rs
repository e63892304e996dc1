//! Validation options.

use crate::core::error::{CobieResult, ValidationError, ValidationResult};
use crate::core::types::DEFAULT_DECIMAL_EPSILON;
use crate::matching::MatchStrategy;
use crate::validation::object::TerminationMode;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Classification preferred for grouping and report titles by default.
pub const DEFAULT_CLASSIFICATION: &str = "Uniclass2015";

/// Options controlling one validation run.
///
/// Can be built in code with the `with_*` methods or loaded from TOML:
///
/// ```toml
/// termination = "stop_on_first_fail"
/// classification_preference = "Uniclass2015"
/// decimal_epsilon = 1e-6
/// child_strategy = "name_then_category"
///
/// [attribute_aliases]
/// "Fire Rating" = ["FireRating"]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationOptions {
    /// Whether attribute comparison stops at the first failure.
    pub termination: TerminationMode,
    /// Classification used for grouping and report titles.
    pub classification_preference: String,
    /// Tolerance for decimal comparison.
    pub decimal_epsilon: f64,
    /// Candidate strategy for requirement parents.
    pub parent_strategy: MatchStrategy,
    /// Candidate strategy for children within a matched parent.
    pub child_strategy: MatchStrategy,
    /// Groups of interchangeable attribute names, keyed by canonical name.
    pub attribute_aliases: IndexMap<String, Vec<String>>,
    /// Whether independent requirement nodes are validated in parallel.
    pub parallel: bool,
    /// Maximum number of worker threads (0 = rayon's global pool).
    pub max_threads: usize,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            termination: TerminationMode::Full,
            classification_preference: DEFAULT_CLASSIFICATION.to_string(),
            decimal_epsilon: DEFAULT_DECIMAL_EPSILON,
            parent_strategy: MatchStrategy::Category,
            child_strategy: MatchStrategy::NameThenCategory,
            attribute_aliases: IndexMap::new(),
            parallel: true,
            max_threads: 0,
        }
    }
}

impl ValidationOptions {
    /// Create the default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the termination mode.
    pub fn with_termination(mut self, termination: TerminationMode) -> Self {
        self.termination = termination;
        self
    }

    /// Set the preferred classification.
    pub fn with_classification(mut self, classification: impl Into<String>) -> Self {
        self.classification_preference = classification.into();
        self
    }

    /// Set the decimal tolerance.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.decimal_epsilon = epsilon;
        self
    }

    /// Set the parent candidate strategy.
    pub fn with_parent_strategy(mut self, strategy: MatchStrategy) -> Self {
        self.parent_strategy = strategy;
        self
    }

    /// Set the child candidate strategy.
    pub fn with_child_strategy(mut self, strategy: MatchStrategy) -> Self {
        self.child_strategy = strategy;
        self
    }

    /// Declare `aliases` as interchangeable with `name`.
    pub fn with_alias<I, S>(mut self, name: impl Into<String>, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attribute_aliases
            .entry(name.into())
            .or_default()
            .extend(aliases.into_iter().map(Into::into));
        self
    }

    /// Enable/disable parallel validation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set maximum threads.
    pub fn with_max_threads(mut self, max: usize) -> Self {
        self.max_threads = max;
        self
    }

    /// Check the options for contract violations.
    pub fn validate(&self) -> ValidationResult<()> {
        if !self.decimal_epsilon.is_finite() || self.decimal_epsilon < 0.0 {
            return Err(ValidationError::invalid_option(
                "decimal_epsilon",
                format!("must be a finite, non-negative number, got {}", self.decimal_epsilon),
            ));
        }

        if self.classification_preference.trim().is_empty() {
            return Err(ValidationError::invalid_option(
                "classification_preference",
                "must not be empty",
            ));
        }

        for (name, aliases) in &self.attribute_aliases {
            if name.trim().is_empty() || aliases.iter().any(|a| a.trim().is_empty()) {
                return Err(ValidationError::invalid_option(
                    "attribute_aliases",
                    format!("alias group '{}' contains an empty name", name),
                ));
            }
        }

        Ok(())
    }

    /// Parse and check options from a TOML string.
    pub fn from_toml_str(content: &str) -> CobieResult<Self> {
        let options: Self = toml::from_str(content)?;
        options.validate()?;
        Ok(options)
    }

    /// Parse and check options from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> CobieResult<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::CobieError;

    #[test]
    fn test_defaults_are_valid() {
        let options = ValidationOptions::default();
        assert!(options.validate().is_ok());
        assert_eq!(options.termination, TerminationMode::Full);
        assert_eq!(options.classification_preference, "Uniclass2015");
    }

    #[test]
    fn test_rejects_bad_epsilon() {
        assert!(ValidationOptions::new().with_epsilon(-1.0).validate().is_err());
        assert!(ValidationOptions::new().with_epsilon(f64::NAN).validate().is_err());
    }

    #[test]
    fn test_rejects_empty_classification() {
        let err = ValidationOptions::new().with_classification(" ").validate().unwrap_err();
        assert!(matches!(err, ValidationError::InvalidOptions { ref option, .. } if option == "classification_preference"));
    }

    #[test]
    fn test_from_toml() {
        let options = ValidationOptions::from_toml_str(
            r#"
            termination = "stop_on_first_fail"
            classification_preference = "NRM1"
            parent_strategy = "category_or_name"
            parallel = false

            [attribute_aliases]
            "Fire Rating" = ["FireRating", "Fire Resistance"]
            "#,
        )
        .unwrap();

        assert_eq!(options.termination, TerminationMode::StopOnFirstFail);
        assert_eq!(options.classification_preference, "NRM1");
        assert_eq!(options.parent_strategy, MatchStrategy::CategoryOrName);
        assert_eq!(options.child_strategy, MatchStrategy::NameThenCategory);
        assert!(!options.parallel);
        assert_eq!(options.attribute_aliases["Fire Rating"].len(), 2);
    }

    #[test]
    fn test_from_toml_checks_values() {
        let err = ValidationOptions::from_toml_str("decimal_epsilon = -0.5").unwrap_err();
        assert!(matches!(err, CobieError::Validation(_)));

        let err = ValidationOptions::from_toml_str("termination = 3").unwrap_err();
        assert!(matches!(err, CobieError::Config(_)));
    }

    #[test]
    fn test_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("validation.toml");
        fs::write(&path, "max_threads = 2\n").unwrap();
        let options = ValidationOptions::from_toml_file(&path).unwrap();
        assert_eq!(options.max_threads, 2);
    }

    #[test]
    fn test_with_alias_accumulates() {
        let options = ValidationOptions::new()
            .with_alias("Fire Rating", ["FireRating"])
            .with_alias("Fire Rating", vec!["Fire Resistance".to_string()]);
        assert_eq!(options.attribute_aliases["Fire Rating"], vec!["FireRating", "Fire Resistance"]);
    }
}
