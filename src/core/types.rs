//! Core value types compared by the validation engine.
//!
//! Attribute values are a closed set of tagged variants. Comparison is done
//! with exhaustive pattern matching: values of different tags are never equal,
//! decimals compare within a tolerance and strings ignore surrounding
//! whitespace.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default tolerance used when comparing decimal values.
pub const DEFAULT_DECIMAL_EPSILON: f64 = 1e-7;

/// Classification used by planning-schema exports to flag required nodes.
pub const MARKER_CLASSIFICATION: &str = "DPoW";

/// A typed attribute value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(tag = "type", content = "data")]
pub enum AttributeValue {
    /// UTF-8 string
    String(String),
    /// 64-bit signed integer
    Integer(i64),
    /// 64-bit floating point number
    Decimal(f64),
    /// Boolean value
    Boolean(bool),
    /// Point in time (UTC)
    DateTime(DateTime<Utc>),
    /// No value supplied
    #[default]
    Absent,
}

/// Tag of an [`AttributeValue`], without the payload.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    String,
    Integer,
    Decimal,
    Boolean,
    DateTime,
    Absent,
}

/// Outcome of comparing two attribute values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueComparison {
    /// Same tag, equal payload.
    Equal,
    /// Same tag, different payload.
    Different,
    /// Different tags; never equal.
    KindMismatch {
        /// Tag of the left-hand value.
        expected: ValueKind,
        /// Tag of the right-hand value.
        got: ValueKind,
    },
}

impl ValueComparison {
    /// Whether the compared values are considered equal.
    pub fn is_equal(&self) -> bool {
        matches!(self, ValueComparison::Equal)
    }
}

// ============================================================================
// AttributeValue Implementation
// ============================================================================

impl AttributeValue {
    /// Get the tag of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            AttributeValue::String(_) => ValueKind::String,
            AttributeValue::Integer(_) => ValueKind::Integer,
            AttributeValue::Decimal(_) => ValueKind::Decimal,
            AttributeValue::Boolean(_) => ValueKind::Boolean,
            AttributeValue::DateTime(_) => ValueKind::DateTime,
            AttributeValue::Absent => ValueKind::Absent,
        }
    }

    /// Check if this value is absent.
    pub fn is_absent(&self) -> bool {
        matches!(self, AttributeValue::Absent)
    }

    /// Try to get this value as a string reference.
    pub fn as_str(&self) -> Option<&str> {
        if let AttributeValue::String(s) = self {
            Some(s)
        } else {
            None
        }
    }

    /// Try to get this value as an integer.
    pub fn as_integer(&self) -> Option<i64> {
        if let AttributeValue::Integer(i) = self {
            Some(*i)
        } else {
            None
        }
    }

    /// Try to get this value as a decimal.
    pub fn as_decimal(&self) -> Option<f64> {
        if let AttributeValue::Decimal(d) = self {
            Some(*d)
        } else {
            None
        }
    }

    /// Try to get this value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        if let AttributeValue::Boolean(b) = self {
            Some(*b)
        } else {
            None
        }
    }

    /// Compare two values.
    ///
    /// Values of different tags are reported as [`ValueComparison::KindMismatch`].
    /// Decimals are equal when they differ by at most `epsilon`; strings are
    /// compared after trimming surrounding whitespace.
    pub fn compare(&self, other: &AttributeValue, epsilon: f64) -> ValueComparison {
        let equal = match (self, other) {
            (AttributeValue::String(a), AttributeValue::String(b)) => a.trim() == b.trim(),
            (AttributeValue::Integer(a), AttributeValue::Integer(b)) => a == b,
            (AttributeValue::Decimal(a), AttributeValue::Decimal(b)) => (a - b).abs() <= epsilon,
            (AttributeValue::Boolean(a), AttributeValue::Boolean(b)) => a == b,
            (AttributeValue::DateTime(a), AttributeValue::DateTime(b)) => a == b,
            (AttributeValue::Absent, AttributeValue::Absent) => true,
            _ => {
                return ValueComparison::KindMismatch {
                    expected: self.kind(),
                    got: other.kind(),
                }
            }
        };

        if equal {
            ValueComparison::Equal
        } else {
            ValueComparison::Different
        }
    }

    /// Equality with the default decimal tolerance.
    pub fn matches(&self, other: &AttributeValue) -> bool {
        self.compare(other, DEFAULT_DECIMAL_EPSILON).is_equal()
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::String(s) => write!(f, "{}", s),
            AttributeValue::Integer(i) => write!(f, "{}", i),
            AttributeValue::Decimal(d) => write!(f, "{}", d),
            AttributeValue::Boolean(b) => write!(f, "{}", b),
            AttributeValue::DateTime(d) => write!(f, "{}", d.format("%Y/%m/%d %H:%M:%S")),
            AttributeValue::Absent => Ok(()),
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::String => write!(f, "String"),
            ValueKind::Integer => write!(f, "Integer"),
            ValueKind::Decimal => write!(f, "Decimal"),
            ValueKind::Boolean => write!(f, "Boolean"),
            ValueKind::DateTime => write!(f, "DateTime"),
            ValueKind::Absent => write!(f, "Absent"),
        }
    }
}

// ============================================================================
// Conversions from native values
// ============================================================================

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        AttributeValue::String(s.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        AttributeValue::String(s)
    }
}

impl From<i64> for AttributeValue {
    fn from(i: i64) -> Self {
        AttributeValue::Integer(i)
    }
}

impl From<i32> for AttributeValue {
    fn from(i: i32) -> Self {
        AttributeValue::Integer(i64::from(i))
    }
}

impl From<i16> for AttributeValue {
    fn from(i: i16) -> Self {
        AttributeValue::Integer(i64::from(i))
    }
}

impl From<f64> for AttributeValue {
    fn from(d: f64) -> Self {
        AttributeValue::Decimal(d)
    }
}

impl From<f32> for AttributeValue {
    fn from(d: f32) -> Self {
        AttributeValue::Decimal(f64::from(d))
    }
}

impl From<bool> for AttributeValue {
    fn from(b: bool) -> Self {
        AttributeValue::Boolean(b)
    }
}

impl From<DateTime<Utc>> for AttributeValue {
    fn from(d: DateTime<Utc>) -> Self {
        AttributeValue::DateTime(d)
    }
}

impl<T: Into<AttributeValue>> From<Option<T>> for AttributeValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(AttributeValue::Absent)
    }
}

// ============================================================================
// Attribute
// ============================================================================

/// A named attribute carried by a COBie object.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Attribute {
    /// Attribute name.
    pub name: String,
    /// Attribute value.
    #[serde(default)]
    pub value: AttributeValue,
    /// Optional free-text description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Property set the attribute was read from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_set: Option<String>,
}

impl Attribute {
    /// Create an attribute from anything convertible to a value.
    pub fn new(name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            description: None,
            property_set: None,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Whether this attribute's name refers to `name`.
    ///
    /// Names are compared case-insensitively after trimming.
    pub fn is_named(&self, name: &str) -> bool {
        names_equivalent(&self.name, name)
    }
}

/// Case-insensitive, whitespace-trimmed name comparison.
pub fn names_equivalent(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

// ============================================================================
// Category
// ============================================================================

/// A classification code attached to an object.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    /// Classification system (e.g. `Uniclass2015`).
    pub classification: String,
    /// Code within the classification system.
    pub code: String,
    /// Optional human-readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Normalized `(classification, code)` pair used for lookups.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CategoryKey {
    /// Trimmed, lower-cased classification.
    pub classification: String,
    /// Trimmed, lower-cased code.
    pub code: String,
}

impl Category {
    /// Create a category without description.
    pub fn new(classification: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            classification: classification.into(),
            code: code.into(),
            description: None,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Normalized lookup key.
    pub fn key(&self) -> CategoryKey {
        CategoryKey {
            classification: self.classification.trim().to_lowercase(),
            code: self.code.trim().to_lowercase(),
        }
    }

    /// Whether two categories denote the same classification entry.
    pub fn is_equivalent(&self, other: &Category) -> bool {
        self.key() == other.key()
    }

    /// Whether this category belongs to `classification`.
    pub fn is_in(&self, classification: &str) -> bool {
        names_equivalent(&self.classification, classification)
    }

    /// Whether this is a requirement marker rather than a real classification.
    pub fn is_marker(&self) -> bool {
        self.is_in(MARKER_CLASSIFICATION)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.classification, self.code)
    }
}

// ============================================================================
// Visual Attention
// ============================================================================

/// Visual outcome of comparing one attribute or one object.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum VisualAttentionStyle {
    /// Not evaluated.
    #[default]
    None,
    /// Present and equal.
    Green,
    /// Present but different.
    Amber,
    /// Required but missing.
    Red,
}

impl VisualAttentionStyle {
    /// Severity rank: `None` < `Green` < `Amber` < `Red`.
    pub fn severity(&self) -> u8 {
        match self {
            VisualAttentionStyle::None => 0,
            VisualAttentionStyle::Green => 1,
            VisualAttentionStyle::Amber => 2,
            VisualAttentionStyle::Red => 3,
        }
    }

    /// The more severe of two styles.
    pub fn worst(self, other: Self) -> Self {
        if other.severity() > self.severity() {
            other
        } else {
            self
        }
    }

    /// Roll a set of styles up into one.
    ///
    /// `Red` if any is red, else `Amber` if any is amber, else `Green` when
    /// every style is green, else `None`. An empty set rolls up to `None`.
    pub fn roll_up<I>(styles: I) -> Self
    where
        I: IntoIterator<Item = VisualAttentionStyle>,
    {
        let mut any = false;
        let mut all_green = true;
        let mut any_amber = false;

        for style in styles {
            any = true;
            match style {
                VisualAttentionStyle::Red => return VisualAttentionStyle::Red,
                VisualAttentionStyle::Amber => any_amber = true,
                VisualAttentionStyle::Green => {}
                VisualAttentionStyle::None => all_green = false,
            }
        }

        if any_amber {
            VisualAttentionStyle::Amber
        } else if any && all_green {
            VisualAttentionStyle::Green
        } else {
            VisualAttentionStyle::None
        }
    }

    /// Whether the outcome is a pass.
    pub fn is_green(&self) -> bool {
        matches!(self, VisualAttentionStyle::Green)
    }
}

impl fmt::Display for VisualAttentionStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VisualAttentionStyle::None => write!(f, "None"),
            VisualAttentionStyle::Green => write!(f, "Green"),
            VisualAttentionStyle::Amber => write!(f, "Amber"),
            VisualAttentionStyle::Red => write!(f, "Red"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_value_kind() {
        assert_eq!(AttributeValue::from(5).kind(), ValueKind::Integer);
        assert_eq!(AttributeValue::from(5.0).kind(), ValueKind::Decimal);
        assert_eq!(AttributeValue::from("A").kind(), ValueKind::String);
        assert_eq!(AttributeValue::from(true).kind(), ValueKind::Boolean);
        assert_eq!(AttributeValue::from(None::<i64>).kind(), ValueKind::Absent);
    }

    #[test]
    fn test_decimal_epsilon() {
        let a = AttributeValue::Decimal(10.0);
        let b = AttributeValue::Decimal(10.00000001);
        assert!(a.matches(&b));
        assert_eq!(a.compare(&b, 1e-12), ValueComparison::Different);
    }

    #[test]
    fn test_cross_kind_is_mismatch() {
        let a = AttributeValue::Integer(5);
        let b = AttributeValue::Decimal(5.0);
        assert_eq!(
            a.compare(&b, DEFAULT_DECIMAL_EPSILON),
            ValueComparison::KindMismatch {
                expected: ValueKind::Integer,
                got: ValueKind::Decimal
            }
        );
    }

    #[test]
    fn test_string_trimmed() {
        let a = AttributeValue::from("60 min");
        assert!(a.matches(&AttributeValue::from(" 60 min ")));
        assert!(!a.matches(&AttributeValue::from("60 MIN")));
    }

    #[test]
    fn test_datetime_equality() {
        let t = Utc.with_ymd_and_hms(2015, 3, 1, 12, 0, 0).unwrap();
        assert!(AttributeValue::from(t).matches(&AttributeValue::DateTime(t)));
    }

    #[test]
    fn test_value_serde_tagging() {
        let json = serde_json::to_string(&AttributeValue::Integer(7)).unwrap();
        assert_eq!(json, r#"{"type":"Integer","data":7}"#);
        let back: AttributeValue = serde_json::from_str(r#"{"type":"Absent"}"#).unwrap();
        assert!(back.is_absent());
    }

    #[test]
    fn test_category_equivalence() {
        let a = Category::new("Uniclass2015", "Ss_25_10");
        let b = Category::new(" uniclass2015", "SS_25_10 ");
        assert!(a.is_equivalent(&b));
        assert!(!a.is_equivalent(&Category::new("Uniclass2015", "Ss_25_11")));
        assert!(Category::new("dpow", "required").is_marker());
    }

    #[test]
    fn test_roll_up() {
        use VisualAttentionStyle::*;
        assert_eq!(VisualAttentionStyle::roll_up([Green, Amber, Red]), Red);
        assert_eq!(VisualAttentionStyle::roll_up([Green, Amber, None]), Amber);
        assert_eq!(VisualAttentionStyle::roll_up([Green, Green]), Green);
        assert_eq!(VisualAttentionStyle::roll_up([Green, None]), None);
        assert_eq!(VisualAttentionStyle::roll_up([]), None);
    }

    #[test]
    fn test_worst() {
        use VisualAttentionStyle::*;
        assert_eq!(Green.worst(Amber), Amber);
        assert_eq!(Red.worst(Green), Red);
        assert_eq!(None.worst(None), None);
    }
}
