//! Summary reports over a validated facility.
//!
//! Reports only read the [`ValidatedFacility`]; no matching is re-run.

use crate::core::types::{AttributeValue, VisualAttentionStyle};
use crate::report::table::{ReportCell, ReportTable};
use crate::validation::{Section, TwoLevelResult, ValidatedFacility};
use indexmap::IndexMap;

/// Requirement attribute documents are grouped by.
pub const DEFAULT_DOCUMENT_GROUPING: &str = "ResponsibleRole";

/// Row key for groups without a category in the preferred classification.
pub const UNCLASSIFIED: &str = "unclassified";

#[derive(Debug, Default)]
struct RowTotals {
    description: String,
    required: usize,
    submitted: usize,
    required_children: usize,
    submitted_children: usize,
    styles: Vec<VisualAttentionStyle>,
}

impl RowTotals {
    fn add(&mut self, group: &TwoLevelResult) {
        self.required += 1;
        if group.parent.is_matched() {
            self.submitted += 1;
        }
        self.required_children += group.required_children_count();
        self.submitted_children += group.submitted_children_count();
        self.styles.push(group.style);
    }

    fn cells(&self, key: &str) -> Vec<ReportCell> {
        let style = VisualAttentionStyle::roll_up(self.styles.iter().copied());
        vec![
            ReportCell::Text(key.to_string()),
            ReportCell::Text(self.description.clone()),
            ReportCell::Count(self.required),
            ReportCell::Styled {
                value: AttributeValue::Integer(self.submitted as i64),
                style,
            },
            ReportCell::Count(self.required_children),
            ReportCell::Count(self.submitted_children),
        ]
    }
}

const GROUPING_COLUMNS: [&str; 6] = [
    "Code",
    "Description",
    "Required",
    "Submitted",
    "Required items",
    "Submitted items",
];

/// Summarize groups per code of the preferred classification.
///
/// Rows appear in first-seen order; groups without a preferred category are
/// collected under [`UNCLASSIFIED`].
pub fn grouping_summary(title: &str, groups: &[TwoLevelResult], classification: &str) -> ReportTable {
    let mut rows: IndexMap<String, RowTotals> = IndexMap::new();

    for group in groups {
        let (key, description) = match group.preferred_category(classification) {
            Some(category) => (
                category.code.clone(),
                category.description.clone().unwrap_or_default(),
            ),
            None => (UNCLASSIFIED.to_string(), String::new()),
        };
        let totals = rows.entry(key).or_default();
        if totals.description.is_empty() {
            totals.description = description;
        }
        totals.add(group);
    }

    let mut table = ReportTable::new(title, &GROUPING_COLUMNS);
    for (key, totals) in &rows {
        table.push_row(totals.cells(key));
    }
    table
}

/// Summarize documents by the value of a requirement attribute.
pub fn document_summary(documents: &[TwoLevelResult], attribute: &str) -> ReportTable {
    let mut rows: IndexMap<String, RowTotals> = IndexMap::new();

    for document in documents {
        let key = document
            .parent
            .requirement
            .attribute(attribute)
            .map(|a| a.value.to_string())
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| "unspecified".to_string());
        rows.entry(key).or_default().add(document);
    }

    let mut table = ReportTable::new(Section::Documents.title(), &GROUPING_COLUMNS);
    for (key, totals) in &rows {
        table.push_row(totals.cells(key));
    }
    table
}

/// Groups that deserve a detail page: at least one submitted child and a
/// category in the preferred classification.
pub fn reportable_groups<'a>(groups: &'a [TwoLevelResult], classification: &str) -> Vec<&'a TwoLevelResult> {
    groups
        .iter()
        .filter(|g| g.submitted_children_count() > 0 && g.preferred_category(classification).is_some())
        .collect()
}

/// Detail table for one group: one row per child, one column per required
/// attribute.
pub fn detail_table(group: &TwoLevelResult) -> ReportTable {
    let mut attribute_names: Vec<&str> = Vec::new();
    for child in &group.children {
        for outcome in &child.outcomes {
            if !attribute_names.iter().any(|n| *n == outcome.name) {
                attribute_names.push(&outcome.name);
            }
        }
    }

    let mut columns = vec!["Name", "Matched"];
    columns.extend(attribute_names.iter().copied());
    let mut table = ReportTable::new(group.name.clone(), &columns);

    for child in &group.children {
        let mut row = vec![
            ReportCell::Text(child.requirement.name.clone()),
            ReportCell::Styled {
                value: AttributeValue::from(child.matched.as_ref().map(|m| m.name.clone())),
                style: child.style,
            },
        ];
        for name in &attribute_names {
            row.push(match child.outcome(name) {
                Some(outcome) => ReportCell::Styled {
                    value: outcome.compared_value().clone(),
                    style: outcome.style,
                },
                None => ReportCell::Text(String::new()),
            });
        }
        table.push_row(row);
    }
    table
}

/// Every summary table of a validated facility, in report order.
pub fn facility_summary(facility: &ValidatedFacility) -> Vec<ReportTable> {
    let classification = facility.classification_preference.as_str();
    let mut tables = Vec::new();

    for section in [Section::AssetTypes, Section::Zones] {
        let groups = facility.section(section);
        if !groups.is_empty() {
            tables.push(grouping_summary(section.title(), groups, classification));
        }
    }

    if !facility.documents.is_empty() {
        tables.push(document_summary(&facility.documents, DEFAULT_DOCUMENT_GROUPING));
    }

    if !facility.contacts.is_empty() {
        tables.push(grouping_summary(
            Section::Contacts.title(),
            &facility.contacts,
            classification,
        ));
    }

    tables
}
