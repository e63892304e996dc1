//! Plain report tables.

use crate::core::types::{AttributeValue, VisualAttentionStyle};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One cell of a report table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data")]
pub enum ReportCell {
    /// Plain text.
    Text(String),
    /// A count.
    Count(usize),
    /// A value coloured by an attention style.
    Styled {
        /// Displayed value.
        value: AttributeValue,
        /// Colouring.
        style: VisualAttentionStyle,
    },
}

impl ReportCell {
    /// Attention style of the cell (`None` for unstyled cells).
    pub fn style(&self) -> VisualAttentionStyle {
        match self {
            ReportCell::Styled { style, .. } => *style,
            _ => VisualAttentionStyle::None,
        }
    }
}

impl fmt::Display for ReportCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportCell::Text(text) => write!(f, "{}", text),
            ReportCell::Count(count) => write!(f, "{}", count),
            ReportCell::Styled { value, style } => match style {
                VisualAttentionStyle::None => write!(f, "{}", value),
                _ => write!(f, "{} [{}]", value, style),
            },
        }
    }
}

/// A titled table with named columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportTable {
    /// Table title.
    pub title: String,
    /// Column captions.
    pub columns: Vec<String>,
    /// Rows; every row has one cell per column.
    pub rows: Vec<Vec<ReportCell>>,
}

impl ReportTable {
    /// Create an empty table.
    pub fn new(title: impl Into<String>, columns: &[&str]) -> Self {
        Self {
            title: title.into(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row.
    pub fn push_row(&mut self, row: Vec<ReportCell>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render as aligned plain text.
    pub fn render_text(&self) -> String {
        let rendered: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| row.iter().map(|c| c.to_string()).collect())
            .collect();

        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, caption)| {
                rendered
                    .iter()
                    .filter_map(|r| r.get(i))
                    .map(|c| c.chars().count())
                    .chain(std::iter::once(caption.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let line = |cells: &[String]| -> String {
            cells
                .iter()
                .zip(&widths)
                .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
                .collect::<Vec<_>>()
                .join(" | ")
                .trim_end()
                .to_string()
        };

        let mut out = String::new();
        out.push_str(&self.title);
        out.push('\n');
        out.push_str(&line(&self.columns));
        out.push('\n');
        out.push_str(
            &widths
                .iter()
                .map(|w| "-".repeat(*w))
                .collect::<Vec<_>>()
                .join("-+-"),
        );
        out.push('\n');
        for row in &rendered {
            out.push_str(&line(row));
            out.push('\n');
        }
        out
    }
}
