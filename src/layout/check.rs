//! Consistency checks for layoutData.
//!
//! Detects edges that override each other and missing anchors. Checks are
//! advisory: they never fail, the codec drops overridden edges and carries on.

use std::fmt;

use super::raw::RawLayout;
use super::types::Edge;

/// An advisory finding about a layoutData value
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    pub message: String,
    /// Edges the codec drops because of this finding
    pub dropped: Vec<Edge>,
}

/// Category of diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticCategory {
    /// Edges that override each other
    Inconsistent,
    /// No horizontal or no vertical anchor
    Incomplete,
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticCategory::Inconsistent => write!(f, "inconsistent"),
            DiagnosticCategory::Incomplete => write!(f, "incomplete"),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// An edge that, when present, takes precedence over others
struct Override {
    edge: Edge,
    overrides: &'static [Edge],
    message: &'static str,
}

const OVERRIDES: [Override; 3] = [
    Override {
        edge: Edge::CenterX,
        overrides: &[Edge::Left, Edge::Right],
        message: "Inconsistent layoutData: centerX overrides left and right",
    },
    Override {
        edge: Edge::CenterY,
        overrides: &[Edge::Top, Edge::Bottom],
        message: "Inconsistent layoutData: centerY overrides top and bottom",
    },
    Override {
        edge: Edge::Baseline,
        overrides: &[Edge::Top, Edge::Bottom, Edge::CenterY],
        message: "Inconsistent layoutData: baseline overrides top, bottom and centerY",
    },
];

pub const INCOMPLETE_HORIZONTAL: &str =
    "Incomplete layoutData: either left, right or centerX should be specified.";
pub const INCOMPLETE_VERTICAL: &str =
    "Incomplete layoutData: either top, bottom, centerY, or baseline should be specified.";

/// Run all consistency checks on raw layoutData.
pub fn check(raw: &RawLayout) -> Vec<Diagnostic> {
    let present: Vec<Edge> = Edge::ALL
        .into_iter()
        .filter(|e| raw.has(e.as_str()))
        .collect();

    let mut diagnostics = Vec::new();
    check_overrides(&present, &mut diagnostics);
    check_anchors(&present, &mut diagnostics);
    diagnostics
}

fn check_overrides(present: &[Edge], diagnostics: &mut Vec<Diagnostic>) {
    for rule in &OVERRIDES {
        if !present.contains(&rule.edge) {
            continue;
        }
        let dropped: Vec<Edge> = rule
            .overrides
            .iter()
            .copied()
            .filter(|e| present.contains(e))
            .collect();
        if !dropped.is_empty() {
            diagnostics.push(Diagnostic {
                category: DiagnosticCategory::Inconsistent,
                message: rule.message.to_string(),
                dropped,
            });
        }
    }
}

fn check_anchors(present: &[Edge], diagnostics: &mut Vec<Diagnostic>) {
    if !present.iter().any(Edge::is_horizontal_anchor) {
        diagnostics.push(Diagnostic {
            category: DiagnosticCategory::Incomplete,
            message: INCOMPLETE_HORIZONTAL.to_string(),
            dropped: Vec::new(),
        });
    }
    if !present.iter().any(Edge::is_vertical_anchor) {
        diagnostics.push(Diagnostic {
            category: DiagnosticCategory::Incomplete,
            message: INCOMPLETE_VERTICAL.to_string(),
            dropped: Vec::new(),
        });
    }
}
