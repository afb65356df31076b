//! Core types for the layout engine

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::selector::Selector;

/// Opaque native identifier of a widget (e.g. `$3`)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WidgetId(pub String);

impl WidgetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WidgetId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A layoutData key
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Edge {
    Left,
    Right,
    Top,
    Bottom,
    CenterX,
    CenterY,
    Width,
    Height,
    Baseline,
}

/// What kind of values an edge accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    /// `left`, `right`, `top`, `bottom`: offsets, percentages and references
    Anchor,
    /// `width`, `height`, `centerX`, `centerY`: plain numbers only
    Scalar,
    /// `baseline`: references only
    Baseline,
}

impl Edge {
    pub const ALL: [Edge; 9] = [
        Edge::Left,
        Edge::Right,
        Edge::Top,
        Edge::Bottom,
        Edge::CenterX,
        Edge::CenterY,
        Edge::Width,
        Edge::Height,
        Edge::Baseline,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Edge::Left => "left",
            Edge::Right => "right",
            Edge::Top => "top",
            Edge::Bottom => "bottom",
            Edge::CenterX => "centerX",
            Edge::CenterY => "centerY",
            Edge::Width => "width",
            Edge::Height => "height",
            Edge::Baseline => "baseline",
        }
    }

    /// Look up an edge by its layoutData key
    pub fn from_key(key: &str) -> Option<Edge> {
        Edge::ALL.into_iter().find(|e| e.as_str() == key)
    }

    pub fn kind(&self) -> EdgeKind {
        match self {
            Edge::Left | Edge::Right | Edge::Top | Edge::Bottom => EdgeKind::Anchor,
            Edge::CenterX | Edge::CenterY | Edge::Width | Edge::Height => EdgeKind::Scalar,
            Edge::Baseline => EdgeKind::Baseline,
        }
    }

    pub fn is_horizontal_anchor(&self) -> bool {
        matches!(self, Edge::Left | Edge::Right | Edge::CenterX)
    }

    pub fn is_vertical_anchor(&self) -> bool {
        matches!(self, Edge::Top | Edge::Bottom | Edge::CenterY | Edge::Baseline)
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Relative position of a sibling with respect to the owning widget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiblingDescriptor {
    /// `prev()`: the sibling immediately before the owner
    Prev,
    /// `next()`: the sibling immediately after the owner
    Next,
}

impl SiblingDescriptor {
    pub fn as_str(&self) -> &'static str {
        match self {
            SiblingDescriptor::Prev => "prev()",
            SiblingDescriptor::Next => "next()",
        }
    }
}

/// The not-yet-resolved target of a reference attachment
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    Sibling(SiblingDescriptor),
    Selector(Selector),
    /// A widget handle given directly; still has to be validated as a sibling
    Widget(WidgetId),
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Sibling(s) => f.write_str(s.as_str()),
            Target::Selector(s) => write!(f, "{}", s),
            Target::Widget(id) => write!(f, "{}", id),
        }
    }
}

/// A single normalized edge constraint
///
/// `Offset(n)`, `Percentage { percent, offset }` and
/// `Reference { target, offset }` cover every attachment form; a plain
/// percentage or plain reference is the same variant with `offset == 0`.
#[derive(Debug, Clone, PartialEq)]
pub enum Attachment {
    /// Fixed distance from the parent's corresponding edge
    Offset(f64),
    /// Percentage (0..=100) of the parent's dimension plus a fixed offset
    Percentage { percent: f64, offset: f64 },
    /// Attachment to a sibling plus a fixed offset
    Reference { target: Target, offset: f64 },
}

impl Attachment {
    pub fn offset(value: f64) -> Self {
        Attachment::Offset(value)
    }

    /// Percentage plus offset; `0%` collapses to a plain offset
    pub fn percentage(percent: f64, offset: f64) -> Self {
        if percent == 0.0 {
            Attachment::Offset(offset)
        } else {
            Attachment::Percentage { percent, offset }
        }
    }

    pub fn reference(target: Target, offset: f64) -> Self {
        Attachment::Reference { target, offset }
    }

    pub fn target(&self) -> Option<&Target> {
        match self {
            Attachment::Reference { target, .. } => Some(target),
            _ => None,
        }
    }
}

/// The complete layoutData of one widget, at most one attachment per edge
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayoutAttachmentSet {
    edges: BTreeMap<Edge, Attachment>,
}

impl LayoutAttachmentSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, edge: Edge, attachment: Attachment) -> Self {
        self.edges.insert(edge, attachment);
        self
    }

    pub fn insert(&mut self, edge: Edge, attachment: Attachment) -> Option<Attachment> {
        self.edges.insert(edge, attachment)
    }

    pub fn remove(&mut self, edge: Edge) -> Option<Attachment> {
        self.edges.remove(&edge)
    }

    pub fn get(&self, edge: Edge) -> Option<&Attachment> {
        self.edges.get(&edge)
    }

    pub fn contains(&self, edge: Edge) -> bool {
        self.edges.contains_key(&edge)
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Edge, &Attachment)> {
        self.edges.iter().map(|(e, a)| (*e, a))
    }

    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.edges.keys().copied()
    }

    /// Whether any edge still refers to a sibling
    pub fn has_references(&self) -> bool {
        self.edges.values().any(|a| a.target().is_some())
    }
}

impl FromIterator<(Edge, Attachment)> for LayoutAttachmentSet {
    fn from_iter<I: IntoIterator<Item = (Edge, Attachment)>>(iter: I) -> Self {
        Self {
            edges: iter.into_iter().collect(),
        }
    }
}

/// An attachment after reference resolution: numeric or a concrete widget
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    Offset(f64),
    Percentage { percent: f64, offset: f64 },
    Widget { id: WidgetId, offset: f64 },
}

impl Resolved {
    /// The value submitted in place of a reference that did not resolve
    pub fn placeholder(offset: f64) -> Self {
        Resolved::Percentage {
            percent: 0.0,
            offset,
        }
    }

    pub fn to_wire(&self) -> WireValue {
        match self {
            Resolved::Offset(n) => WireValue::Number(*n),
            Resolved::Percentage { percent, offset } => {
                WireValue::Pair(WireAnchor::Percent(*percent), *offset)
            }
            Resolved::Widget { id, offset } => {
                WireValue::Pair(WireAnchor::Widget(id.clone()), *offset)
            }
        }
    }

    /// Convert back into an attachment so the result can be resolved again
    pub fn to_attachment(&self) -> Attachment {
        match self {
            Resolved::Offset(n) => Attachment::Offset(*n),
            Resolved::Percentage { percent, offset } => Attachment::Percentage {
                percent: *percent,
                offset: *offset,
            },
            Resolved::Widget { id, offset } => Attachment::Reference {
                target: Target::Widget(id.clone()),
                offset: *offset,
            },
        }
    }
}

/// Outcome of resolving a whole attachment set
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResolvedSet {
    pub values: BTreeMap<Edge, Resolved>,
    /// Edges whose reference did not resolve and carry a placeholder, with
    /// the reference still to be resolved
    pub pending: BTreeMap<Edge, Attachment>,
}

impl ResolvedSet {
    pub fn is_complete(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn get(&self, edge: Edge) -> Option<&Resolved> {
        self.values.get(&edge)
    }

    pub fn to_wire(&self) -> WireLayout {
        WireLayout(
            self.values
                .iter()
                .map(|(edge, value)| (*edge, value.to_wire()))
                .collect(),
        )
    }

    pub fn is_pending(&self, edge: Edge) -> bool {
        self.pending.contains_key(&edge)
    }

    /// Attachments to resolve again; pending edges keep their reference
    pub fn to_attachment_set(&self) -> LayoutAttachmentSet {
        self.values
            .iter()
            .map(|(edge, value)| match self.pending.get(edge) {
                Some(reference) => (*edge, reference.clone()),
                None => (*edge, value.to_attachment()),
            })
            .collect()
    }
}

/// First element of a two-element wire array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireAnchor {
    Percent(f64),
    Widget(WidgetId),
}

/// Wire form of one edge: a bare number or `[identifierOrPercentage, offset]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireValue {
    Number(f64),
    Pair(WireAnchor, f64),
}

/// Fully numeric layoutData as consumed by the native side
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WireLayout(pub BTreeMap<Edge, WireValue>);

impl WireLayout {
    pub fn get(&self, edge: Edge) -> Option<&WireValue> {
        self.0.get(&edge)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
