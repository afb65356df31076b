//! Translation between layoutData shorthand and attachment sets
//!
//! `encode` validates application input and normalizes it into a
//! [`LayoutAttachmentSet`]; `decode` renders a set back into shorthand for
//! read-back. Both produce fresh values that share nothing with their input.

use super::check::{check, Diagnostic};
use super::error::LayoutError;
use super::raw::{RawLayout, RawValue};
use super::selector::{parse_reference, Shorthand};
use super::types::{Attachment, Edge, EdgeKind, LayoutAttachmentSet, Target};

const INVALID_TYPE: &str = "invalid type";
const ARRAY_LENGTH: &str = "array length must be 2";
const MUST_BE_NUMBER: &str = "must be a number";
const MUST_BE_FINITE: &str = "must be a finite number";
const MUST_BE_REFERENCE: &str = "must be a widget reference";
const PERCENTAGE_RANGE: &str = "percentage must be between 0 and 100";

/// Encode layoutData, emitting consistency diagnostics as warnings
pub fn encode(raw: &RawLayout) -> Result<LayoutAttachmentSet, LayoutError> {
    let (set, diagnostics) = encode_with_diagnostics(raw)?;
    for diagnostic in &diagnostics {
        tracing::warn!(category = %diagnostic.category, "{}", diagnostic.message);
    }
    Ok(set)
}

/// Encode layoutData and return the consistency diagnostics instead of logging them
pub fn encode_with_diagnostics(
    raw: &RawLayout,
) -> Result<(LayoutAttachmentSet, Vec<Diagnostic>), LayoutError> {
    let mut edges = Vec::new();
    for (key, _) in raw.iter() {
        let edge = Edge::from_key(key).ok_or_else(|| LayoutError::invalid_key(key))?;
        edges.push(edge);
    }

    let mut set = LayoutAttachmentSet::new();
    for (edge, (_, value)) in edges.into_iter().zip(raw.iter()) {
        if value.is_null() {
            continue;
        }
        set.insert(edge, encode_value(edge, value)?);
    }

    let diagnostics = check(raw);
    for diagnostic in &diagnostics {
        for edge in &diagnostic.dropped {
            set.remove(*edge);
        }
    }
    Ok((set, diagnostics))
}

fn encode_value(edge: Edge, value: &RawValue) -> Result<Attachment, LayoutError> {
    match edge.kind() {
        EdgeKind::Scalar => match value {
            RawValue::Number(n) => Ok(Attachment::Offset(finite(edge, *n)?)),
            _ => Err(LayoutError::invalid_value(edge.as_str(), MUST_BE_NUMBER)),
        },
        EdgeKind::Baseline => match value {
            RawValue::Widget(id) => Ok(Attachment::reference(Target::Widget(id.clone()), 0.0)),
            RawValue::Text(text) => match parse_text(edge, text)? {
                Shorthand::Percent(_) => {
                    Err(LayoutError::invalid_value(edge.as_str(), MUST_BE_REFERENCE))
                }
                Shorthand::Sibling(s) => Ok(Attachment::reference(Target::Sibling(s), 0.0)),
                Shorthand::Selector(s) => Ok(Attachment::reference(Target::Selector(s), 0.0)),
            },
            _ => Err(LayoutError::invalid_value(edge.as_str(), MUST_BE_REFERENCE)),
        },
        EdgeKind::Anchor => match value {
            RawValue::Number(n) => Ok(Attachment::Offset(finite(edge, *n)?)),
            RawValue::Array(items) => match items.as_slice() {
                [first, RawValue::Number(offset)] => {
                    let offset = finite(edge, *offset)?;
                    encode_anchor(edge, first, offset)
                }
                [_, _] => Err(LayoutError::invalid_value(edge.as_str(), INVALID_TYPE)),
                _ => Err(LayoutError::invalid_value(edge.as_str(), ARRAY_LENGTH)),
            },
            other => encode_anchor(edge, other, 0.0),
        },
    }
}

/// Encode the non-numeric part of an anchor edge
fn encode_anchor(edge: Edge, value: &RawValue, offset: f64) -> Result<Attachment, LayoutError> {
    match value {
        RawValue::Widget(id) => Ok(Attachment::reference(Target::Widget(id.clone()), offset)),
        RawValue::Text(text) => match parse_text(edge, text)? {
            Shorthand::Percent(p) => {
                if !(0.0..=100.0).contains(&p) {
                    return Err(LayoutError::invalid_value(edge.as_str(), PERCENTAGE_RANGE));
                }
                Ok(Attachment::percentage(p, offset))
            }
            Shorthand::Sibling(s) => Ok(Attachment::reference(Target::Sibling(s), offset)),
            Shorthand::Selector(s) => Ok(Attachment::reference(Target::Selector(s), offset)),
        },
        _ => Err(LayoutError::invalid_value(edge.as_str(), INVALID_TYPE)),
    }
}

fn parse_text(edge: Edge, text: &str) -> Result<Shorthand, LayoutError> {
    parse_reference(text).map_err(|e| LayoutError::invalid_selector(edge.as_str(), e))
}

fn finite(edge: Edge, n: f64) -> Result<f64, LayoutError> {
    if n.is_finite() {
        Ok(n)
    } else {
        Err(LayoutError::invalid_value(edge.as_str(), MUST_BE_FINITE))
    }
}

/// Render an attachment set back into layoutData shorthand
pub fn decode(set: &LayoutAttachmentSet) -> RawLayout {
    set.iter()
        .map(|(edge, attachment)| (edge.as_str(), decode_value(attachment)))
        .collect()
}

fn decode_value(attachment: &Attachment) -> RawValue {
    match attachment {
        Attachment::Offset(n) => RawValue::Number(*n),
        Attachment::Percentage { percent, offset } => {
            with_offset(RawValue::Text(format!("{}%", percent)), *offset)
        }
        Attachment::Reference { target, offset } => {
            let reference = match target {
                Target::Widget(id) => RawValue::Widget(id.clone()),
                Target::Sibling(s) => RawValue::Text(s.as_str().to_string()),
                Target::Selector(s) => RawValue::Text(s.as_str().to_string()),
            };
            with_offset(reference, *offset)
        }
    }
}

fn with_offset(value: RawValue, offset: f64) -> RawValue {
    if offset == 0.0 {
        value
    } else {
        RawValue::Array(vec![value, RawValue::Number(offset)])
    }
}
