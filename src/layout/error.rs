//! Error types for the layout engine

use thiserror::Error;

use crate::error::SelectorError;

use super::types::{Edge, WidgetId};

/// Errors raised while encoding or resolving layoutData
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LayoutError {
    /// A key that is not a layout edge
    #[error("Invalid key '{key}' in layoutData")]
    InvalidKey { key: String },

    /// A value of the wrong shape or type for its edge
    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },

    /// A string value that is neither a percentage nor a valid selector
    #[error("Invalid value for '{key}': {error}")]
    InvalidSelector { key: String, error: SelectorError },

    /// layoutData given as something other than an object or preset name
    #[error("Invalid layoutData: expected an object")]
    NotAnObject,

    /// layoutData given as an unknown preset name
    #[error("Invalid layoutData: unknown preset '{name}'")]
    UnknownPreset { name: String },

    /// layoutData set on a widget that no longer exists
    #[error("Cannot set layoutData on disposed widget '{widget}'")]
    Disposed { widget: WidgetId },

    /// A reference that could not be resolved in strict mode
    #[error("{reason} for '{edge}' ({reference})")]
    UnresolvedReference {
        edge: Edge,
        reference: String,
        reason: &'static str,
    },
}

impl LayoutError {
    pub const WIDGET_NOT_RESOLVED: &'static str = "widget reference did not resolve";
    pub const SELECTOR_NOT_RESOLVED: &'static str =
        "selector did not resolve due to missing sibling/parent";

    /// Create an invalid key error
    pub fn invalid_key(key: impl Into<String>) -> Self {
        Self::InvalidKey { key: key.into() }
    }

    /// Create an invalid value error
    pub fn invalid_value(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_selector(key: impl Into<String>, error: SelectorError) -> Self {
        Self::InvalidSelector {
            key: key.into(),
            error,
        }
    }

    pub fn unknown_preset(name: impl Into<String>) -> Self {
        Self::UnknownPreset { name: name.into() }
    }

    /// The layoutData key the error is about, if any
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::InvalidKey { key } => Some(key),
            Self::InvalidValue { key, .. } => Some(key),
            Self::InvalidSelector { key, .. } => Some(key),
            Self::UnresolvedReference { edge, .. } => Some(edge.as_str()),
            _ => None,
        }
    }

    /// The selector syntax error behind this error, if any
    pub fn selector_error(&self) -> Option<&SelectorError> {
        match self {
            Self::InvalidSelector { error, .. } => Some(error),
            _ => None,
        }
    }
}
