//! Scene scripts: a JSON list of tree and layout operations
//!
//! ```json
//! {
//!   "operations": [
//!     { "create": { "cid": "$1", "type": "Composite" } },
//!     { "create": { "cid": "$2", "type": "Button", "id": "ok", "class": ["primary"] } },
//!     { "append": { "parent": "$1", "child": "$2" } },
//!     { "layout": { "widget": "$2", "data": { "left": "prev()", "top": 0 } } },
//!     { "dispose": "$2" }
//!   ]
//! }
//! ```
//!
//! Replaying a scene drives a [`MemoryTree`] and a [`LayoutQueue`] and
//! records what would have been handed to the native side.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bridge::{RecordingSink, Submission};
use crate::layout::{Edge, LayoutConfig, LayoutError, LayoutQueue, RawLayout, WidgetId};
use crate::tree::{MemoryTree, TreeError, WidgetInfo};

/// Errors that can occur while loading or replaying a scene
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("invalid scene: {0}")]
    Json(#[from] serde_json::Error),

    #[error("operation {index}: {source}")]
    Tree {
        index: usize,
        #[source]
        source: TreeError,
    },

    #[error("operation {index} ({widget}): {source}")]
    Layout {
        index: usize,
        widget: WidgetId,
        #[source]
        source: LayoutError,
    },
}

/// One step of a scene
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    Create(CreateWidget),
    Append { parent: WidgetId, child: WidgetId },
    Layout {
        widget: WidgetId,
        data: serde_json::Value,
    },
    Dispose(WidgetId),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreateWidget {
    pub cid: WidgetId,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub class: Vec<String>,
}

impl From<&CreateWidget> for WidgetInfo {
    fn from(create: &CreateWidget) -> Self {
        let mut info = WidgetInfo::new(create.cid.clone(), create.type_name.clone());
        info.id = create.id.clone();
        info.classes = create.class.clone();
        info
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Scene {
    pub operations: Vec<Operation>,
}

/// A diagnostic raised while setting layoutData
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportedDiagnostic {
    pub widget: WidgetId,
    pub category: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PendingEdge {
    pub widget: WidgetId,
    pub edge: Edge,
}

/// Outcome of replaying a scene
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneReport {
    pub submissions: Vec<Submission>,
    pub diagnostics: Vec<ReportedDiagnostic>,
    pub pending: Vec<PendingEdge>,
}

impl Scene {
    pub fn from_json(source: &str) -> Result<Self, SceneError> {
        Ok(serde_json::from_str(source)?)
    }

    /// Replay every operation in order against a fresh tree
    pub fn replay(&self, config: LayoutConfig) -> Result<SceneReport, SceneError> {
        let mut tree = MemoryTree::new();
        let mut queue = LayoutQueue::new(config);
        let mut sink = RecordingSink::new();
        let mut diagnostics = Vec::new();

        for (index, operation) in self.operations.iter().enumerate() {
            let tree_err = |source| SceneError::Tree { index, source };
            match operation {
                Operation::Create(create) => {
                    tree.insert(create.into()).map_err(tree_err)?;
                }
                Operation::Append { parent, child } => {
                    let event = tree.append(parent, child).map_err(tree_err)?;
                    queue.handle_event(&tree, &event, &mut sink);
                }
                Operation::Layout { widget, data } => {
                    if !tree.contains(widget) {
                        return Err(tree_err(TreeError::UnknownWidget(widget.clone())));
                    }
                    let layout_err = |source| SceneError::Layout {
                        index,
                        widget: widget.clone(),
                        source,
                    };
                    let raw = RawLayout::from_json(data).map_err(layout_err)?;
                    let found = queue
                        .set_layout_data(&tree, widget, &raw, &mut sink)
                        .map_err(layout_err)?;
                    diagnostics.extend(found.into_iter().map(|d| ReportedDiagnostic {
                        widget: widget.clone(),
                        category: d.category.to_string(),
                        message: d.message,
                    }));
                }
                Operation::Dispose(widget) => {
                    let event = tree.dispose(widget).map_err(tree_err)?;
                    queue.handle_event(&tree, &event, &mut sink);
                }
            }
        }

        let pending = queue
            .pending()
            .map(|p| PendingEdge {
                widget: p.widget.clone(),
                edge: p.edge,
            })
            .collect();
        Ok(SceneReport {
            submissions: sink.submissions,
            diagnostics,
            pending,
        })
    }
}
