//! Widget tree interface consumed by the layout engine
//!
//! The engine only reads the tree. [`MemoryTree`] is a small in-memory
//! implementation used by scenes and tests.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::layout::selector::Selectable;
use crate::layout::WidgetId;

/// Errors from structural operations on a [`MemoryTree`]
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TreeError {
    #[error("unknown widget '{0}'")]
    UnknownWidget(WidgetId),

    #[error("widget '{0}' is disposed")]
    Disposed(WidgetId),

    #[error("widget '{0}' already exists")]
    Duplicate(WidgetId),

    #[error("cannot append '{child}' to its own descendant '{parent}'")]
    Cycle { parent: WidgetId, child: WidgetId },
}

/// Descriptive data of a widget: what selectors match against
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetInfo {
    pub cid: WidgetId,
    pub type_name: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
}

impl WidgetInfo {
    pub fn new(cid: impl Into<WidgetId>, type_name: impl Into<String>) -> Self {
        Self {
            cid: cid.into(),
            type_name: type_name.into(),
            id: None,
            classes: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }
}

impl Selectable for WidgetInfo {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn widget_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// Read access to a widget tree
pub trait WidgetTree {
    fn parent_of(&self, widget: &WidgetId) -> Option<WidgetId>;

    /// Children in insertion order
    fn children_of(&self, widget: &WidgetId) -> Vec<WidgetId>;

    fn is_disposed(&self, widget: &WidgetId) -> bool;

    fn info(&self, widget: &WidgetId) -> Option<WidgetInfo>;
}

/// A structural change, forwarded to the layout queue
#[derive(Debug, Clone, PartialEq)]
pub enum TreeEvent {
    /// `child` was appended to `parent`, possibly moving from another parent
    Appended { parent: WidgetId, child: WidgetId },
    /// The listed widgets were disposed, the root of the disposed subtree first
    Disposed(Vec<WidgetId>),
}

#[derive(Debug, Clone)]
struct Node {
    info: WidgetInfo,
    parent: Option<WidgetId>,
    children: Vec<WidgetId>,
    disposed: bool,
}

/// In-memory widget tree handing out native identifiers `$1`, `$2`, ...
#[derive(Debug, Clone, Default)]
pub struct MemoryTree {
    nodes: BTreeMap<WidgetId, Node>,
    next_cid: u64,
}

impl MemoryTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a detached widget with a generated identifier
    pub fn create(&mut self, type_name: &str) -> WidgetId {
        loop {
            self.next_cid += 1;
            let cid = WidgetId::new(format!("${}", self.next_cid));
            if !self.nodes.contains_key(&cid) {
                self.add(WidgetInfo::new(cid.clone(), type_name));
                return cid;
            }
        }
    }

    /// Create a detached widget with an explicit identifier
    pub fn insert(&mut self, info: WidgetInfo) -> Result<WidgetId, TreeError> {
        if self.nodes.contains_key(&info.cid) {
            return Err(TreeError::Duplicate(info.cid));
        }
        let cid = info.cid.clone();
        self.add(info);
        Ok(cid)
    }

    fn add(&mut self, info: WidgetInfo) {
        self.nodes.insert(
            info.cid.clone(),
            Node {
                info,
                parent: None,
                children: Vec::new(),
                disposed: false,
            },
        );
    }

    fn live(&self, widget: &WidgetId) -> Result<&Node, TreeError> {
        let node = self
            .nodes
            .get(widget)
            .ok_or_else(|| TreeError::UnknownWidget(widget.clone()))?;
        if node.disposed {
            return Err(TreeError::Disposed(widget.clone()));
        }
        Ok(node)
    }

    fn live_mut(&mut self, widget: &WidgetId) -> Result<&mut Node, TreeError> {
        self.live(widget)?;
        self.nodes
            .get_mut(widget)
            .ok_or_else(|| TreeError::UnknownWidget(widget.clone()))
    }

    pub fn set_id(&mut self, widget: &WidgetId, id: &str) -> Result<(), TreeError> {
        self.live_mut(widget)?.info.id = Some(id.to_string());
        Ok(())
    }

    pub fn add_class(&mut self, widget: &WidgetId, class: &str) -> Result<(), TreeError> {
        self.live_mut(widget)?.info.classes.push(class.to_string());
        Ok(())
    }

    /// Append `child` as the last child of `parent`, detaching it from its
    /// previous parent first
    pub fn append(&mut self, parent: &WidgetId, child: &WidgetId) -> Result<TreeEvent, TreeError> {
        self.live(parent)?;
        self.live(child)?;

        let mut ancestor = Some(parent.clone());
        while let Some(current) = ancestor {
            if &current == child {
                return Err(TreeError::Cycle {
                    parent: parent.clone(),
                    child: child.clone(),
                });
            }
            ancestor = self.nodes.get(&current).and_then(|n| n.parent.clone());
        }

        self.detach(child);
        self.live_mut(parent)?.children.push(child.clone());
        self.live_mut(child)?.parent = Some(parent.clone());
        Ok(TreeEvent::Appended {
            parent: parent.clone(),
            child: child.clone(),
        })
    }

    fn detach(&mut self, child: &WidgetId) {
        let old_parent = self.nodes.get_mut(child).and_then(|n| n.parent.take());
        if let Some(old) = old_parent.and_then(|p| self.nodes.get_mut(&p)) {
            old.children.retain(|c| c != child);
        }
    }

    /// Dispose a widget and all of its descendants
    pub fn dispose(&mut self, widget: &WidgetId) -> Result<TreeEvent, TreeError> {
        self.live(widget)?;
        self.detach(widget);

        let mut disposed = Vec::new();
        let mut stack = vec![widget.clone()];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.get_mut(&current) {
                node.disposed = true;
                node.parent = None;
                stack.extend(node.children.drain(..).rev());
                disposed.push(current);
            }
        }
        Ok(TreeEvent::Disposed(disposed))
    }

    pub fn contains(&self, widget: &WidgetId) -> bool {
        self.nodes.contains_key(widget)
    }
}

impl WidgetTree for MemoryTree {
    fn parent_of(&self, widget: &WidgetId) -> Option<WidgetId> {
        self.nodes.get(widget).and_then(|n| n.parent.clone())
    }

    fn children_of(&self, widget: &WidgetId) -> Vec<WidgetId> {
        self.nodes
            .get(widget)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    fn is_disposed(&self, widget: &WidgetId) -> bool {
        self.nodes.get(widget).is_some_and(|n| n.disposed)
    }

    fn info(&self, widget: &WidgetId) -> Option<WidgetInfo> {
        self.nodes.get(widget).map(|n| n.info.clone())
    }
}
