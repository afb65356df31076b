//! Attach Layout - constraint-based attachment layout for widget trees
//!
//! Widgets are positioned by attaching their edges to the parent, to a
//! percentage of the parent, or to a sibling. This crate normalizes the
//! layoutData shorthand, resolves sibling references and applies the result
//! to a native sink, deferring references whose target does not exist yet.
//!
//! # Example
//!
//! ```rust
//! use attach_layout::bridge::RecordingSink;
//! use attach_layout::layout::{Edge, LayoutQueue, RawLayout, RawValue};
//! use attach_layout::tree::MemoryTree;
//!
//! let mut tree = MemoryTree::new();
//! let mut sink = RecordingSink::new();
//! let mut queue = LayoutQueue::default();
//!
//! let parent = tree.create("Composite");
//! let button = tree.create("Button");
//! tree.append(&parent, &button).unwrap();
//!
//! let layout = RawLayout::new()
//!     .with("left", RawValue::pair("next()", 10.0))
//!     .with("top", 0);
//! queue.set_layout_data(&tree, &button, &layout, &mut sink).unwrap();
//! assert!(queue.is_pending(&button, Edge::Left));
//!
//! let label = tree.create("Label");
//! let event = tree.append(&parent, &label).unwrap();
//! queue.handle_event(&tree, &event, &mut sink);
//! assert!(!queue.is_pending(&button, Edge::Left));
//! assert_eq!(sink.len(), 2);
//! ```

pub mod bridge;
pub mod error;
pub mod layout;
pub mod scene;
pub mod tree;

pub use bridge::{LayoutSink, RecordingSink, Submission};
pub use error::SelectorError;
pub use layout::{
    decode, encode, resolve_references, LayoutAttachmentSet, LayoutConfig, LayoutError,
    LayoutQueue, RawLayout, ResolveMode,
};
pub use scene::{Scene, SceneError, SceneReport};
pub use tree::{MemoryTree, TreeError, TreeEvent, WidgetTree};
